//! In-memory reference world
//!
//! A rectangular map with actors and clouds that implements every world
//! trait. Used by the simulator and by tests; a game embeds the engine by
//! implementing the traits on its own level type instead.

use hashbrown::{HashMap, HashSet};

use super::{CloudKind, Coord, Feature};
use crate::actor::{Actor, ActorId, Attitude, Condition, Duration, Holiness};
use crate::combat::Flavor;
use crate::world::{
    Actors, BeamError, Clouds, PolymorphKind, Relocation, Senses, Terrain,
};

/// Which cells the player can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    Nothing,
    Cells(HashSet<Coord>),
}

/// A change made to the world, recorded in order
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    Damaged { id: ActorId, amount: i32, flavor: Flavor },
    Killed { id: ActorId },
    ConditionAdded { id: ActorId, condition: Condition, duration: Duration },
    ConditionRemoved { id: ActorId, condition: Condition },
    Healed { id: ActorId, amount: i32 },
    Drained { id: ActorId, hp: i32, level: bool },
    AttitudeChanged { id: ActorId, attitude: Attitude },
    Relocated { id: ActorId, how: Relocation, to: Option<Coord> },
    Polymorphed { id: ActorId, into: PolymorphKind },
    FeatureChanged { pos: Coord, from: Feature, to: Feature },
    CloudPlaced { kind: CloudKind, pos: Coord, duration: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    width: i32,
    height: i32,
    cells: Vec<Feature>,
    wards: HashSet<Coord>,
    actors: Vec<Actor>,
    clouds: HashMap<Coord, (CloudKind, i32)>,
    /// Stacked levels of poison and sticky flame
    stacks: HashMap<(ActorId, Condition), i32>,
    pub visibility: Visibility,
    pub hearing: bool,
    events: Vec<WorldEvent>,
}

/// Default monsters for lower-case map letters: (letter, name, hp, hit dice, holiness)
const MONSTER_LEGEND: &[(char, &str, i32, i32, Holiness)] = &[
    ('a', "angel", 40, 12, Holiness::Holy),
    ('d', "demon", 30, 8, Holiness::Demonic),
    ('g', "goblin", 8, 1, Holiness::Natural),
    ('k', "kobold", 6, 1, Holiness::Natural),
    ('o', "orc", 15, 3, Holiness::Natural),
    ('r', "rat", 4, 1, Holiness::Natural),
    ('s', "skeleton", 20, 5, Holiness::Undead),
    ('y', "yak", 30, 7, Holiness::Natural),
    ('z', "zombie", 20, 4, Holiness::Undead),
];

impl GridWorld {
    /// An open room of floor surrounded by nothing
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Feature::Floor)
    }

    pub fn filled(width: i32, height: i32, feature: Feature) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![feature; size],
            wards: HashSet::new(),
            actors: Vec::new(),
            clouds: HashMap::new(),
            stacks: HashMap::new(),
            visibility: Visibility::All,
            hearing: true,
            events: Vec::new(),
        }
    }

    /// Parse an ASCII map.
    ///
    /// Terrain uses `Feature::from_glyph`; `*` is warded floor, `@` the
    /// player, lower-case letters hostile monsters and digits friendly
    /// monsters. Short lines are padded with rock.
    pub fn from_ascii(map: &str) -> Result<Self, BeamError> {
        let lines: Vec<&str> = map
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.trim().is_empty())
            .collect();
        let lines: Vec<&str> = match lines.iter().rposition(|l| !l.trim().is_empty()) {
            Some(last) => lines[..=last].to_vec(),
            None => return Err(BeamError::InvalidMap("map is empty".into())),
        };
        let indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);

        let height = lines.len() as i32;
        let width = lines.iter().map(|l| l.len().saturating_sub(indent)).max().unwrap_or(0) as i32;
        let mut world = Self::filled(width, height, Feature::RockWall);

        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().skip(indent).enumerate() {
                let pos = Coord::new(x as i32, y as i32);
                if let Some(feature) = Feature::from_glyph(c) {
                    world.set_feature(pos, feature);
                    continue;
                }
                world.set_feature(pos, Feature::Floor);
                match c {
                    '*' => {
                        world.wards.insert(pos);
                    }
                    '@' => {
                        world.spawn(Actor::player(ActorId(0), pos, 30));
                    }
                    'a'..='z' => {
                        world.spawn(Self::legend_monster(c, pos, Attitude::Hostile));
                    }
                    '1'..='9' => {
                        world.spawn(Self::legend_monster('o', pos, Attitude::Friendly));
                    }
                    ' ' => world.set_feature(pos, Feature::RockWall),
                    other => {
                        return Err(BeamError::InvalidMap(format!(
                            "unknown map character {other:?} at {pos}"
                        )));
                    }
                }
            }
        }
        Ok(world)
    }

    fn legend_monster(letter: char, pos: Coord, attitude: Attitude) -> Actor {
        let (name, hp, hd, holiness) = MONSTER_LEGEND
            .iter()
            .find(|(l, ..)| *l == letter)
            .map(|&(_, name, hp, hd, holiness)| (name.to_string(), hp, hd, holiness))
            .unwrap_or_else(|| (format!("{letter}-monster"), 10, 2, Holiness::Natural));
        Actor::monster(ActorId(0), name, pos, hp)
            .with_hit_dice(hd)
            .with_holiness(holiness)
            .with_attitude(attitude)
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            None
        } else {
            Some((pos.y * self.width + pos.x) as usize)
        }
    }

    pub fn set_feature(&mut self, pos: Coord, feature: Feature) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = feature;
        }
    }

    pub fn add_ward(&mut self, pos: Coord) {
        self.wards.insert(pos);
    }

    /// Add an actor; its id is assigned by the world
    pub fn spawn(&mut self, mut actor: Actor) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        actor.id = id;
        self.actors.push(actor);
        id
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0 as usize)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn player(&self) -> Option<ActorId> {
        self.actors.iter().find(|a| a.is_player).map(|a| a.id)
    }

    /// Stacked levels of a poison-like condition
    pub fn stack_level(&self, id: ActorId, condition: Condition) -> i32 {
        self.stacks.get(&(id, condition)).copied().unwrap_or(0)
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Make only the given cells visible to the player
    pub fn set_visible_cells(&mut self, cells: impl IntoIterator<Item = Coord>) {
        self.visibility = Visibility::Cells(cells.into_iter().collect());
    }

    fn is_free(&self, pos: Coord) -> bool {
        !self.is_solid(pos) && self.actor_at(pos).is_none()
    }

    /// Free cell for a relocated actor: the farthest for teleports, the
    /// nearest non-adjacent one for blinks.
    fn landing_cell(&self, from: Coord, far: bool) -> Option<Coord> {
        let candidates = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Coord::new(x, y)))
            .filter(|&p| p != from && self.is_free(p));
        if far {
            candidates.max_by_key(|p| (p.distance_sq(from), -p.y, -p.x))
        } else {
            candidates
                .filter(|p| p.distance(from) >= 2)
                .min_by_key(|p| (p.distance_sq(from), p.y, p.x))
        }
    }

    /// Render the map, drawing `overlay` cells as `*` beneath actors
    pub fn render(&self, overlay: &[Coord]) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Coord::new(x, y);
                let c = match self.actor_at(pos).and_then(|id| self.actor(id)) {
                    Some(a) if a.is_player => '@',
                    Some(a) => a.name.chars().next().unwrap_or('m'),
                    None if overlay.contains(&pos) => '*',
                    None => self.feature_at(pos).glyph(),
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl Terrain for GridWorld {
    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn feature_at(&self, pos: Coord) -> Feature {
        self.index(pos).map_or(Feature::PermaRock, |i| self.cells[i])
    }

    fn is_protected_ward(&self, pos: Coord) -> bool {
        self.wards.contains(&pos)
    }

    fn destroy_feature(&mut self, pos: Coord, replacement: Feature) {
        let from = self.feature_at(pos);
        if from.is_permanent() {
            return;
        }
        self.set_feature(pos, replacement);
        self.events.push(WorldEvent::FeatureChanged {
            pos,
            from,
            to: replacement,
        });
    }
}

impl Actors for GridWorld {
    fn actor_at(&self, pos: Coord) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|a| a.pos == pos && a.is_alive())
            .map(|a| a.id)
    }

    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0 as usize)
    }

    fn apply_damage(
        &mut self,
        id: ActorId,
        amount: i32,
        flavor: Flavor,
        _source: Option<ActorId>,
    ) -> bool {
        let Some(actor) = self.actor_mut(id) else {
            return false;
        };
        if !actor.is_alive() || amount <= 0 {
            return false;
        }
        actor.hp -= amount;
        let killed = !actor.is_alive();
        self.events.push(WorldEvent::Damaged { id, amount, flavor });
        if killed {
            self.events.push(WorldEvent::Killed { id });
        }
        killed
    }

    fn apply_condition(
        &mut self,
        id: ActorId,
        condition: Condition,
        duration: Duration,
        _source: Option<ActorId>,
    ) -> bool {
        let Some(actor) = self.actor_mut(id) else {
            return false;
        };
        if !actor.is_alive() {
            return false;
        }
        actor.conditions |= condition.flag();
        if condition.stacks() {
            let levels = match duration {
                Duration::Turns(n) => n,
                Duration::Permanent => 1,
            };
            *self.stacks.entry((id, condition)).or_insert(0) += levels;
        }
        self.events.push(WorldEvent::ConditionAdded {
            id,
            condition,
            duration,
        });
        true
    }

    fn remove_condition(&mut self, id: ActorId, condition: Condition) -> bool {
        let Some(actor) = self.actor_mut(id) else {
            return false;
        };
        if !actor.conditions.contains(condition.flag()) {
            return false;
        }
        actor.conditions.remove(condition.flag());
        self.stacks.remove(&(id, condition));
        self.events.push(WorldEvent::ConditionRemoved { id, condition });
        true
    }

    fn heal(&mut self, id: ActorId, amount: i32) -> i32 {
        let Some(actor) = self.actor_mut(id) else {
            return 0;
        };
        if !actor.is_alive() {
            return 0;
        }
        let healed = amount.min(actor.max_hp - actor.hp).max(0);
        actor.hp += healed;
        self.events.push(WorldEvent::Healed { id, amount: healed });
        healed
    }

    fn drain(&mut self, id: ActorId, hp: i32, level: bool) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        actor.max_hp = (actor.max_hp - hp).max(1);
        actor.hp = actor.hp.min(actor.max_hp);
        if level {
            actor.hit_dice = (actor.hit_dice - 1).max(1);
        }
        self.events.push(WorldEvent::Drained { id, hp, level });
    }

    fn set_attitude(&mut self, id: ActorId, attitude: Attitude) {
        if let Some(actor) = self.actor_mut(id) {
            actor.attitude = attitude;
            self.events.push(WorldEvent::AttitudeChanged { id, attitude });
        }
    }

    fn relocate(&mut self, id: ActorId, how: Relocation) {
        let Some(from) = self.position(id) else {
            return;
        };
        let to = match how {
            Relocation::Teleport => self.landing_cell(from, true),
            Relocation::Blink => self.landing_cell(from, false),
            Relocation::Banish => None,
        };
        if let Some(actor) = self.actor_mut(id) {
            actor.pos = to.unwrap_or(Coord::new(-1, -1));
        }
        self.events.push(WorldEvent::Relocated { id, how, to });
    }

    fn polymorph(&mut self, id: ActorId, into: PolymorphKind) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        match into {
            PolymorphKind::Random => actor.name = format!("shapeshifted {}", actor.name),
            PolymorphKind::Lump => {
                actor.name = "pulsating lump".to_string();
                actor.hit_dice = 1;
            }
            PolymorphKind::Hog => actor.name = "hog".to_string(),
        }
        self.events.push(WorldEvent::Polymorphed { id, into });
    }
}

impl Clouds for GridWorld {
    fn cloud_at(&self, pos: Coord) -> Option<CloudKind> {
        self.clouds.get(&pos).map(|&(kind, _)| kind)
    }

    fn place_cloud(&mut self, kind: CloudKind, pos: Coord, duration: i32, _source: Option<ActorId>) {
        if self.is_solid(pos) {
            return;
        }
        self.clouds.insert(pos, (kind, duration));
        self.events.push(WorldEvent::CloudPlaced {
            kind,
            pos,
            duration,
        });
    }
}

impl Senses for GridWorld {
    fn is_visible_to_player(&self, pos: Coord) -> bool {
        match &self.visibility {
            Visibility::All => self.in_bounds(pos),
            Visibility::Nothing => false,
            Visibility::Cells(cells) => cells.contains(&pos),
        }
    }

    fn can_player_hear(&self, pos: Coord) -> bool {
        self.hearing && self.in_bounds(pos)
    }
}
