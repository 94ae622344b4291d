//! Explosion engine
//!
//! The set of cells an explosion reaches is found by flooding outward
//! from the center with a cost per step: walking around the center is
//! free, a straight step outward costs a little, and turning back costs
//! a lot. That lets blasts curl around a corner a short way without
//! passing through walls. The same map shapes big clouds.

use serde::{Deserialize, Serialize};

use super::bolt::Bolt;
use super::los::has_clear_path;
use super::outcome::{BeamOutcome, Noise};
use super::pass::Pass;
use super::wall::{WallEffect, can_affect_wall};
use crate::combat::Flavor;
use crate::consts::{
    EXPLOSION_BASE_NOISE, EXPLOSION_CIRCLE_COST, EXPLOSION_COST_FACTOR,
    EXPLOSION_NOISE_PER_RADIUS, EXPLOSION_REVERSE_COST, EXPLOSION_STEP_COST,
    MAX_EXPLOSION_RADIUS,
};
use crate::dungeon::{COMPASS, Coord};
use crate::world::{Prompter, Terrain, World};

/// Width of the cost map: every offset within the radius cap
const MAP_SIZE: usize = (2 * MAX_EXPLOSION_RADIUS + 1) as usize;

/// Turns a cloud placed by an exploding bolt lasts, before the random part
const EXPLOSION_CLOUD_TURNS: i32 = 3;
const BIG_CLOUD_TURNS: i32 = 8;

/// How an explosion treats its surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionOptions {
    /// Leave the center cell out of the affect pass
    pub hole_in_the_middle: bool,
    /// A standalone explosion that runs into a wall goes off inside it
    pub explode_in_wall: bool,
    pub stop_at_statues: bool,
    pub stop_at_walls: bool,
}

impl Default for ExplosionOptions {
    fn default() -> Self {
        Self {
            hole_in_the_middle: false,
            explode_in_wall: false,
            stop_at_statues: true,
            stop_at_walls: true,
        }
    }
}

impl ExplosionOptions {
    pub fn with_hole(mut self) -> Self {
        self.hole_in_the_middle = true;
        self
    }

    /// Whether a solid cell that cannot be destroyed halts the blast
    fn stops_at(&self, statuelike: bool) -> bool {
        if statuelike {
            self.stop_at_statues
        } else {
            self.stop_at_walls
        }
    }
}

/// Minimum propagation cost of every offset an explosion reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplosionMap {
    center: Coord,
    radius: i32,
    costs: [[i32; MAP_SIZE]; MAP_SIZE],
}

impl ExplosionMap {
    fn new(center: Coord, radius: i32) -> Self {
        Self {
            center,
            radius,
            costs: [[i32::MAX; MAP_SIZE]; MAP_SIZE],
        }
    }

    fn slot(delta: Coord) -> Option<(usize, usize)> {
        if delta.rdist() > MAX_EXPLOSION_RADIUS {
            return None;
        }
        Some((
            (delta.x + MAX_EXPLOSION_RADIUS) as usize,
            (delta.y + MAX_EXPLOSION_RADIUS) as usize,
        ))
    }

    fn cost(&self, delta: Coord) -> i32 {
        Self::slot(delta).map_or(i32::MIN, |(x, y)| self.costs[x][y])
    }

    fn set_cost(&mut self, delta: Coord, cost: i32) {
        if let Some((x, y)) = Self::slot(delta) {
            self.costs[x][y] = cost;
        }
    }

    pub fn center(&self) -> Coord {
        self.center
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// The explosion reaches `pos`
    pub fn contains(&self, pos: Coord) -> bool {
        Self::slot(pos - self.center).is_some_and(|(x, y)| self.costs[x][y] != i32::MAX)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let r = MAX_EXPLOSION_RADIUS;
        (-r..=r)
            .flat_map(move |y| (-r..=r).map(move |x| Coord::new(x, y)))
            .map(|d| self.center + d)
            .filter(|&p| self.contains(p))
    }

    pub fn len(&self) -> usize {
        self.cells().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reached cells grouped by distance from the center, innermost
    /// first. Each ring lists its left and right sides top to bottom,
    /// then its top and bottom rows left to right.
    pub fn rings(&self, hole_in_the_middle: bool) -> Vec<Vec<Coord>> {
        let mut rings = Vec::with_capacity(self.radius as usize + 1);
        if !hole_in_the_middle && self.contains(self.center) {
            rings.push(vec![self.center]);
        }
        for rad in 1..=self.radius {
            let mut ring = Vec::new();
            for ay in (1 - rad)..=(rad - 1) {
                ring.push(Coord::new(-rad, ay));
                ring.push(Coord::new(rad, ay));
            }
            for ax in -rad..=rad {
                ring.push(Coord::new(ax, -rad));
                ring.push(Coord::new(ax, rad));
            }
            let ring: Vec<Coord> = ring
                .into_iter()
                .map(|d| self.center + d)
                .filter(|&p| self.contains(p))
                .collect();
            if !ring.is_empty() {
                rings.push(ring);
            }
        }
        rings
    }
}

/// Work out which cells an explosion of `radius` centred on `center`
/// reaches.
///
/// A cell is included while its cheapest route costs no more than ten
/// times the radius, it lies within `radius * (radius + 1)` squared
/// distance, it is on the map and it is not warded. Walls the bolt can
/// destroy count as open. Other solid cells either stop the blast
/// (excluded) or, when the options let it pass them, are included but
/// spread no further.
pub fn explosion_map<T: Terrain + ?Sized>(
    terrain: &T,
    bolt: &Bolt,
    center: Coord,
    radius: i32,
    opts: &ExplosionOptions,
) -> ExplosionMap {
    let radius = radius.clamp(0, MAX_EXPLOSION_RADIUS);
    let mut map = ExplosionMap::new(center, radius);
    let flood = Flood {
        terrain,
        bolt,
        opts,
        center,
        radius,
        limit: EXPLOSION_COST_FACTOR * radius,
    };
    flood.visit(&mut map, Coord::ORIGIN, 0);
    map
}

struct Flood<'a, T: ?Sized> {
    terrain: &'a T,
    bolt: &'a Bolt,
    opts: &'a ExplosionOptions,
    center: Coord,
    radius: i32,
    limit: i32,
}

/// What a cell does to the blast reaching it
enum CellKind {
    Open,
    /// Included, but the blast spreads no further from it
    Absorbs,
    Blocks,
}

impl<T: Terrain + ?Sized> Flood<'_, T> {
    fn classify(&self, delta: Coord, pos: Coord) -> CellKind {
        let feature = self.terrain.feature_at(pos);
        if !feature.is_solid() || delta.is_origin() {
            return CellKind::Open;
        }
        if can_affect_wall(self.bolt, feature) != WallEffect::No {
            return CellKind::Open;
        }
        if self.opts.stops_at(feature.is_statuelike()) {
            CellKind::Blocks
        } else {
            CellKind::Absorbs
        }
    }

    fn visit(&self, map: &mut ExplosionMap, delta: Coord, cost: i32) {
        if delta.abs() > self.radius * (self.radius + 1)
            || delta.rdist() > MAX_EXPLOSION_RADIUS
            || cost > self.limit
        {
            return;
        }
        let pos = self.center + delta;
        if !self.terrain.in_bounds(pos) || self.terrain.is_protected_ward(pos) {
            return;
        }
        if cost >= map.cost(delta) {
            return;
        }

        let spreads = match self.classify(delta, pos) {
            CellKind::Blocks => return,
            CellKind::Absorbs => false,
            CellKind::Open => true,
        };
        map.set_cost(delta, cost);
        if !spreads {
            return;
        }

        // An explosion set off inside rock only reaches what it can see
        let buried = delta.is_origin() && self.terrain.is_solid(pos);

        for step in COMPASS {
            let next = delta + step;
            if buried && !has_clear_path(self.terrain, self.center, self.center + next) {
                continue;
            }
            let add = if delta.rdist() == next.rdist() {
                EXPLOSION_CIRCLE_COST
            } else if delta.x * step.x < 0 || delta.y * step.y < 0 {
                EXPLOSION_REVERSE_COST
            } else {
                EXPLOSION_STEP_COST
            };
            self.visit(map, next, cost + add);
        }
    }
}

impl<W: World + ?Sized, P: Prompter + ?Sized> Pass<'_, W, P> {
    /// Set the bolt off at `center`, affecting every reached cell once
    pub(super) fn explode_at(&mut self, center: Coord, opts: ExplosionOptions) {
        let radius = self
            .bolt
            .radius()
            .clamp(0, self.options.max_explosion_radius.min(MAX_EXPLOSION_RADIUS));
        self.bolt.hits.clear();
        self.in_explosion = true;
        self.bolt.pos = center;

        let map = explosion_map(self.world(), &*self.bolt, center, radius, &opts);
        tracing::debug!(
            target: "beam",
            %center,
            radius,
            cells = map.len(),
            hole = opts.hole_in_the_middle,
            tracer = self.is_tracer(),
            "explosion"
        );

        if !self.is_tracer() {
            self.announce_explosion(&map);
        }

        let rings = map.rings(opts.hole_in_the_middle);
        if !self.is_tracer() && self.options.animate {
            self.out.frames = rings.clone();
        }
        for pos in rings.into_iter().flatten() {
            if self.bolt.cancelled {
                break;
            }
            self.explosion_cell(pos);
        }
    }

    fn announce_explosion(&mut self, map: &ExplosionMap) {
        let center = map.center();
        let seen = map.cells().any(|p| self.world().is_visible_to_player(p));
        let heard = self.world().can_player_hear(center);
        let name = self.bolt.display_name().to_string();

        let (sight, sound) = match self.bolt.real_flavor {
            Flavor::Electricity => (
                "There is a sudden explosion of sparks!".to_string(),
                "You hear a clap of thunder!",
            ),
            Flavor::Frag => (
                format!("The {name} bursts into a shower of shrapnel!"),
                "You hear an explosion.",
            ),
            Flavor::Cold | Flavor::Ice => (
                format!("The {name} shatters!"),
                "You hear the sound of shattering ice.",
            ),
            _ => (format!("The {name} explodes!"), "You hear an explosion."),
        };
        if seen {
            self.out.message(sight);
            self.bolt.obvious_effect = true;
        } else if heard {
            self.out.message(sound);
        }
        self.out.noises.push(Noise {
            pos: center,
            loudness: EXPLOSION_BASE_NOISE + EXPLOSION_NOISE_PER_RADIUS * map.radius(),
        });
    }

    fn explosion_cell(&mut self, pos: Coord) {
        if let Some(id) = self.world().actor_at(pos) {
            self.affect_actor(id);
        }
        if self.is_tracer() {
            return;
        }

        let feature = self.world().feature_at(pos);
        if feature.is_solid() {
            let affects = match can_affect_wall(&*self.bolt, feature) {
                WallEffect::Yes => true,
                WallEffect::Maybe => self.rng.coinflip(),
                WallEffect::No => false,
            };
            if affects {
                self.affect_wall(pos, feature);
            }
        } else if let Some(kind) = self.bolt.real_flavor.explosion_cloud() {
            let turns = EXPLOSION_CLOUD_TURNS + self.rng.random2(4);
            let agent = self.bolt.agent;
            self.commit(|w| w.place_cloud(kind, pos, turns, agent));
        }
    }

    /// Fill the area around `center` with the bolt's cloud
    pub(super) fn big_cloud(&mut self, center: Coord) {
        let radius = self.bolt.radius().max(1);
        let map = explosion_map(
            self.world(),
            &*self.bolt,
            center,
            radius,
            &ExplosionOptions::default(),
        );
        tracing::debug!(target: "beam", %center, radius, cells = map.len(), "big cloud");

        if self.is_tracer() {
            // Predict the cloud by what stands inside it
            self.in_explosion = true;
            self.bolt.hits.clear();
            let inside: Vec<Coord> = map.cells().collect();
            for pos in inside {
                if let Some(id) = self.world().actor_at(pos) {
                    self.affect_actor(id);
                }
            }
            return;
        }

        let Some(kind) = self.world().cloud_type_for(self.bolt.real_flavor) else {
            return;
        };
        let agent = self.bolt.agent;
        let cells: Vec<Coord> = map
            .cells()
            .filter(|&p| !self.world().is_solid(p))
            .collect();
        for pos in cells {
            let turns = BIG_CLOUD_TURNS + self.rng.random2(4);
            self.commit(|w| w.place_cloud(kind, pos, turns, agent));
        }
        if self.world().is_visible_to_player(center) {
            self.bolt.obvious_effect = true;
        }
    }

    /// Standalone explosion: fly toward the target, then go off
    pub(super) fn run_explosion(mut self, opts: ExplosionOptions) -> BeamOutcome {
        self.initialize();
        let center = self.explosion_center(&opts);
        self.bolt.path.push(center);
        self.bolt.steps = 1;
        self.explode_at(center, opts);
        self.conclude()
    }

    /// Where a standalone explosion goes off: its target, or the last
    /// cell before something that stops it
    fn explosion_center(&mut self, opts: &ExplosionOptions) -> Coord {
        let (source, target) = (self.bolt.source, self.bolt.target);
        if source == target {
            return target;
        }
        let mut ray = self.ray;
        for _ in 0..source.distance(target) {
            ray.advance();
            let pos = ray.pos();
            if !self.world().in_bounds(pos) {
                ray.regress();
                break;
            }
            let feature = self.world().feature_at(pos);
            if feature.is_solid() && opts.stops_at(feature.is_statuelike()) {
                if !opts.explode_in_wall {
                    ray.regress();
                }
                break;
            }
            if pos == target {
                break;
            }
        }
        ray.pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Feature, GridWorld};

    fn fireball() -> Bolt {
        Bolt::default().with_flavor(Flavor::Fire)
    }

    fn open_map(radius: i32) -> ExplosionMap {
        let world = GridWorld::new(11, 11);
        explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            radius,
            &ExplosionOptions::default(),
        )
    }

    #[test]
    fn test_open_disc_sizes() {
        assert_eq!(open_map(0).len(), 1);
        assert_eq!(open_map(1).len(), 9);
        // 5x5 square without its corners
        assert_eq!(open_map(2).len(), 21);
    }

    #[test]
    fn test_disc_respects_distance_bound() {
        let map = open_map(2);
        for pos in map.cells() {
            assert!((pos - map.center()).abs() <= 6);
        }
        assert!(!map.contains(Coord::new(7, 7)));
    }

    #[test]
    fn test_rings_are_ordered_outward() {
        let map = open_map(2);
        let rings = map.rings(false);
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0], vec![Coord::new(5, 5)]);
        assert_eq!(rings[1].len(), 8);
        assert_eq!(rings[2].len(), 12);
        assert_eq!(rings[1][0], Coord::new(4, 5));
        assert_eq!(rings[1][1], Coord::new(6, 5));

        let holed = map.rings(true);
        assert_eq!(holed.len(), 2);
        assert!(holed.iter().flatten().all(|&p| p != Coord::new(5, 5)));
    }

    #[test]
    fn test_blast_curls_around_a_lone_wall() {
        let mut world = GridWorld::new(11, 11);
        world.set_feature(Coord::new(6, 5), Feature::StoneWall);
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            2,
            &ExplosionOptions::default(),
        );
        // (7,5) is still reached through (6,4) and (7,4)
        assert_eq!(map.len(), 20);
        assert!(!map.contains(Coord::new(6, 5)));
        assert!(map.contains(Coord::new(7, 5)));
        assert!(map.contains(Coord::new(7, 4)));
        assert!(map.contains(Coord::new(7, 6)));
    }

    #[test]
    fn test_circling_is_free_at_every_radius() {
        let mut world = GridWorld::new(11, 11);
        // Only the top of the inner ring is open
        for x in 4..=6 {
            world.set_feature(Coord::new(x, 6), Feature::StoneWall);
        }
        world.set_feature(Coord::new(4, 5), Feature::StoneWall);
        world.set_feature(Coord::new(6, 5), Feature::StoneWall);
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            2,
            &ExplosionOptions::default(),
        );
        // (5,7) is reached by walking the outer ring down from the top
        assert!(map.contains(Coord::new(5, 3)));
        assert!(map.contains(Coord::new(7, 5)));
        assert!(map.contains(Coord::new(5, 7)));
    }

    #[test]
    fn test_wall_segment_shadows_cells_behind_it() {
        let mut world = GridWorld::new(11, 11);
        for y in 3..=7 {
            world.set_feature(Coord::new(6, y), Feature::StoneWall);
        }
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            2,
            &ExplosionOptions::default(),
        );
        assert_eq!(map.len(), 13);
        assert!(map.cells().all(|p| p.x <= 5));
    }

    #[test]
    fn test_statues_absorb_when_passable() {
        let mut world = GridWorld::new(11, 11);
        for y in 3..=7 {
            world.set_feature(Coord::new(6, y), Feature::Statue);
        }
        let opts = ExplosionOptions {
            stop_at_statues: false,
            ..ExplosionOptions::default()
        };
        let map = explosion_map(&world, &fireball(), Coord::new(5, 5), 2, &opts);
        assert_eq!(map.len(), 18);
        assert!(map.contains(Coord::new(6, 5)));
        assert!(!map.contains(Coord::new(7, 5)));
    }

    #[test]
    fn test_wards_are_never_reached() {
        let mut world = GridWorld::new(11, 11);
        world.add_ward(Coord::new(5, 4));
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            1,
            &ExplosionOptions::default(),
        );
        assert_eq!(map.len(), 8);
        assert!(!map.contains(Coord::new(5, 4)));
    }

    #[test]
    fn test_map_clipped_by_edges() {
        let world = GridWorld::new(5, 5);
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(0, 0),
            1,
            &ExplosionOptions::default(),
        );
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_destructible_walls_are_open() {
        let mut world = GridWorld::new(11, 11);
        world.set_feature(Coord::new(6, 5), Feature::WaxWall);
        let map = explosion_map(
            &world,
            &fireball(),
            Coord::new(5, 5),
            2,
            &ExplosionOptions::default(),
        );
        assert_eq!(map.len(), 21);
    }
}
