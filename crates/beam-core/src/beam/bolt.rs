//! Bolt state
//!
//! One `Bolt` per shot: where it goes, what it carries, who fired it, and
//! the bookkeeping of the pass currently flying it.

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::outcome::ImpactStats;
use super::ray::Ray;
use crate::actor::{Actor, ActorId, ActorTraits, Attitude};
use crate::combat::{DiceDef, Flavor, ToHit};
use crate::consts::DEFAULT_RANGE;
use crate::dungeon::{Coord, Feature};
use crate::magic::{Colour, ZapId};

/// Geometric behavior of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shape {
    /// Stops at the first actor it hits
    #[default]
    Bolt,
    /// Passes through actors
    Beam,
    /// Flies to its target and explodes there
    Explosion { radius: i32 },
    /// Flies to its target and fills the area around it with cloud
    Cloud { radius: i32 },
}

/// Extra effect riding on a damaging hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Rider {
    StickyFlame,
    /// Poisoned missile
    Poisoned,
    Curare,
    Net,
}

/// Who is responsible for a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Thrower {
    Player,
    Monster,
    #[default]
    Environment,
}

/// Non-owning handle to a thrown item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemHandle(pub u32);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BoltFlags: u16 {
        /// Lands on the target cell directly, without a path
        const SMITE = 0x0001;
        /// Stops at the target cell even if range remains
        const AIMED_AT_SPOT = 0x0002;
        /// Hot enough to burn trees
        const BURNS_TREES = 0x0004;
        /// Burns trees without fail
        const SUPERHOT = 0x0008;
        /// The effect is obvious whatever it hits
        const ALWAYS_OBVIOUS = 0x0010;
        /// Sees invisible actors when predicting
        const SEE_INVISIBLE = 0x0020;
    }
}

/// State of one shot
#[derive(Debug, Clone)]
pub struct Bolt {
    pub name: String,
    pub glyph: char,
    pub colour: Colour,
    pub zap: Option<ZapId>,

    pub source: Coord,
    pub target: Coord,
    /// Current position of the pass in flight
    pub pos: Coord,
    /// Ray to use instead of solving line of sight
    pub ray: Option<Ray>,

    pub range: i32,

    /// Flavor applied at the current cell; diverges from `real_flavor`
    /// only while a randomizing bolt resolves a cell
    pub flavor: Flavor,
    pub real_flavor: Flavor,

    pub shape: Shape,
    pub flags: BoltFlags,

    pub to_hit: ToHit,
    pub damage: DiceDef,
    pub ench_power: i32,
    pub loudness: i32,
    pub rider: Option<Rider>,

    pub agent: Option<ActorId>,
    pub thrower: Thrower,
    pub attitude: Attitude,
    pub item: Option<ItemHandle>,

    // Bookkeeping, reset at the start of every pass
    pub path: Vec<Coord>,
    pub hits: HashMap<ActorId, u8>,
    pub stats: ImpactStats,
    pub bounces: u32,
    pub bounce_pos: Option<Coord>,
    pub reflections: u32,
    pub reflector: Option<ActorId>,
    pub cancelled: bool,
    pub aimed_at_feet: bool,
    pub obvious_effect: bool,
    pub(crate) steps: i32,
    pub(crate) extra_range_used: i32,
}

impl Default for Bolt {
    fn default() -> Self {
        Self {
            name: String::new(),
            glyph: '*',
            colour: Colour::White,
            zap: None,
            source: Coord::ORIGIN,
            target: Coord::ORIGIN,
            pos: Coord::ORIGIN,
            ray: None,
            range: DEFAULT_RANGE,
            flavor: Flavor::None,
            real_flavor: Flavor::None,
            shape: Shape::Bolt,
            flags: BoltFlags::empty(),
            to_hit: ToHit::Roll(0),
            damage: DiceDef::default(),
            ench_power: 0,
            loudness: 0,
            rider: None,
            agent: None,
            thrower: Thrower::Environment,
            attitude: Attitude::Neutral,
            item: None,
            path: Vec::new(),
            hits: HashMap::new(),
            stats: ImpactStats::default(),
            bounces: 0,
            bounce_pos: None,
            reflections: 0,
            reflector: None,
            cancelled: false,
            aimed_at_feet: false,
            obvious_effect: false,
            steps: 0,
            extra_range_used: 0,
        }
    }
}

impl Bolt {
    pub fn new(source: Coord, target: Coord) -> Self {
        Self {
            source,
            target,
            pos: source,
            ..Self::default()
        }
    }

    /// Attribute the shot to an actor and fire it from where they stand
    pub fn fired_by(mut self, actor: &Actor) -> Self {
        self.agent = Some(actor.id);
        self.source = actor.pos;
        self.pos = actor.pos;
        self.attitude = actor.attitude;
        self.thrower = if actor.is_player {
            Thrower::Player
        } else {
            Thrower::Monster
        };
        self.flags.set(
            BoltFlags::SEE_INVISIBLE,
            actor.traits.contains(ActorTraits::SEE_INVISIBLE),
        );
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self.real_flavor = flavor;
        self
    }

    pub fn with_damage(mut self, damage: DiceDef) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_to_hit(mut self, to_hit: ToHit) -> Self {
        self.to_hit = to_hit;
        self
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.ench_power = power;
        self
    }

    pub fn with_range(mut self, range: i32) -> Self {
        self.range = range;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_flags(mut self, flags: BoltFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_rider(mut self, rider: Rider) -> Self {
        self.rider = Some(rider);
        self
    }

    pub fn with_item(mut self, item: ItemHandle) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_ray(mut self, ray: Ray) -> Self {
        self.ray = Some(ray);
        self
    }

    /// Enchantments are classified by flavor, never by configuration
    pub const fn is_enchantment(&self) -> bool {
        self.real_flavor.is_enchantment()
    }

    pub const fn is_beam(&self) -> bool {
        matches!(self.shape, Shape::Beam)
    }

    pub const fn is_explosion(&self) -> bool {
        matches!(self.shape, Shape::Explosion { .. })
    }

    pub const fn is_big_cloud(&self) -> bool {
        matches!(self.shape, Shape::Cloud { .. })
    }

    pub const fn radius(&self) -> i32 {
        match self.shape {
            Shape::Explosion { radius } | Shape::Cloud { radius } => radius,
            _ => 0,
        }
    }

    pub const fn is_smite(&self) -> bool {
        self.flags.contains(BoltFlags::SMITE)
    }

    /// Ends its flight on the target cell rather than flying past it
    pub const fn stops_at_target(&self) -> bool {
        self.is_explosion() || self.is_big_cloud() || self.flags.contains(BoltFlags::AIMED_AT_SPOT)
    }

    /// Range consumed so far in the current pass
    pub const fn range_used(&self) -> i32 {
        self.steps + self.extra_range_used
    }

    /// A shield can stop this shot
    pub const fn is_blockable(&self) -> bool {
        !self.is_explosion()
            && !self.is_big_cloud()
            && !self.is_beam()
            && !self.is_enchantment()
            && !self.to_hit.is_automatic()
    }

    /// A shield of reflection can send this shot back
    pub const fn is_reflectable(&self) -> bool {
        self.is_blockable() && self.item.is_none()
    }

    /// Bounces off `feature` instead of stopping there
    pub const fn is_bouncy(&self, feature: Feature) -> bool {
        if self.real_flavor.is_chaotic() && feature.is_solid() {
            return true;
        }
        if self.is_enchantment() {
            return false;
        }
        match self.flavor {
            Flavor::Electricity => !matches!(feature, Feature::MetalWall | Feature::Tree),
            Flavor::Fire | Flavor::Cold => matches!(feature, Feature::GreenCrystalWall),
            _ => false,
        }
    }

    /// Friend of the shooter, as far as the shot is concerned
    pub fn is_friend(&self, target: &Actor) -> bool {
        match self.agent {
            Some(agent) if agent == target.id => true,
            _ => target.attitude == self.attitude,
        }
    }

    /// Name used in messages
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.real_flavor.noun()
        } else {
            &self.name
        }
    }

    /// Forget everything the previous pass recorded
    pub(crate) fn reset_pass(&mut self) {
        self.path.clear();
        self.hits.clear();
        self.stats = ImpactStats::default();
        self.bounces = 0;
        self.bounce_pos = None;
        self.reflections = 0;
        self.reflector = None;
        self.cancelled = false;
        self.obvious_effect = false;
        self.steps = 0;
        self.extra_range_used = 0;
        self.flavor = self.real_flavor;
        self.pos = self.source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enchantment_follows_flavor() {
        let b = Bolt::default().with_flavor(Flavor::Slow);
        assert!(b.is_enchantment());
        let b = b.with_flavor(Flavor::Fire);
        assert!(!b.is_enchantment());
    }

    #[test]
    fn test_blockable_rules() {
        let b = Bolt::default().with_flavor(Flavor::Fire).with_to_hit(ToHit::Roll(10));
        assert!(b.is_blockable());
        assert!(b.is_reflectable());
        assert!(!b.clone().with_shape(Shape::Beam).is_blockable());
        assert!(!b.clone().with_to_hit(ToHit::Automatic).is_blockable());
        assert!(!b.clone().with_item(ItemHandle(3)).is_reflectable());
        assert!(!Bolt::default().with_flavor(Flavor::Slow).is_blockable());
    }

    #[test]
    fn test_bounciness() {
        let elec = Bolt::default().with_flavor(Flavor::Electricity);
        assert!(elec.is_bouncy(Feature::RockWall));
        assert!(!elec.is_bouncy(Feature::MetalWall));
        assert!(!elec.is_bouncy(Feature::Tree));
        let fire = Bolt::default().with_flavor(Flavor::Fire);
        assert!(fire.is_bouncy(Feature::GreenCrystalWall));
        assert!(!fire.is_bouncy(Feature::RockWall));
        let chaos = Bolt::default().with_flavor(Flavor::Chaos);
        assert!(chaos.is_bouncy(Feature::MetalWall));
        assert!(!Bolt::default().with_flavor(Flavor::Slow).is_bouncy(Feature::RockWall));
    }

    #[test]
    fn test_fired_by_sets_ownership() {
        let you = Actor::player(ActorId(0), Coord::new(2, 2), 10);
        let b = Bolt::new(Coord::ORIGIN, Coord::new(5, 5)).fired_by(&you);
        assert_eq!(b.source, Coord::new(2, 2));
        assert_eq!(b.thrower, Thrower::Player);
        assert_eq!(b.attitude, Attitude::Friendly);
        assert!(b.is_friend(&you));
    }

    #[test]
    fn test_reset_clears_bookkeeping() {
        let mut b = Bolt::new(Coord::new(1, 1), Coord::new(4, 1)).with_flavor(Flavor::Chaos);
        b.flavor = Flavor::Cold;
        b.path.push(Coord::new(2, 1));
        b.hits.insert(ActorId(4), 2);
        b.bounces = 3;
        b.cancelled = true;
        b.steps = 4;
        b.reset_pass();
        assert!(b.path.is_empty() && b.hits.is_empty());
        assert_eq!(b.bounces, 0);
        assert!(!b.cancelled);
        assert_eq!(b.range_used(), 0);
        assert_eq!(b.flavor, Flavor::Chaos);
    }
}
