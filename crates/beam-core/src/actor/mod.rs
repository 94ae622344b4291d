//! Actors as seen by the beam engine
//!
//! The engine never owns actors. It reads `Actor` snapshots through the
//! `Actors` trait and asks the world to change them; everything here is
//! plain data describing what a bolt needs to know about its target.

mod conditions;

pub use conditions::{Condition, Conditions, Duration};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::{Element, Flavor};
use crate::dungeon::Coord;

/// Non-owning handle to an actor held by the world
///
/// The referent may die or vanish while a bolt is in flight; every use
/// after an effect has been applied must go back through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Disposition towards the player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Attitude {
    #[default]
    Hostile,
    Neutral,
    Friendly,
}

/// Broad category of life, which gates several enchantments
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Holiness {
    #[default]
    Natural,
    Undead,
    Demonic,
    Holy,
    Nonliving,
}

impl Holiness {
    pub const fn is_unholy(&self) -> bool {
        matches!(self, Holiness::Undead | Holiness::Demonic)
    }
}

/// Resistance to enchantments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagicResistance {
    /// Enchantments that check resistance never take hold
    Immune,
    Value(i32),
}

impl Default for MagicResistance {
    fn default() -> Self {
        MagicResistance::Value(0)
    }
}

/// Elemental resistance levels. Negative values mean vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resistances {
    pub fire: i32,
    pub cold: i32,
    pub electricity: i32,
    pub poison: i32,
    pub negative: i32,
    pub acid: i32,
}

impl Resistances {
    pub const fn level(&self, element: Element) -> i32 {
        match element {
            Element::Fire => self.fire,
            Element::Cold => self.cold,
            Element::Electricity => self.electricity,
            Element::Poison => self.poison,
            Element::Negative => self.negative,
            Element::Acid => self.acid,
        }
    }

    /// Resistance against a flavor; 0 for flavors without an element
    pub const fn against(&self, flavor: Flavor) -> i32 {
        match flavor.element() {
            Some(element) => self.level(element),
            None => 0,
        }
    }

    pub fn with(mut self, element: Element, level: i32) -> Self {
        match element {
            Element::Fire => self.fire = level,
            Element::Cold => self.cold = level,
            Element::Electricity => self.electricity = level,
            Element::Poison => self.poison = level,
            Element::Negative => self.negative = level,
            Element::Acid => self.acid = level,
        }
        self
    }
}

bitflags! {
    /// Fixed traits of an actor relevant to bolts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActorTraits: u16 {
        /// Cannot be moved, slowed or hasted
        const STATIONARY = 0x0001;
        /// Made of ice; melts under fire
        const ICY = 0x0002;
        const UNIQUE = 0x0004;
        const SEE_INVISIBLE = 0x0008;
        const POLY_IMMUNE = 0x0010;
        const STONE_IMMUNE = 0x0020;
        /// Vulnerable to ice shards
        const ICE_VULNERABLE = 0x0040;
        /// Resists ice shards
        const ICE_RESISTANT = 0x0080;
        /// Takes extra damage from lava
        const LAVA_VULNERABLE = 0x0100;
        /// Resists lava
        const LAVA_RESISTANT = 0x0200;
    }
}

/// A shield carried by an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shield {
    /// Chance (percent) of blocking a blockable bolt
    pub block: u32,
    /// Blocked bolts are sent back instead of stopped
    pub reflects: bool,
}

/// Snapshot of an actor's combat-relevant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub pos: Coord,
    pub hp: i32,
    pub max_hp: i32,
    pub ac: i32,
    pub ev: i32,
    pub hit_dice: i32,
    pub holiness: Holiness,
    pub attitude: Attitude,
    pub magic_resistance: MagicResistance,
    pub resists: Resistances,
    pub conditions: Conditions,
    pub traits: ActorTraits,
    pub shield: Option<Shield>,
    pub is_player: bool,
}

impl Actor {
    /// A natural, hostile, unarmoured monster
    pub fn monster(id: ActorId, name: impl Into<String>, pos: Coord, hp: i32) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            hp,
            max_hp: hp,
            ac: 0,
            ev: 0,
            hit_dice: 1,
            holiness: Holiness::Natural,
            attitude: Attitude::Hostile,
            magic_resistance: MagicResistance::Value(0),
            resists: Resistances::default(),
            conditions: Conditions::empty(),
            traits: ActorTraits::empty(),
            shield: None,
            is_player: false,
        }
    }

    pub fn player(id: ActorId, pos: Coord, hp: i32) -> Self {
        Self {
            attitude: Attitude::Friendly,
            is_player: true,
            ..Self::monster(id, "you", pos, hp)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_invisible(&self) -> bool {
        self.conditions.contains(Conditions::INVISIBLE)
            && !self.conditions.contains(Conditions::CORONA)
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.conditions.contains(condition.flag())
    }

    /// Living things can be poisoned, drained and put to sleep
    pub fn is_living(&self) -> bool {
        matches!(self.holiness, Holiness::Natural | Holiness::Holy)
    }

    /// Name as the subject of a message ("The orc", "You")
    pub fn subject(&self) -> String {
        if self.is_player {
            "You".to_string()
        } else {
            format!("The {}", self.name)
        }
    }

    /// Name as the object of a message ("the orc", "you")
    pub fn object(&self) -> String {
        if self.is_player {
            "you".to_string()
        } else {
            format!("the {}", self.name)
        }
    }

    /// Possessive form ("the orc's", "your")
    pub fn possessive(&self) -> String {
        if self.is_player {
            "your".to_string()
        } else {
            format!("the {}'s", self.name)
        }
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    pub fn with_ev(mut self, ev: i32) -> Self {
        self.ev = ev;
        self
    }

    pub fn with_hit_dice(mut self, hd: i32) -> Self {
        self.hit_dice = hd;
        self
    }

    pub fn with_attitude(mut self, attitude: Attitude) -> Self {
        self.attitude = attitude;
        self
    }

    pub fn with_holiness(mut self, holiness: Holiness) -> Self {
        self.holiness = holiness;
        self
    }

    pub fn with_resist(mut self, element: Element, level: i32) -> Self {
        self.resists = self.resists.with(element, level);
        self
    }

    pub fn with_magic_resistance(mut self, mr: MagicResistance) -> Self {
        self.magic_resistance = mr;
        self
    }

    pub fn with_shield(mut self, block: u32, reflects: bool) -> Self {
        self.shield = Some(Shield { block, reflects });
        self
    }

    pub fn with_traits(mut self, traits: ActorTraits) -> Self {
        self.traits |= traits;
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions |= conditions;
        self
    }
}
