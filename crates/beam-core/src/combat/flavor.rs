//! Beam flavors
//!
//! A flavor is what a bolt does to whatever it touches: the kind of damage,
//! or for enchantments, the effect applied.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::CloudKind;
use crate::rng::GameRng;

/// Damage or enchantment kind carried by a bolt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Flavor {
    /// Pseudo flavor of an unconfigured bolt; never fired
    #[default]
    None = 0,

    // Damaging flavors
    Missile = 1,
    MagicMissile = 2,
    Magic = 3,
    Fire = 4,
    Cold = 5,
    Electricity = 6,
    Poison = 7,
    PoisonArrow = 8,
    Negative = 9,
    Acid = 10,
    Miasma = 11,
    Holy = 12,
    Hellfire = 13,
    Lava = 14,
    Ice = 15,
    Steam = 16,
    Frag = 17,
    Water = 18,
    Energy = 19,
    Nuke = 20,
    Light = 21,
    /// Re-rolled among the elements for every cell
    Random = 22,
    /// Re-rolled among elements and enchantments for every cell
    Chaos = 23,

    // Enchantments (contiguous: is_enchantment depends on it)
    Slow = 30,
    Haste = 31,
    Healing = 32,
    Paralysis = 33,
    Confusion = 34,
    Invisibility = 35,
    Digging = 36,
    Teleport = 37,
    Polymorph = 38,
    Charm = 39,
    Banish = 40,
    Degenerate = 41,
    EnslaveUndead = 42,
    EnslaveDemon = 43,
    Pain = 44,
    Agony = 45,
    DispelUndead = 46,
    Disintegration = 47,
    Sleep = 48,
    Hibernation = 49,
    Corona = 50,
    Petrify = 51,
    Porkalator = 52,
    Blink = 53,
}

const FIRST_ENCHANTMENT: Flavor = Flavor::Slow;
const LAST_ENCHANTMENT: Flavor = Flavor::Blink;

/// Flavors a `Random` bolt picks from
const RANDOM_FLAVORS: [Flavor; 7] = [
    Flavor::Fire,
    Flavor::Cold,
    Flavor::Magic,
    Flavor::Electricity,
    Flavor::Poison,
    Flavor::Negative,
    Flavor::Acid,
];

/// Flavors a `Chaos` bolt picks from
const CHAOS_FLAVORS: [Flavor; 16] = [
    Flavor::Fire,
    Flavor::Cold,
    Flavor::Electricity,
    Flavor::Poison,
    Flavor::Negative,
    Flavor::Acid,
    Flavor::Miasma,
    Flavor::Holy,
    Flavor::Ice,
    Flavor::Slow,
    Flavor::Haste,
    Flavor::Confusion,
    Flavor::Invisibility,
    Flavor::Polymorph,
    Flavor::Teleport,
    Flavor::Petrify,
];

/// Resistance track an actor uses against a flavor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Element {
    Fire,
    Cold,
    Electricity,
    Poison,
    Negative,
    Acid,
}

impl Flavor {
    /// Non-damaging effect resolved by a magic resistance check
    pub const fn is_enchantment(&self) -> bool {
        let v = *self as u8;
        v >= FIRST_ENCHANTMENT as u8 && v <= LAST_ENCHANTMENT as u8
    }

    /// Whether a bolt may be fired with this flavor
    pub const fn is_real(&self) -> bool {
        !matches!(self, Flavor::None)
    }

    /// Flavor changes from cell to cell
    pub const fn is_randomizing(&self) -> bool {
        matches!(self, Flavor::Random | Flavor::Chaos)
    }

    pub const fn is_chaotic(&self) -> bool {
        matches!(self, Flavor::Chaos)
    }

    pub const fn is_fiery(&self) -> bool {
        matches!(self, Flavor::Fire | Flavor::Hellfire | Flavor::Lava)
    }

    /// The resistance consulted when this flavor deals damage
    pub const fn element(&self) -> Option<Element> {
        match self {
            Flavor::Fire | Flavor::Steam | Flavor::Lava | Flavor::Hellfire => Some(Element::Fire),
            Flavor::Cold | Flavor::Ice => Some(Element::Cold),
            Flavor::Electricity => Some(Element::Electricity),
            Flavor::Poison | Flavor::PoisonArrow => Some(Element::Poison),
            Flavor::Negative | Flavor::Miasma | Flavor::Pain | Flavor::Agony => {
                Some(Element::Negative)
            }
            Flavor::Acid => Some(Element::Acid),
            _ => None,
        }
    }

    /// Cloud left in each cell when this flavor explodes, if any
    pub const fn explosion_cloud(&self) -> Option<CloudKind> {
        match self {
            Flavor::Steam => Some(CloudKind::Steam),
            Flavor::Miasma => Some(CloudKind::Miasma),
            _ => None,
        }
    }

    /// Pick the concrete flavor for one cell of a randomizing bolt.
    ///
    /// Non-randomizing flavors are returned unchanged.
    pub fn randomize(self, rng: &mut GameRng) -> Flavor {
        let table: &[Flavor] = match self {
            Flavor::Random => &RANDOM_FLAVORS,
            Flavor::Chaos => &CHAOS_FLAVORS,
            _ => return self,
        };
        rng.choose(table).copied().unwrap_or(self)
    }

    /// Noun used in messages when a bolt has no name of its own
    pub const fn noun(&self) -> &'static str {
        match self {
            Flavor::Fire | Flavor::Hellfire => "flame",
            Flavor::Cold | Flavor::Ice => "frost",
            Flavor::Electricity => "lightning",
            Flavor::Poison | Flavor::PoisonArrow => "poison",
            Flavor::Negative => "negative energy",
            Flavor::Acid => "acid",
            Flavor::Miasma => "foul vapour",
            Flavor::Holy => "golden flame",
            Flavor::Lava => "magma",
            Flavor::Steam => "steam",
            Flavor::Frag => "shrapnel",
            Flavor::Water => "water",
            Flavor::Light => "light",
            Flavor::Chaos | Flavor::Random => "chaos",
            _ => "bolt",
        }
    }
}
