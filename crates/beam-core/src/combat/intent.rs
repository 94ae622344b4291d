//! Whether a flavor harms or helps a given target
//!
//! Drives friendly-fire prompts and the hurt/helped tallies of impact
//! statistics.

use crate::actor::{Actor, Holiness};

use super::Flavor;

/// The flavor would harm (or at least annoy) this target
pub fn is_nasty_to(flavor: Flavor, target: &Actor) -> bool {
    if !flavor.is_enchantment() {
        return true;
    }
    match flavor {
        Flavor::Degenerate | Flavor::Sleep | Flavor::Hibernation => {
            target.holiness == Holiness::Natural
        }
        Flavor::DispelUndead | Flavor::EnslaveUndead => target.holiness == Holiness::Undead,
        Flavor::EnslaveDemon => target.holiness == Holiness::Demonic,
        Flavor::Pain | Flavor::Agony => target.resists.negative <= 0,
        Flavor::Haste | Flavor::Healing | Flavor::Invisibility | Flavor::Digging => false,
        _ => true,
    }
}

/// The flavor would benefit this target
pub fn is_nice_to(flavor: Flavor, target: &Actor) -> bool {
    match flavor {
        Flavor::Haste | Flavor::Invisibility => true,
        Flavor::Healing => target.hp < target.max_hp,
        _ => false,
    }
}
