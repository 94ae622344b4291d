//! Combat resolution for bolts
//!
//! Flavors, dice, to-hit, armour, and the two resolvers: flavor resistance
//! for damaging bolts and magic resistance for enchantments.

mod dice;
pub mod enchant;
mod flavor;
mod intent;
pub mod resist;

pub use dice::{
    ArmourRule, DiceDef, ToHit, apply_armour, armour_rule, predict_armour, test_beam_hit,
};
pub use enchant::{EnchantAction, EnchantPlan, EnchantRequest, EnchantVerdict, plan_enchantment};
pub use flavor::{Element, Flavor};
pub use intent::{is_nasty_to, is_nice_to};
pub use resist::{ResistReport, ResistVerdict, ResolveMode, SideEffect, resolve_flavor};
