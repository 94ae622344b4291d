//! Named bolt effects: wands, spells and breaths

mod formula;
mod zap;
mod zap_data;

pub use formula::{DamageFormula, HitFormula};
pub use zap::{Colour, ZapFlags, ZapId, ZapInfo, ZapRegistry, all_zaps, configure, zap};
