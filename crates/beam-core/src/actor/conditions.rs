//! Temporary conditions bolts can inflict

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

bitflags! {
    /// Set of conditions currently affecting an actor
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Conditions: u32 {
        const SLOW = 0x0000_0001;
        const HASTE = 0x0000_0002;
        const PARALYSED = 0x0000_0004;
        const CONFUSED = 0x0000_0008;
        const INVISIBLE = 0x0000_0010;
        const CHARMED = 0x0000_0020;
        const PETRIFYING = 0x0000_0040;
        const PETRIFIED = 0x0000_0080;
        const ASLEEP = 0x0000_0100;
        /// Recently woken from magical sleep; cannot be put under again
        const SLEEP_WARY = 0x0000_0200;
        const POISONED = 0x0000_0400;
        const CORONA = 0x0000_0800;
        const STICKY_FLAME = 0x0000_1000;
        const ROTTING = 0x0000_2000;
        const CORRODED = 0x0000_4000;
        const CAUGHT = 0x0000_8000;
    }
}

/// A single condition, as passed to `Actors::apply_condition`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Condition {
    Slow,
    Haste,
    Paralysed,
    Confused,
    Invisible,
    Charmed,
    Petrifying,
    Petrified,
    Asleep,
    SleepWary,
    Poisoned,
    Corona,
    StickyFlame,
    Rotting,
    Corroded,
    Caught,
}

impl Condition {
    pub const fn flag(&self) -> Conditions {
        match self {
            Condition::Slow => Conditions::SLOW,
            Condition::Haste => Conditions::HASTE,
            Condition::Paralysed => Conditions::PARALYSED,
            Condition::Confused => Conditions::CONFUSED,
            Condition::Invisible => Conditions::INVISIBLE,
            Condition::Charmed => Conditions::CHARMED,
            Condition::Petrifying => Conditions::PETRIFYING,
            Condition::Petrified => Conditions::PETRIFIED,
            Condition::Asleep => Conditions::ASLEEP,
            Condition::SleepWary => Conditions::SLEEP_WARY,
            Condition::Poisoned => Conditions::POISONED,
            Condition::Corona => Conditions::CORONA,
            Condition::StickyFlame => Conditions::STICKY_FLAME,
            Condition::Rotting => Conditions::ROTTING,
            Condition::Corroded => Conditions::CORRODED,
            Condition::Caught => Conditions::CAUGHT,
        }
    }

    /// Conditions whose "duration" is a number of stacked levels
    pub const fn stacks(&self) -> bool {
        matches!(self, Condition::Poisoned | Condition::StickyFlame)
    }
}

/// How long a condition lasts once applied
///
/// For stacking conditions (`Condition::stacks`) `Turns` is the number of
/// levels added rather than a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    Turns(i32),
    Permanent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_flags_are_distinct() {
        let mut all = Conditions::empty();
        for c in Condition::iter() {
            assert!(!all.intersects(c.flag()), "{c} shares a bit");
            all |= c.flag();
        }
        assert_eq!(all, Conditions::all());
    }
}
