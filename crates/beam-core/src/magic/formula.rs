//! Power formulas
//!
//! Registry entries describe how power scales accuracy and damage as plain
//! data; `evaluate` turns a power level into numbers.

use serde::{Deserialize, Serialize};

use crate::combat::{DiceDef, ToHit};
use crate::rng::GameRng;

/// Accuracy as a function of power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitFormula {
    Automatic,
    /// `add + power * mul / div`
    Affine { add: i32, mul: i32, div: i32 },
}

impl HitFormula {
    pub const fn flat(value: i32) -> Self {
        HitFormula::Affine {
            add: value,
            mul: 0,
            div: 1,
        }
    }

    pub const fn affine(add: i32, mul: i32, div: i32) -> Self {
        HitFormula::Affine { add, mul, div }
    }

    /// Raw value of the formula; automatic hits have none
    pub const fn value(&self, power: i32) -> Option<i32> {
        match *self {
            HitFormula::Automatic => None,
            HitFormula::Affine { add, mul, div } => Some(add + power * mul / nonzero(div)),
        }
    }

    pub const fn evaluate(&self, power: i32) -> ToHit {
        match self.value(power) {
            None => ToHit::Automatic,
            Some(v) => ToHit::Roll(v),
        }
    }
}

/// Damage dice as a function of power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageFormula {
    /// `num` dice of size `add + power * mul / div`
    Dice { num: i32, add: i32, mul: i32, div: i32 },
    /// `num` dice sharing a ceiling of `add + power * mul / div`
    CalcDice { num: i32, add: i32, mul: i32, div: i32 },
}

impl DamageFormula {
    pub const fn dice(num: i32, add: i32, mul: i32, div: i32) -> Self {
        DamageFormula::Dice { num, add, mul, div }
    }

    pub const fn calc(num: i32, add: i32, mul: i32, div: i32) -> Self {
        DamageFormula::CalcDice { num, add, mul, div }
    }

    pub fn evaluate(&self, power: i32, rng: &mut GameRng) -> DiceDef {
        match *self {
            DamageFormula::Dice { num, add, mul, div } => {
                DiceDef::new(num, add + power * mul / nonzero(div))
            }
            DamageFormula::CalcDice { num, add, mul, div } => {
                DiceDef::calc(num, add + power * mul / nonzero(div), rng)
            }
        }
    }
}

const fn nonzero(div: i32) -> i32 {
    if div == 0 { 1 } else { div }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_hit() {
        let f = HitFormula::affine(8, 1, 10);
        assert_eq!(f.evaluate(50), ToHit::Roll(13));
        assert_eq!(HitFormula::flat(40).evaluate(200), ToHit::Roll(40));
        assert_eq!(HitFormula::Automatic.evaluate(10), ToHit::Automatic);
    }

    #[test]
    fn test_dice_damage() {
        let mut rng = GameRng::new(1);
        let f = DamageFormula::dice(2, 4, 1, 10);
        assert_eq!(f.evaluate(50, &mut rng), DiceDef::new(2, 9));
    }

    #[test]
    fn test_calc_dice_damage() {
        let mut rng = GameRng::new(1);
        let f = DamageFormula::calc(6, 18, 2, 3);
        // ceiling 18 + 100 * 2 / 3 = 84, split over six dice
        assert_eq!(f.evaluate(100, &mut rng), DiceDef::new(6, 14));
    }

    #[test]
    fn test_zero_divisor_is_treated_as_one() {
        assert_eq!(HitFormula::affine(1, 2, 0).value(3), Some(7));
    }
}
