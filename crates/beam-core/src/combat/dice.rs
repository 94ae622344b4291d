//! Dice, to-hit rolls and armour mitigation

use serde::{Deserialize, Serialize};

use super::Flavor;
use crate::rng::GameRng;

/// `num` dice of `size` sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiceDef {
    pub num: i32,
    pub size: i32,
}

impl DiceDef {
    pub const fn new(num: i32, size: i32) -> Self {
        Self { num, size }
    }

    pub const fn is_zero(&self) -> bool {
        self.num <= 0 || self.size <= 0
    }

    /// Highest possible roll
    pub const fn max(&self) -> i32 {
        if self.is_zero() { 0 } else { self.num * self.size }
    }

    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        if self.is_zero() {
            return 0;
        }
        rng.dice(self.num as u32, self.size as u32) as i32
    }

    /// Split a damage ceiling over `num` dice.
    ///
    /// The remainder of `max / num` is honoured on average by bumping the
    /// die size with probability `(max % num) / num`.
    pub fn calc(num: i32, max: i32, rng: &mut GameRng) -> Self {
        if num <= 1 {
            DiceDef::new(1, max)
        } else if max <= num {
            DiceDef::new(max, 1)
        } else {
            let mut size = max / num;
            if rng.x_chance_in_y(max % num, num) {
                size += 1;
            }
            DiceDef::new(num, size)
        }
    }
}

impl core::fmt::Display for DiceDef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}d{}", self.num, self.size)
    }
}

/// Accuracy of a bolt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToHit {
    /// Never misses; also used for every enchantment
    Automatic,
    Roll(i32),
}

impl Default for ToHit {
    fn default() -> Self {
        ToHit::Roll(0)
    }
}

impl ToHit {
    pub const fn is_automatic(&self) -> bool {
        matches!(self, ToHit::Automatic)
    }

    /// Reduce accuracy, never below zero. Automatic hits are unaffected.
    pub const fn penalized(self, amount: i32) -> ToHit {
        match self {
            ToHit::Automatic => ToHit::Automatic,
            ToHit::Roll(v) => {
                let v = v - amount;
                ToHit::Roll(if v < 0 { 0 } else { v })
            }
        }
    }
}

/// Roll a bolt's attack against a defender's evasion.
///
/// Unseen defenders halve the attack roll.
pub fn test_beam_hit(to_hit: ToHit, ev: i32, unseen: bool, rng: &mut GameRng) -> bool {
    match to_hit {
        ToHit::Automatic => true,
        ToHit::Roll(attack) => {
            let attack = if unseen { attack / 2 } else { attack };
            let defence = rng.random2(ev);
            rng.random2(attack) >= defence
        }
    }
}

/// How much armour counts against a flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmourRule {
    Full,
    Half,
    Triple,
    Bypass,
}

pub const fn armour_rule(flavor: Flavor) -> ArmourRule {
    match flavor {
        Flavor::Negative | Flavor::Miasma | Flavor::Holy => ArmourRule::Bypass,
        Flavor::Electricity => ArmourRule::Half,
        Flavor::Frag => ArmourRule::Triple,
        _ => ArmourRule::Full,
    }
}

/// Armour-class mitigation for a real hit
pub fn apply_armour(raw: i32, ac: i32, flavor: Flavor, rng: &mut GameRng) -> i32 {
    let ac = ac.max(0);
    let reduction = match armour_rule(flavor) {
        ArmourRule::Bypass => 0,
        ArmourRule::Full => rng.random2(1 + ac),
        ArmourRule::Half => rng.random2(1 + ac / 2),
        ArmourRule::Triple => (0..3).map(|_| rng.random2(1 + ac)).sum(),
    };
    (raw - reduction).max(0)
}

/// Armour-class mitigation used by predictions: the average reduction
pub const fn predict_armour(raw: i32, ac: i32, flavor: Flavor) -> i32 {
    let ac = if ac < 0 { 0 } else { ac };
    let reduction = match armour_rule(flavor) {
        ArmourRule::Bypass => 0,
        ArmourRule::Full => ac / 2,
        ArmourRule::Half => ac / 4,
        ArmourRule::Triple => 3 * ac / 2,
    };
    let v = raw - reduction;
    if v < 0 { 0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_max_and_roll() {
        let mut rng = GameRng::new(5);
        let d = DiceDef::new(3, 6);
        assert_eq!(d.max(), 18);
        for _ in 0..100 {
            assert!((3..=18).contains(&d.roll(&mut rng)));
        }
        assert_eq!(DiceDef::new(0, 6).roll(&mut rng), 0);
        assert_eq!(DiceDef::default().max(), 0);
    }

    #[test]
    fn test_calc_dice_splits_ceiling() {
        let mut rng = GameRng::new(11);
        assert_eq!(DiceDef::calc(1, 40, &mut rng), DiceDef::new(1, 40));
        assert_eq!(DiceDef::calc(0, 40, &mut rng), DiceDef::new(1, 40));
        assert_eq!(DiceDef::calc(6, 4, &mut rng), DiceDef::new(4, 1));
        assert_eq!(DiceDef::calc(4, 40, &mut rng), DiceDef::new(4, 10));
        for _ in 0..50 {
            let d = DiceDef::calc(6, 50, &mut rng);
            assert_eq!(d.num, 6);
            assert!(d.size == 8 || d.size == 9);
        }
    }

    #[test]
    fn test_automatic_hit_ignores_evasion() {
        let mut rng = GameRng::new(1);
        for _ in 0..100 {
            assert!(test_beam_hit(ToHit::Automatic, 1000, true, &mut rng));
        }
    }

    #[test]
    fn test_zero_to_hit_always_hits_zero_evasion() {
        let mut rng = GameRng::new(2);
        for _ in 0..100 {
            assert!(test_beam_hit(ToHit::Roll(0), 0, false, &mut rng));
        }
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        assert_eq!(ToHit::Roll(3).penalized(5), ToHit::Roll(0));
        assert_eq!(ToHit::Automatic.penalized(5), ToHit::Automatic);
    }

    #[test]
    fn test_armour_rules() {
        let mut rng = GameRng::new(8);
        assert_eq!(apply_armour(20, 50, Flavor::Negative, &mut rng), 20);
        assert_eq!(predict_armour(20, 10, Flavor::Fire), 15);
        assert_eq!(predict_armour(20, 10, Flavor::Electricity), 18);
        assert_eq!(predict_armour(20, 10, Flavor::Frag), 5);
        assert_eq!(predict_armour(3, 40, Flavor::Frag), 0);
        for _ in 0..100 {
            let v = apply_armour(20, 10, Flavor::Fire, &mut rng);
            assert!((10..=20).contains(&v));
            assert_eq!(apply_armour(20, 0, Flavor::Fire, &mut rng), 20);
        }
    }
}
