//! Random number generation for beam resolution
//!
//! Uses a seeded ChaCha RNG so a shot can be replayed exactly from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Engine random number generator
///
/// Wraps ChaCha8Rng for reproducible rolls.
/// Note: only the seed is serialized; deserializing restarts the stream.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns 1..n, or 0 if n is 0.
    pub fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// Signed variant of `rn2`: returns 0..n-1, or 0 for any n <= 0.
    ///
    /// Combat numbers are signed throughout the engine, so this is the
    /// roll used by damage, armour and resistance code.
    pub fn random2(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Roll n dice with m sides and sum them
    pub fn dice(&mut self, n: u32, m: u32) -> u32 {
        (0..n).map(|_| self.rnd(m)).sum()
    }

    /// Returns a value in `low..=high`, or `low` when the range is empty.
    pub fn random_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true half of the time
    pub fn coinflip(&mut self) -> bool {
        self.rn2(2) == 0
    }

    /// Returns true with probability percent/100
    pub fn percent(&mut self, percent: u32) -> bool {
        self.rn2(100) < percent
    }

    /// Returns true with probability num/den
    pub fn x_chance_in_y(&mut self, num: i32, den: i32) -> bool {
        if num <= 0 {
            return false;
        }
        num >= den || self.random2(den) < num
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }

    /// Uniform float in `[low, high)`, used for ray perturbation.
    pub fn float_range(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            assert!(rng.rn2(10) < 10);
        }
    }

    #[test]
    fn test_random2_signed() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.random2(7);
            assert!((0..7).contains(&n));
        }
        assert_eq!(rng.random2(0), 0);
        assert_eq!(rng.random2(-5), 0);
    }

    #[test]
    fn test_dice() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.dice(2, 6);
            assert!((2..=12).contains(&n));
        }
    }

    #[test]
    fn test_random_range_inclusive() {
        let mut rng = GameRng::new(9);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..500 {
            let v = rng.random_range(-90, 90);
            assert!((-90..=90).contains(&v));
            seen_low |= v == -90;
            seen_high |= v == 90;
        }
        assert!(seen_low && seen_high);
        assert_eq!(rng.random_range(4, 4), 4);
        assert_eq!(rng.random_range(4, 1), 4);
    }

    #[test]
    fn test_x_chance_in_y_edges() {
        let mut rng = GameRng::new(1);
        assert!(!rng.x_chance_in_y(0, 10));
        assert!(rng.x_chance_in_y(10, 10));
        assert!(rng.x_chance_in_y(12, 10));
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
        }
    }

    #[test]
    fn test_serde_keeps_seed() {
        let rng = GameRng::new(77);
        let json = serde_json::to_string(&rng).unwrap();
        let back: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed(), 77);
    }
}
