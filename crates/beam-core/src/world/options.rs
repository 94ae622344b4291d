//! Engine options
//!
//! Tunable balance rules, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BeamError;
use crate::consts::{
    CHAOS_BOUNCE_RETRIES, DEFAULT_FOE_RATIO, HIT_CAP, MAX_EXPLOSION_RADIUS, MAX_REFLECTIONS,
};

/// Options shared by every pass fired through a `BeamEngine`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamOptions {
    /// Hits one actor can take from a single pass; never above `HIT_CAP`
    pub hit_cap: u8,
    /// Explosions are clamped to this radius
    pub max_explosion_radius: i32,
    /// Attempts to find a perturbed bounce direction for chaotic bolts
    pub chaos_bounce_retries: u32,
    /// Reflections before shields only block
    pub max_reflections: u32,
    /// Record the explosion draw pass in real outcomes
    pub animate: bool,
    /// Percentage of predicted power that must land on foes for an AI to fire
    pub foe_ratio: i32,
}

impl Default for BeamOptions {
    fn default() -> Self {
        Self {
            hit_cap: HIT_CAP,
            max_explosion_radius: MAX_EXPLOSION_RADIUS,
            chaos_bounce_retries: CHAOS_BOUNCE_RETRIES,
            max_reflections: MAX_REFLECTIONS,
            animate: true,
            foe_ratio: DEFAULT_FOE_RATIO,
        }
    }
}

impl BeamOptions {
    /// Load options from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, BeamError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse options from JSON; missing fields keep their defaults
    pub fn from_json(contents: &str) -> Result<Self, BeamError> {
        let options: BeamOptions = serde_json::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), BeamError> {
        if !(1..=HIT_CAP).contains(&self.hit_cap) {
            return Err(BeamError::InvalidOptions(format!(
                "hit_cap must be within 1..={HIT_CAP}"
            )));
        }
        if !(0..=MAX_EXPLOSION_RADIUS).contains(&self.max_explosion_radius) {
            return Err(BeamError::InvalidOptions(format!(
                "max_explosion_radius must be within 0..={MAX_EXPLOSION_RADIUS}"
            )));
        }
        if !(0..=100).contains(&self.foe_ratio) {
            return Err(BeamError::InvalidOptions("foe_ratio is a percentage".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = BeamOptions::default();
        assert_eq!(opts.hit_cap, 2);
        assert_eq!(opts.max_explosion_radius, 9);
        assert_eq!(opts.chaos_bounce_retries, 20);
        assert!(opts.animate);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts = BeamOptions::from_json(r#"{ "animate": false, "foe_ratio": 60 }"#).unwrap();
        assert!(!opts.animate);
        assert_eq!(opts.foe_ratio, 60);
        assert_eq!(opts.hit_cap, 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(BeamOptions::from_json(r#"{ "hit_cap": 0 }"#).is_err());
        assert!(BeamOptions::from_json(r#"{ "hit_cap": 5 }"#).is_err());
        assert!(BeamOptions::from_json(r#"{ "hit_cap": 1 }"#).is_ok());
        assert!(BeamOptions::from_json(r#"{ "max_explosion_radius": 12 }"#).is_err());
        assert!(BeamOptions::from_json("not json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let opts = BeamOptions {
            max_reflections: 1,
            ..BeamOptions::default()
        };
        assert_eq!(BeamOptions::from_json(&opts.to_json()).unwrap(), opts);
    }
}
