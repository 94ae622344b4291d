//! The world a bolt flies through
//!
//! Everything the engine reads or changes outside the bolt itself goes
//! through these traits. Prediction passes only ever see `&W`, so a
//! tracer cannot reach the mutating half of the interface.

mod errors;
mod options;

pub use errors::{BeamError, config_bug};
pub use options::BeamOptions;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::actor::{Actor, ActorId, Attitude, Condition, Duration};
use crate::combat::Flavor;
use crate::dungeon::{CloudKind, Coord, Feature};

/// Terrain query and mutation
pub trait Terrain {
    /// Width and height of the playable grid
    fn dimensions(&self) -> (i32, i32);

    fn in_bounds(&self, pos: Coord) -> bool {
        let (w, h) = self.dimensions();
        pos.x >= 0 && pos.y >= 0 && pos.x < w && pos.y < h
    }

    fn feature_at(&self, pos: Coord) -> Feature;

    fn is_solid(&self, pos: Coord) -> bool {
        self.feature_at(pos).is_solid()
    }

    /// Cells under a protective ward are never touched by area effects
    fn is_protected_ward(&self, pos: Coord) -> bool;

    fn destroy_feature(&mut self, pos: Coord, replacement: Feature);
}

/// How an actor is moved away by an enchantment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Relocation {
    Teleport,
    Blink,
    Banish,
}

/// What an actor is polymorphed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PolymorphKind {
    Random,
    /// Degeneration into a pulsating lump
    Lump,
    Hog,
}

/// The actor model
pub trait Actors {
    fn actor_at(&self, pos: Coord) -> Option<ActorId>;

    fn actor(&self, id: ActorId) -> Option<&Actor>;

    fn is_alive(&self, id: ActorId) -> bool {
        self.actor(id).is_some_and(Actor::is_alive)
    }

    fn position(&self, id: ActorId) -> Option<Coord> {
        self.actor(id).map(|a| a.pos)
    }

    fn resistance_level(&self, id: ActorId, flavor: Flavor) -> i32 {
        self.actor(id).map_or(0, |a| a.resists.against(flavor))
    }

    /// Returns true if the damage killed the actor
    fn apply_damage(
        &mut self,
        id: ActorId,
        amount: i32,
        flavor: Flavor,
        source: Option<ActorId>,
    ) -> bool;

    /// Returns false if the condition could not be applied
    fn apply_condition(
        &mut self,
        id: ActorId,
        condition: Condition,
        duration: Duration,
        source: Option<ActorId>,
    ) -> bool;

    fn remove_condition(&mut self, id: ActorId, condition: Condition) -> bool;

    /// Returns the hit points actually restored
    fn heal(&mut self, id: ActorId, amount: i32) -> i32;

    /// Drain life force: lose `hp` maximum and current hit points, and a
    /// hit die if `level` is set.
    fn drain(&mut self, id: ActorId, hp: i32, level: bool);

    fn set_attitude(&mut self, id: ActorId, attitude: Attitude);

    fn relocate(&mut self, id: ActorId, how: Relocation);

    fn polymorph(&mut self, id: ActorId, into: PolymorphKind);
}

/// The cloud subsystem
pub trait Clouds {
    fn cloud_at(&self, pos: Coord) -> Option<CloudKind>;

    fn place_cloud(&mut self, kind: CloudKind, pos: Coord, duration: i32, source: Option<ActorId>);

    /// Cloud left behind by a cloud-shaped bolt of this flavor
    fn cloud_type_for(&self, flavor: Flavor) -> Option<CloudKind> {
        match flavor {
            Flavor::Fire | Flavor::Hellfire => Some(CloudKind::Fire),
            Flavor::Cold | Flavor::Ice => Some(CloudKind::Cold),
            Flavor::Poison => Some(CloudKind::Poison),
            Flavor::Steam => Some(CloudKind::Steam),
            Flavor::Miasma => Some(CloudKind::Miasma),
            _ => None,
        }
    }
}

/// What the player can perceive
pub trait Senses {
    fn is_visible_to_player(&self, pos: Coord) -> bool;

    fn can_player_hear(&self, pos: Coord) -> bool;
}

/// Everything a firing pass needs from its surroundings
pub trait World: Terrain + Actors + Clouds + Senses {}

impl<T: Terrain + Actors + Clouds + Senses + ?Sized> World for T {}

/// Source of yes/no decisions for interactive prompts
pub trait Prompter {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Declines every prompt; used for monsters and automated callers
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;

impl Prompter for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Accepts every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

impl<F: FnMut(&str) -> bool> Prompter for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_prompter_sees_prompt() {
        let mut seen = Vec::new();
        let mut p = |q: &str| {
            seen.push(q.to_string());
            true
        };
        assert!(p.confirm("Really?"));
        assert!(!AutoDecline.confirm("Really?"));
        assert!(AutoConfirm.confirm("Really?"));
        assert_eq!(seen, vec!["Really?".to_string()]);
    }
}
