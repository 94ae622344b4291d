//! What a firing pass reports back

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::actor::ActorId;
use crate::combat::Flavor;
use crate::dungeon::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum FireStatus {
    #[default]
    Completed,
    /// The player backed out of a confirmation prompt
    Aborted,
}

/// Behaviour a deity or the scoring system may care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Conduct {
    AttackFriend,
    AttackHoly,
    Necromancy,
    Poison,
    BurnTrees,
    DestroyIdol,
}

/// Something to be credited to the shooter after the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Credit {
    Conduct { conduct: Conduct, amount: i32 },
    /// A successful, visible application of `flavor` to `target`
    Effect { target: ActorId, flavor: Flavor },
    /// The shot only hurt friends or only helped foes
    Amusement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Noise {
    pub pos: Coord,
    pub loudness: i32,
}

/// Friend and foe tallies of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImpactStats {
    pub foe_count: i32,
    pub foe_power: i32,
    pub foe_hurt: i32,
    pub foe_helped: i32,
    pub fr_count: i32,
    pub fr_power: i32,
    pub fr_hurt: i32,
    pub fr_helped: i32,
}

impl ImpactStats {
    /// Whether an AI caster should take the shot: it must reach at least
    /// one foe, and at least `foe_ratio` percent of the power it affects
    /// must be foes.
    pub fn worth_firing(&self, foe_ratio: i32) -> bool {
        self.foe_count > 0 && self.foe_power * 100 >= foe_ratio * (self.foe_power + self.fr_power)
    }

    pub(crate) fn record(&mut self, friend: bool, power: i32, hurt: bool, helped: bool) {
        let (count, total, hurt_n, helped_n) = if friend {
            (
                &mut self.fr_count,
                &mut self.fr_power,
                &mut self.fr_hurt,
                &mut self.fr_helped,
            )
        } else {
            (
                &mut self.foe_count,
                &mut self.foe_power,
                &mut self.foe_hurt,
                &mut self.foe_helped,
            )
        };
        *count += 1;
        *total += power;
        if hurt {
            *hurt_n += 1;
        }
        if helped {
            *helped_n += 1;
        }
    }

    /// The shot only hurt friends, or only helped foes
    pub fn is_amusing(&self) -> bool {
        (self.fr_hurt > 0 && self.foe_hurt == 0) || (self.foe_helped > 0 && self.fr_helped == 0 && self.foe_hurt == 0)
    }
}

/// Everything a pass did, for the caller to present and credit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeamOutcome {
    pub status: FireStatus,
    /// Aborted shots cost no time
    pub turn_spent: bool,
    /// The player could tell what the shot did
    pub obvious: bool,
    pub messages: Vec<String>,
    pub credits: Vec<Credit>,
    pub killed: Vec<ActorId>,
    /// Actors an explosion or big cloud flew over on its way out
    pub contacts: Vec<ActorId>,
    pub noises: Vec<Noise>,
    /// Explosion draw pass, one ring of cells per frame
    pub frames: Vec<Vec<Coord>>,
    /// Where a thrown item comes to rest
    pub item_landing: Option<Coord>,
    pub path: Vec<Coord>,
    pub stats: ImpactStats,
}

impl BeamOutcome {
    pub fn new() -> Self {
        Self {
            turn_spent: true,
            ..Self::default()
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            status: FireStatus::Aborted,
            turn_spent: false,
            messages: vec![message.into()],
            ..Self::default()
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.status == FireStatus::Aborted
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.messages.push(msg.into());
        self
    }

    pub(crate) fn message(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worth_firing_needs_a_foe() {
        let stats = ImpactStats::default();
        assert!(!stats.worth_firing(80));
    }

    #[test]
    fn test_worth_firing_ratio() {
        let mut stats = ImpactStats::default();
        stats.record(false, 8, true, false);
        assert!(stats.worth_firing(80));
        stats.record(true, 2, true, false);
        // 8 of 10
        assert!(stats.worth_firing(80));
        stats.record(true, 1, true, false);
        assert!(!stats.worth_firing(80));
    }

    #[test]
    fn test_amusement() {
        let mut stats = ImpactStats::default();
        stats.record(true, 3, true, false);
        assert!(stats.is_amusing());
        stats.record(false, 3, true, false);
        assert!(!stats.is_amusing());

        let mut helped = ImpactStats::default();
        helped.record(false, 5, false, true);
        assert!(helped.is_amusing());
    }

    #[test]
    fn test_aborted_outcome_costs_no_turn() {
        let out = BeamOutcome::aborted("Never mind.");
        assert!(out.is_aborted());
        assert!(!out.turn_spent);
        assert_eq!(out.messages, vec!["Never mind.".to_string()]);
        assert!(BeamOutcome::new().turn_spent);
    }
}
