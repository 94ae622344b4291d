//! Bolts meeting solid terrain

use serde::{Deserialize, Serialize};
use strum::Display;

use super::bolt::{Bolt, BoltFlags, Thrower};
use super::outcome::{Conduct, Credit, Noise};
use super::pass::Pass;
use crate::combat::Flavor;
use crate::dungeon::{CloudKind, Coord, Feature};
use crate::world::{Prompter, World};

/// Whether a bolt can change a solid feature it runs into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum WallEffect {
    Yes,
    No,
    /// Left to chance: optimistic when predicting, a coin flip for real
    Maybe,
}

/// Minimum dice count for disintegration to bring down walls
const DISINTEGRATION_WALL_DICE: i32 = 3;

/// Turns a burning tree or wax wall keeps smouldering
const BURN_CLOUD_TURNS: i32 = 10;

const WALL_NOISE: i32 = 10;

pub fn can_affect_wall(bolt: &Bolt, feature: Feature) -> WallEffect {
    if !feature.is_solid() || feature.is_permanent() || bolt.is_smite() {
        return WallEffect::No;
    }
    let flavor = bolt.real_flavor;

    if flavor == Flavor::Digging && feature.is_diggable() {
        return WallEffect::Yes;
    }
    if flavor == Flavor::Disintegration
        && bolt.damage.num >= DISINTEGRATION_WALL_DICE
        && !matches!(feature, Feature::MetalWall | Feature::GreenCrystalWall)
    {
        return WallEffect::Yes;
    }
    if flavor == Flavor::Nuke {
        return WallEffect::Yes;
    }

    let hot = flavor.is_fiery() || flavor == Flavor::Electricity;
    if feature == Feature::Tree && hot && bolt.flags.contains(BoltFlags::BURNS_TREES) {
        return if bolt.flags.contains(BoltFlags::SUPERHOT) {
            WallEffect::Yes
        } else {
            WallEffect::Maybe
        };
    }
    if feature == Feature::WaxWall && flavor.is_fiery() {
        return WallEffect::Yes;
    }
    WallEffect::No
}

impl<W: World + ?Sized, P: Prompter + ?Sized> Pass<'_, W, P> {
    /// Destroy or transform the wall at `pos`; the bolt ends there
    pub(super) fn affect_wall(&mut self, pos: Coord, feature: Feature) {
        if self.is_tracer() {
            return;
        }
        let seen = self.world().is_visible_to_player(pos);
        let heard = self.world().can_player_hear(pos);
        let by_player = self.bolt.thrower == Thrower::Player;
        let agent = self.bolt.agent;

        self.commit(|w| w.destroy_feature(pos, Feature::Floor));
        tracing::debug!(target: "beam", %pos, %feature, flavor = %self.bolt.real_flavor, "wall destroyed");

        let (sight, sound) = match feature {
            _ if self.bolt.real_flavor == Flavor::Digging => {
                (None, Some("You hear a grinding noise.".to_string()))
            }
            Feature::Tree => {
                if by_player {
                    self.conduct(Conduct::BurnTrees, 1);
                }
                self.commit(|w| w.place_cloud(CloudKind::Fire, pos, BURN_CLOUD_TURNS, agent));
                (
                    Some("The tree burns like a torch!".to_string()),
                    Some("You hear a crackling sound.".to_string()),
                )
            }
            Feature::WaxWall => {
                self.commit(|w| w.place_cloud(CloudKind::Fire, pos, BURN_CLOUD_TURNS, agent));
                (
                    Some("The wax bubbles and burns!".to_string()),
                    Some("You hear a sizzling sound.".to_string()),
                )
            }
            Feature::Idol => {
                if by_player {
                    self.conduct(Conduct::DestroyIdol, 1);
                }
                (
                    Some("You hear a hideous screaming as the idol crumbles!".to_string()),
                    Some("You hear a hideous screaming!".to_string()),
                )
            }
            Feature::Statue => (
                Some("The statue crumbles!".to_string()),
                Some("You hear a crash.".to_string()),
            ),
            f if f.is_door() => (
                Some("The door bursts into splinters!".to_string()),
                Some("You hear a sharp crack.".to_string()),
            ),
            f => (
                Some(format!("The {} crumbles!", f.name())),
                Some("You hear a grinding noise.".to_string()),
            ),
        };

        if seen {
            self.bolt.obvious_effect = true;
            if let Some(msg) = sight {
                self.out.message(msg);
            }
        } else if heard {
            if let Some(msg) = sound {
                self.out.message(msg);
            }
        }
        self.out.noises.push(Noise {
            pos,
            loudness: WALL_NOISE,
        });
    }

    fn conduct(&mut self, conduct: Conduct, amount: i32) {
        self.out.credits.push(Credit::Conduct { conduct, amount });
    }
}
