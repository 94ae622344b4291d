//! One firing pass
//!
//! A `Pass` flies a bolt through the world cell by cell. The same step
//! logic serves real shots and predictions: a real pass holds `&mut W`
//! and commits effects, a prediction holds `&W` and can only look.

use super::bolt::{Bolt, Thrower};
use super::los::ray_or_straight;
use super::outcome::{BeamOutcome, Credit, FireStatus};
use super::ray::Ray;
use super::wall::{WallEffect, can_affect_wall};
use crate::consts::CLOUD_HIT_PENALTY;
use crate::dungeon::Coord;
use crate::rng::GameRng;
use crate::world::{BeamOptions, Prompter, World, config_bug};

/// How a pass reaches the world
pub(super) enum Access<'a, W: ?Sized> {
    /// Real shot: effects are committed
    Commit(&'a mut W),
    /// Prediction: read only
    Predict(&'a W),
}

impl<W: ?Sized> Access<'_, W> {
    pub(super) fn get(&self) -> &W {
        match self {
            Access::Commit(w) => w,
            Access::Predict(w) => w,
        }
    }

    pub(super) fn get_mut(&mut self) -> Option<&mut W> {
        match self {
            Access::Commit(w) => Some(&mut **w),
            Access::Predict(_) => None,
        }
    }
}

/// Result of running into a solid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WallStep {
    /// The wall was affected and the bolt ends there
    Affected,
    Bounced,
    /// The bolt stops in front of the wall
    Stopped,
}

pub(super) struct Pass<'a, W: World + ?Sized, P: Prompter + ?Sized> {
    pub(super) access: Access<'a, W>,
    pub(super) bolt: &'a mut Bolt,
    pub(super) rng: &'a mut GameRng,
    pub(super) prompter: &'a mut P,
    pub(super) options: &'a BeamOptions,
    pub(super) out: BeamOutcome,
    pub(super) ray: Ray,
    /// To-hit lost to clouds along this pass
    pub(super) to_hit_penalty: i32,
    /// The friendly fire question has been asked
    pub(super) prompted: bool,
    pub(super) in_explosion: bool,
}

impl<'a, W: World + ?Sized, P: Prompter + ?Sized> Pass<'a, W, P> {
    pub(super) fn new(
        access: Access<'a, W>,
        bolt: &'a mut Bolt,
        rng: &'a mut GameRng,
        prompter: &'a mut P,
        options: &'a BeamOptions,
    ) -> Self {
        let ray = Ray::new(bolt.source, bolt.target);
        Self {
            access,
            bolt,
            rng,
            prompter,
            options,
            out: BeamOutcome::new(),
            ray,
            to_hit_penalty: 0,
            prompted: false,
            in_explosion: false,
        }
    }

    pub(super) fn is_tracer(&self) -> bool {
        matches!(self.access, Access::Predict(_))
    }

    pub(super) fn world(&self) -> &W {
        self.access.get()
    }

    /// Run `f` against the world if this pass commits effects
    pub(super) fn commit<R>(&mut self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        self.access.get_mut().map(f)
    }

    /// Fly the bolt from source to wherever it stops, then finish it
    pub(super) fn run(mut self) -> BeamOutcome {
        self.initialize();

        if self.bolt.is_smite() {
            let target = self.bolt.target;
            self.bolt.pos = target;
            self.bolt.path.push(target);
            self.affect_cell(target);
        } else if self.bolt.aimed_at_feet {
            let source = self.bolt.source;
            self.bolt.path.push(source);
            self.affect_cell(source);
        } else {
            self.trace_path();
        }

        if !self.bolt.cancelled {
            self.finish();
        }
        self.conclude()
    }

    /// Reset the bolt for a new pass and check its configuration
    pub(super) fn initialize(&mut self) {
        self.bolt.reset_pass();

        if self.bolt.range < 0 {
            config_bug(&format!("bolt {} has negative range {}", self.bolt.display_name(), self.bolt.range));
        }
        if !self.world().in_bounds(self.bolt.source) {
            config_bug(&format!("bolt source {} is out of bounds", self.bolt.source));
        }
        if !self.bolt.real_flavor.is_real() {
            config_bug(&format!("bolt {} fired without a flavor", self.bolt.display_name()));
        }

        self.bolt.aimed_at_feet = self.bolt.source == self.bolt.target;
        self.ray = match self.bolt.ray {
            Some(ray) => ray,
            None => ray_or_straight(self.world(), self.bolt.source, self.bolt.target),
        };

        tracing::debug!(
            target: "beam",
            name = self.bolt.display_name(),
            shape = ?self.bolt.shape,
            source = %self.bolt.source,
            aim = %self.bolt.target,
            flavor = %self.bolt.real_flavor,
            to_hit = ?self.bolt.to_hit,
            damage = %self.bolt.damage,
            range = self.bolt.range,
            tracer = self.is_tracer(),
            "firing"
        );
    }

    fn trace_path(&mut self) {
        let (w, h) = self.world().dimensions();
        let max_regress = 2 * w.max(h).max(1);

        while !self.bolt.cancelled && self.bolt.range_used() < self.bolt.range {
            self.ray.advance();
            let pos = self.ray.pos();

            if !self.world().in_bounds(pos) {
                self.recover_bounds(max_regress);
                break;
            }

            if self.world().is_solid(pos) {
                match self.wall_contact(pos) {
                    WallStep::Bounced => continue,
                    WallStep::Affected => {
                        self.bolt.steps += 1;
                        break;
                    }
                    WallStep::Stopped => break,
                }
            }

            self.bolt.steps += 1;
            self.bolt.pos = pos;
            self.bolt.path.push(pos);
            tracing::trace!(target: "beam", %pos, used = self.bolt.range_used(), "step");

            if self.world().cloud_at(pos).is_some() {
                self.to_hit_penalty += CLOUD_HIT_PENALTY;
            }

            if self.affect_cell(pos) {
                break;
            }
            if self.bolt.stops_at_target() && pos == self.bolt.target {
                break;
            }
        }
    }

    /// Step back inside the map after the ray left it
    fn recover_bounds(&mut self, max_regress: i32) {
        let mut tries = 0;
        while !self.world().in_bounds(self.ray.pos()) {
            if tries >= max_regress {
                config_bug(&format!(
                    "ray for {} cannot get back in bounds from {}",
                    self.bolt.display_name(),
                    self.ray.pos()
                ));
            }
            self.ray.regress();
            tries += 1;
        }
        self.bolt.pos = self.ray.pos();
        tracing::warn!(
            target: "beam",
            pos = %self.bolt.pos,
            tries,
            "ray left the map, stopped at the edge"
        );
    }

    fn wall_contact(&mut self, pos: Coord) -> WallStep {
        let feature = self.world().feature_at(pos);
        let affects = match can_affect_wall(&*self.bolt, feature) {
            WallEffect::Yes => true,
            WallEffect::No => false,
            WallEffect::Maybe => self.is_tracer() || self.rng.coinflip(),
        };
        if affects {
            self.bolt.pos = pos;
            self.bolt.path.push(pos);
            self.affect_wall(pos, feature);
            return WallStep::Affected;
        }

        if !self.bolt.is_bouncy(feature) {
            self.ray.regress();
            self.bolt.pos = self.ray.pos();
            return WallStep::Stopped;
        }

        let world = self.access.get();
        let solid = |p: Coord| !world.in_bounds(p) || world.is_solid(p);
        if self.bolt.real_flavor.is_chaotic() {
            self.ray
                .chaos_bounce(solid, &mut *self.rng, self.options.chaos_bounce_retries);
        } else {
            self.ray.bounce(solid);
        }
        self.bolt.pos = self.ray.pos();
        if solid(self.ray.peek()) {
            // boxed in: nowhere left to go
            return WallStep::Stopped;
        }

        self.bolt.bounces += 1;
        self.bolt.bounce_pos = Some(pos);
        tracing::trace!(
            target: "beam",
            wall = %pos,
            from = %self.bolt.pos,
            bounces = self.bolt.bounces,
            "bounce"
        );
        if !self.is_tracer() && self.world().is_visible_to_player(pos) {
            let msg = format!("The {} bounces!", self.bolt.display_name());
            self.out.message(msg);
        }
        WallStep::Bounced
    }

    /// Apply the bolt to one cell of its path. Returns true if the bolt
    /// stops here.
    fn affect_cell(&mut self, pos: Coord) -> bool {
        if self.bolt.is_explosion() || self.bolt.is_big_cloud() {
            if let Some(id) = self.world().actor_at(pos) {
                if !self.out.contacts.contains(&id) {
                    self.out.contacts.push(id);
                }
            }
            return false;
        }
        match self.world().actor_at(pos) {
            Some(id) => self.affect_actor(id),
            None => false,
        }
    }

    /// Terminal phase: explode, spread cloud, land the item
    fn finish(&mut self) {
        let pos = self.bolt.pos;
        if self.bolt.is_explosion() {
            self.explode_at(pos, Default::default());
        } else if self.bolt.is_big_cloud() {
            self.big_cloud(pos);
        }

        if self.bolt.item.is_some() && !self.is_tracer() {
            self.out.item_landing = Some(self.landing_cell());
        }
    }

    /// Last open cell the bolt passed through
    fn landing_cell(&self) -> Coord {
        let world = self.world();
        self.bolt
            .path
            .iter()
            .rev()
            .copied()
            .find(|&p| world.in_bounds(p) && !world.is_solid(p))
            .unwrap_or(self.bolt.source)
    }

    pub(super) fn conclude(mut self) -> BeamOutcome {
        let tracer = self.is_tracer();

        if self.bolt.cancelled {
            self.out.status = FireStatus::Aborted;
            self.out.turn_spent = false;
        } else if !tracer {
            if self.bolt.is_enchantment()
                && !self.bolt.obvious_effect
                && self.out.messages.is_empty()
            {
                self.out.message("Nothing happens.");
            }
            if self.bolt.thrower == Thrower::Player && self.bolt.stats.is_amusing() {
                self.out.credits.push(Credit::Amusement);
            }
        }

        self.out.obvious = self.bolt.obvious_effect;
        self.out.path = self.bolt.path.clone();
        self.out.stats = self.bolt.stats;
        self.out
    }
}
