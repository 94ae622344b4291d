//! Entry points for firing bolts

use super::bolt::Bolt;
use super::explosion::ExplosionOptions;
use super::outcome::{BeamOutcome, ImpactStats};
use super::pass::{Access, Pass};
use crate::rng::GameRng;
use crate::world::{AutoDecline, BeamOptions, Prompter, World};

/// Seed of the private generator predictions roll with. Predictions
/// never touch the caller's generator, so firing a tracer first does not
/// change the outcome of the real shot.
const TRACER_SEED: u64 = 0x7472_6163_6572;

/// Fires bolts under one set of options
#[derive(Debug, Clone, Default)]
pub struct BeamEngine {
    options: BeamOptions,
}

impl BeamEngine {
    pub fn new(options: BeamOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BeamOptions {
        &self.options
    }

    /// Fire for real, committing every effect to `world`
    pub fn fire<W: World + ?Sized>(
        &self,
        bolt: &mut Bolt,
        world: &mut W,
        rng: &mut GameRng,
    ) -> BeamOutcome {
        let mut prompter = AutoDecline;
        Pass::new(Access::Commit(world), bolt, rng, &mut prompter, &self.options).run()
    }

    /// Dry run: trace the shot against a read-only world, asking
    /// `prompter` before the player's shot would hit a friend
    pub fn predict<W: World + ?Sized, P: Prompter + ?Sized>(
        &self,
        bolt: &mut Bolt,
        world: &W,
        prompter: &mut P,
    ) -> BeamOutcome {
        let mut rng = GameRng::new(TRACER_SEED);
        Pass::new(Access::Predict(world), bolt, &mut rng, prompter, &self.options).run()
    }

    /// Friend and foe tallies of a dry run
    pub fn fire_tracer<W: World + ?Sized>(&self, bolt: &mut Bolt, world: &W) -> ImpactStats {
        self.predict(bolt, world, &mut AutoDecline).stats
    }

    /// Whether an AI caster should take the shot
    pub fn worth_firing<W: World + ?Sized>(&self, bolt: &mut Bolt, world: &W) -> bool {
        self.fire_tracer(bolt, world)
            .worth_firing(self.options.foe_ratio)
    }

    /// Set off an explosion directly, without a bolt flying first
    pub fn explode<W: World + ?Sized>(
        &self,
        bolt: &mut Bolt,
        world: &mut W,
        rng: &mut GameRng,
        opts: ExplosionOptions,
    ) -> BeamOutcome {
        let mut prompter = AutoDecline;
        Pass::new(Access::Commit(world), bolt, rng, &mut prompter, &self.options)
            .run_explosion(opts)
    }

    pub fn predict_explosion<W: World + ?Sized, P: Prompter + ?Sized>(
        &self,
        bolt: &mut Bolt,
        world: &W,
        opts: ExplosionOptions,
        prompter: &mut P,
    ) -> BeamOutcome {
        let mut rng = GameRng::new(TRACER_SEED);
        Pass::new(Access::Predict(world), bolt, &mut rng, prompter, &self.options)
            .run_explosion(opts)
    }

    /// Player shot: trace first, and only fire if the player does not
    /// back out of a prompt along the way. A shot the player backs out of
    /// costs no turn.
    pub fn aim_and_fire<W: World + ?Sized, P: Prompter + ?Sized>(
        &self,
        bolt: &mut Bolt,
        world: &mut W,
        rng: &mut GameRng,
        prompter: &mut P,
    ) -> BeamOutcome {
        let preview = self.predict(bolt, &*world, prompter);
        if preview.is_aborted() {
            tracing::warn!(target: "beam", name = bolt.display_name(), "shot called off");
            return BeamOutcome::aborted("Never mind.");
        }
        self.fire(bolt, world, rng)
    }
}

/// Fire for real with default options
pub fn fire<W: World + ?Sized>(bolt: &mut Bolt, world: &mut W, rng: &mut GameRng) -> BeamOutcome {
    BeamEngine::default().fire(bolt, world, rng)
}

/// Dry run with default options
pub fn fire_tracer<W: World + ?Sized>(bolt: &mut Bolt, world: &W) -> ImpactStats {
    BeamEngine::default().fire_tracer(bolt, world)
}

/// Standalone explosion with default options
pub fn explode<W: World + ?Sized>(
    bolt: &mut Bolt,
    world: &mut W,
    rng: &mut GameRng,
    opts: ExplosionOptions,
) -> BeamOutcome {
    BeamEngine::default().explode(bolt, world, rng, opts)
}

/// Trace, then fire, with default options
pub fn aim_and_fire<W: World + ?Sized, P: Prompter + ?Sized>(
    bolt: &mut Bolt,
    world: &mut W,
    rng: &mut GameRng,
    prompter: &mut P,
) -> BeamOutcome {
    BeamEngine::default().aim_and_fire(bolt, world, rng, prompter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{DiceDef, Flavor, ToHit};
    use crate::dungeon::{Coord, GridWorld};

    fn bolt() -> Bolt {
        Bolt::new(Coord::new(0, 0), Coord::new(5, 0))
            .with_flavor(Flavor::Magic)
            .with_damage(DiceDef::new(1, 4))
            .with_to_hit(ToHit::Automatic)
    }

    #[test]
    fn test_tracer_leaves_caller_rng_alone() {
        let mut world = GridWorld::new(8, 1);
        let mut b = bolt();
        let mut rng = GameRng::new(11);
        let engine = BeamEngine::default();
        engine.fire_tracer(&mut b, &world);
        let first = engine.fire(&mut b, &mut world, &mut rng);

        let mut world2 = GridWorld::new(8, 1);
        let mut rng2 = GameRng::new(11);
        let second = engine.fire(&mut bolt(), &mut world2, &mut rng2);
        assert_eq!(first.path, second.path);
        assert_eq!(rng.rn2(1000), rng2.rn2(1000));
    }

    #[test]
    fn test_range_limits_path() {
        let world = GridWorld::new(20, 1);
        let mut b = bolt().with_range(3);
        let out = BeamEngine::default().predict(&mut b, &world, &mut AutoDecline);
        assert_eq!(out.path.len(), 3);
        assert_eq!(out.path.last(), Some(&Coord::new(3, 0)));
    }

    #[test]
    fn test_options_are_carried() {
        let engine = BeamEngine::new(BeamOptions {
            hit_cap: 1,
            ..BeamOptions::default()
        });
        assert_eq!(engine.options().hit_cap, 1);
    }
}
