//! Bolts, beams and explosions
//!
//! A shot is a [`Bolt`] fired through a [`World`](crate::world::World).
//! Real shots commit their effects; predictions run the same step logic
//! against a read-only world and only report what would happen.

mod bolt;
mod engine;
mod explosion;
mod impact;
mod los;
mod outcome;
mod pass;
mod ray;
mod wall;

pub use bolt::{Bolt, BoltFlags, ItemHandle, Rider, Shape, Thrower};
pub use engine::{BeamEngine, aim_and_fire, explode, fire, fire_tracer};
pub use explosion::{ExplosionMap, ExplosionOptions, explosion_map};
pub use los::{find_ray, has_clear_path};
pub use outcome::{BeamOutcome, Conduct, Credit, FireStatus, ImpactStats, Noise};
pub use ray::Ray;
pub use wall::{WallEffect, can_affect_wall};
