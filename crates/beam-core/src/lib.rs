//! Bolt, beam and explosion engine for grid roguelikes
//!
//! Given a configured [`beam::Bolt`] and something implementing
//! [`world::World`], the engine traces the shot cell by cell, bounces it
//! off walls, resolves hits against actors through armour, resistances
//! and magic resistance, and sets off explosions and clouds. Predictions
//! ("tracers") use the same logic without changing the world, so AI
//! casters and friendly-fire prompts see exactly what a real shot would
//! do.

pub mod actor;
pub mod beam;
pub mod combat;
pub mod dungeon;
pub mod magic;
pub mod world;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GameRng;
