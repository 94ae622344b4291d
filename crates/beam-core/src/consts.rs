//! Engine constants
//!
//! Balance numbers shared by the path tracer, the explosion solver and the
//! resolvers. Most of them can be overridden through `BeamOptions`.

/// Maximum number of times one actor can be hit by a single firing pass
pub const HIT_CAP: u8 = 2;

/// Explosion radius limit; the cost map is sized from it
pub const MAX_EXPLOSION_RADIUS: i32 = 9;

/// Explosion propagation cost when circling the center at the same radius
pub const EXPLOSION_CIRCLE_COST: i32 = 0;
/// Explosion propagation cost for an ordinary outward step
pub const EXPLOSION_STEP_COST: i32 = 5;
/// Explosion propagation cost when the step reverses direction
pub const EXPLOSION_REVERSE_COST: i32 = 17;
/// A cell is reachable while its cost stays below this many times the radius
pub const EXPLOSION_COST_FACTOR: i32 = 10;

/// Base noise of an explosion; each radius step adds `EXPLOSION_NOISE_PER_RADIUS`
pub const EXPLOSION_BASE_NOISE: i32 = 10;
pub const EXPLOSION_NOISE_PER_RADIUS: i32 = 5;

/// Attempts to find a perturbed bounce direction for chaotic bolts
pub const CHAOS_BOUNCE_RETRIES: u32 = 20;

/// Reflections a single bolt may undergo before shields only block it
pub const MAX_REFLECTIONS: u32 = 5;

/// Range used when a bolt is configured without an explicit range
pub const DEFAULT_RANGE: i32 = 8;

/// Power a registry entry is clamped to when it does not name its own cap
pub const DEFAULT_POWER_CAP: i32 = 100;

/// To-hit lost for each cloud the bolt passes through
pub const CLOUD_HIT_PENALTY: i32 = 2;

/// To-hit lost by a caster suffering from inaccuracy
pub const INACCURACY_PENALTY: i32 = 5;

/// Percentage of shots an AI caster requires to be aimed at foes
pub const DEFAULT_FOE_RATIO: i32 = 80;
