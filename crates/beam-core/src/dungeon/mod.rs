//! Map geometry, terrain and the reference grid world

mod coord;
mod feature;
mod grid;

pub use coord::{COMPASS, Coord};
pub use feature::{CloudKind, Feature};
pub use grid::{GridWorld, Visibility, WorldEvent};
