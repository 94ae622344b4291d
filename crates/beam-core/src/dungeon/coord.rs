//! Grid coordinates

use core::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A cell position (or an offset between two cells) on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// The eight compass directions, clockwise from north.
pub const COMPASS: [Coord; 8] = [
    Coord::new(0, -1),
    Coord::new(1, -1),
    Coord::new(1, 0),
    Coord::new(1, 1),
    Coord::new(0, 1),
    Coord::new(-1, 1),
    Coord::new(-1, 0),
    Coord::new(-1, -1),
];

impl Coord {
    pub const ORIGIN: Coord = Coord::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean length of this offset
    pub const fn abs(self) -> i32 {
        self.x * self.x + self.y * self.y
    }

    /// Chebyshev length ("grid distance") of this offset
    pub const fn rdist(self) -> i32 {
        let ax = if self.x < 0 { -self.x } else { self.x };
        let ay = if self.y < 0 { -self.y } else { self.y };
        if ax > ay { ax } else { ay }
    }

    pub const fn distance(self, other: Coord) -> i32 {
        Coord::new(self.x - other.x, self.y - other.y).rdist()
    }

    pub const fn distance_sq(self, other: Coord) -> i32 {
        Coord::new(self.x - other.x, self.y - other.y).abs()
    }

    pub const fn is_origin(self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub const fn is_adjacent(self, other: Coord) -> bool {
        self.distance(other) == 1
    }

    /// Unit step (each component in -1..=1) pointing from `self` to `other`
    pub const fn direction_to(self, other: Coord) -> Coord {
        Coord::new((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Coord::new(2, 3);
        let b = Coord::new(5, -1);
        assert_eq!(a.distance(b), 4);
        assert_eq!(a.distance_sq(b), 9 + 16);
        assert_eq!((b - a).rdist(), 4);
    }

    #[test]
    fn test_compass_is_unit_ring() {
        for dir in COMPASS {
            assert_eq!(dir.rdist(), 1);
        }
        assert_eq!(Coord::ORIGIN.direction_to(Coord::new(-7, 3)), Coord::new(-1, 1));
    }
}
