//! Fractional rays
//!
//! A ray keeps a real-valued position and a direction scaled so that its
//! larger component has magnitude one: every `advance` enters exactly one
//! new cell along the major axis. Regressing undoes an advance exactly,
//! which the bounce logic relies on.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::dungeon::Coord;
use crate::rng::GameRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
}

/// Ways to turn a ray away from a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mirror {
    FlipX,
    FlipY,
    Reverse,
}

impl Ray {
    /// Straight ray from the center of `from` toward the center of `to`
    pub fn new(from: Coord, to: Coord) -> Self {
        Self::from_point(f64::from(from.x), f64::from(from.y), to)
    }

    /// Ray starting at a point inside a cell, aimed at the center of `to`
    pub fn from_point(x: f64, y: f64, to: Coord) -> Self {
        let mut ray = Self {
            x,
            y,
            dx: f64::from(to.x) - x,
            dy: f64::from(to.y) - y,
        };
        ray.normalize();
        ray
    }

    /// Ray leaving `from` at `angle` radians (x right, y down)
    pub fn from_angle(from: Coord, angle: f64) -> Self {
        let mut ray = Self {
            x: f64::from(from.x),
            y: f64::from(from.y),
            dx: angle.cos(),
            dy: angle.sin(),
        };
        ray.normalize();
        ray
    }

    fn normalize(&mut self) {
        let m = self.dx.abs().max(self.dy.abs());
        if m > f64::EPSILON {
            self.dx /= m;
            self.dy /= m;
        } else {
            self.dx = 0.0;
            self.dy = 0.0;
        }
    }

    /// Cell the ray currently occupies
    pub fn pos(&self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Cell the next `advance` would enter
    pub fn peek(&self) -> Coord {
        Coord::new((self.x + self.dx).round() as i32, (self.y + self.dy).round() as i32)
    }

    pub fn direction(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }

    /// A ray aimed at its own cell never moves
    pub fn is_stationary(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    pub fn advance(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }

    pub fn regress(&mut self) {
        self.x -= self.dx;
        self.y -= self.dy;
    }

    fn mirror(&mut self, how: Mirror) {
        match how {
            Mirror::FlipX => self.dx = -self.dx,
            Mirror::FlipY => self.dy = -self.dy,
            Mirror::Reverse => {
                self.dx = -self.dx;
                self.dy = -self.dy;
            }
        }
    }

    /// Bounce off the solid cell the ray has just entered.
    ///
    /// The ray steps back into the open cell it came from and is mirrored
    /// against the surrounding solid mass. The new direction never leads
    /// straight back into a solid cell: if the mirror would, the other
    /// axis is tried, and then a plain reversal along the incoming path.
    pub fn bounce(&mut self, is_solid: impl Fn(Coord) -> bool) {
        let wall = self.pos();
        self.regress();
        let open = self.pos();
        let d = wall - open;

        let (first, second) = if d.x != 0 && d.y != 0 {
            let side_x = is_solid(open + Coord::new(d.x, 0));
            let side_y = is_solid(open + Coord::new(0, d.y));
            match (side_x, side_y) {
                (true, false) => (Mirror::FlipX, Mirror::FlipY),
                (false, true) => (Mirror::FlipY, Mirror::FlipX),
                _ => (Mirror::Reverse, Mirror::Reverse),
            }
        } else if d.x != 0 {
            (Mirror::FlipX, Mirror::FlipY)
        } else {
            (Mirror::FlipY, Mirror::FlipX)
        };

        let incoming = *self;
        for how in [first, second, Mirror::Reverse] {
            *self = incoming;
            self.mirror(how);
            if !is_solid(self.peek()) {
                return;
            }
        }
        *self = incoming;
        self.mirror(Mirror::Reverse);
    }

    /// Bounce with the outgoing angle perturbed by up to a quarter turn
    /// either way. Falls back to an ordinary bounce when no perturbed
    /// direction finds open space within `retries` attempts.
    pub fn chaos_bounce(&mut self, is_solid: impl Fn(Coord) -> bool, rng: &mut GameRng, retries: u32) {
        self.bounce(&is_solid);
        let base = *self;
        let origin = self.pos();
        for _ in 0..retries {
            let angle = base.angle() + rng.float_range(-FRAC_PI_2, FRAC_PI_2);
            let mut candidate = Ray::from_angle(origin, angle);
            candidate.x = base.x;
            candidate.y = base.y;
            if !is_solid(candidate.peek()) && candidate.peek() != origin {
                *self = candidate;
                return;
            }
        }
        *self = base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(ray: &mut Ray, steps: usize) -> Vec<Coord> {
        (0..steps)
            .map(|_| {
                ray.advance();
                ray.pos()
            })
            .collect()
    }

    #[test]
    fn test_straight_rays() {
        let mut ray = Ray::new(Coord::new(0, 0), Coord::new(3, 0));
        assert_eq!(
            walk(&mut ray, 3),
            vec![Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0)]
        );
        let mut ray = Ray::new(Coord::new(0, 0), Coord::new(-2, -2));
        assert_eq!(walk(&mut ray, 2), vec![Coord::new(-1, -1), Coord::new(-2, -2)]);
    }

    #[test]
    fn test_regress_undoes_advance() {
        let mut ray = Ray::new(Coord::new(1, 1), Coord::new(6, 3));
        walk(&mut ray, 4);
        let here = ray.pos();
        ray.advance();
        ray.regress();
        assert_eq!(ray.pos(), here);
    }

    #[test]
    fn test_stationary_ray() {
        let mut ray = Ray::new(Coord::new(2, 2), Coord::new(2, 2));
        assert!(ray.is_stationary());
        ray.advance();
        assert_eq!(ray.pos(), Coord::new(2, 2));
    }

    #[test]
    fn test_axial_bounce_reverses() {
        // wall along x = 4
        let solid = |p: Coord| p.x >= 4;
        let mut ray = Ray::new(Coord::new(0, 2), Coord::new(4, 2));
        walk(&mut ray, 4);
        assert_eq!(ray.pos(), Coord::new(4, 2));
        ray.bounce(solid);
        assert_eq!(ray.pos(), Coord::new(3, 2));
        assert_eq!(ray.peek(), Coord::new(2, 2));
    }

    #[test]
    fn test_diagonal_bounce_mirrors_off_wall() {
        // wall along y = 0; ray heading up and right hits it
        let solid = |p: Coord| p.y <= 0;
        let mut ray = Ray::new(Coord::new(2, 3), Coord::new(5, 0));
        walk(&mut ray, 3);
        assert_eq!(ray.pos(), Coord::new(5, 0));
        ray.bounce(solid);
        assert_eq!(ray.pos(), Coord::new(4, 1));
        assert_eq!(ray.peek(), Coord::new(5, 2));
    }

    #[test]
    fn test_corner_bounce_reverses() {
        let solid = |p: Coord| p.x >= 4 || p.y <= 1;
        let mut ray = Ray::new(Coord::new(1, 4), Coord::new(4, 1));
        walk(&mut ray, 2);
        assert_eq!(ray.pos(), Coord::new(3, 2));
        ray.advance();
        assert_eq!(ray.pos(), Coord::new(4, 1));
        ray.bounce(solid);
        assert_eq!(ray.pos(), Coord::new(3, 2));
        assert_eq!(ray.peek(), Coord::new(2, 3));
    }

    #[test]
    fn test_chaos_bounce_finds_open_space() {
        let solid = |p: Coord| p.x >= 4 || p.x < 0 || p.y < 0 || p.y > 6;
        let mut rng = GameRng::new(9);
        for _ in 0..20 {
            let mut ray = Ray::new(Coord::new(0, 3), Coord::new(4, 3));
            walk(&mut ray, 4);
            ray.chaos_bounce(solid, &mut rng, 20);
            assert_eq!(ray.pos(), Coord::new(3, 3));
            assert!(!solid(ray.peek()));
        }
    }
}
