//! Line of sight ray solver

use super::ray::Ray;
use crate::dungeon::Coord;
use crate::world::Terrain;

/// Sub-cell offsets tried across the minor axis, straightest first
const START_OFFSETS: [f64; 5] = [0.0, 0.25, -0.25, 0.45, -0.45];

/// Find a ray from `from` that reaches `to` without crossing a solid cell.
///
/// Rays start at slightly shifted points inside the source cell so that a
/// target seen around a corner can still be reached. `None` if no offset
/// gives a clear line.
pub fn find_ray<T: Terrain + ?Sized>(terrain: &T, from: Coord, to: Coord) -> Option<Ray> {
    if from == to {
        return Some(Ray::new(from, to));
    }
    let d = to - from;
    let x_major = d.x.abs() >= d.y.abs();
    START_OFFSETS.iter().find_map(|&off| {
        let (sx, sy) = if x_major {
            (f64::from(from.x), f64::from(from.y) + off)
        } else {
            (f64::from(from.x) + off, f64::from(from.y))
        };
        let ray = Ray::from_point(sx, sy, to);
        ray_is_clear(terrain, ray, from, to).then_some(ray)
    })
}

/// Like `find_ray`, but falls back to the straight line when nothing is
/// clear
pub fn ray_or_straight<T: Terrain + ?Sized>(terrain: &T, from: Coord, to: Coord) -> Ray {
    find_ray(terrain, from, to).unwrap_or_else(|| Ray::new(from, to))
}

/// The player, standing at `from`, could see an effect at `to`
pub fn has_clear_path<T: Terrain + ?Sized>(terrain: &T, from: Coord, to: Coord) -> bool {
    find_ray(terrain, from, to).is_some()
}

fn ray_is_clear<T: Terrain + ?Sized>(terrain: &T, mut ray: Ray, from: Coord, to: Coord) -> bool {
    if ray.pos() != from {
        return false;
    }
    let steps = from.distance(to);
    for _ in 1..steps {
        ray.advance();
        let pos = ray.pos();
        if !terrain.in_bounds(pos) || terrain.is_solid(pos) {
            return false;
        }
    }
    ray.advance();
    ray.pos() == to
}
