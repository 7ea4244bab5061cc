//! Shapes and Swept Separating-Axis Tests
//!
//! Actors are axis-aligned boxes; static geometry is any convex polygon
//! (blocks are boxes, slopes are right triangles). A shape-cast sweeps the
//! actor box along a unit direction and reports the distance travelled
//! before first contact.
//!
//! ## Contact rules
//!
//! ```text
//!   separated by a gap > 0 on some axis  -> no contact
//!   touching (gap == 0), moving closer   -> contact at distance 0
//!   touching (gap == 0), moving parallel -> no contact
//!   overlapping at the start             -> contact at distance 0
//! ```
//!
//! Treating a parallel touch as "no contact" is what lets an actor slide
//! along a floor it rests on without re-colliding with it every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Directions whose projection onto an axis is smaller than this are
/// considered parallel to it.
const PARALLEL_EPS: f32 = 1.0e-7;

/// Hits up to this far past the requested cast length are still reported.
/// Absorbs float noise when an actor sits exactly one check distance away.
pub const CONTACT_SLOP: f32 = 1.0e-5;

// =============================================================================
// AABB
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create from corners. Corners are reordered if needed.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create from a center point and half extents.
    #[inline]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half extents.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Box moved by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Strict overlap test; touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Smallest box containing both.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box covering this one swept by `offset`.
    #[inline]
    pub fn swept(&self, offset: Vec2) -> Aabb {
        self.union(&self.translated(offset))
    }

    /// Projection interval onto `axis` (axis need not be normalized).
    #[inline]
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let c = self.center().dot(axis);
        let r = self.half_extents().dot(axis.abs());
        (c - r, c + r)
    }
}

// =============================================================================
// CONVEX POLYGON
// =============================================================================

/// Convex polygon with counter-clockwise winding and cached outward normals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
    bounds: Aabb,
}

impl ConvexPolygon {
    /// Build from vertices in either winding.
    ///
    /// Returns `None` for fewer than three vertices or zero area.
    pub fn new(mut vertices: Vec<Vec2>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        let area = signed_area(&vertices);
        if area.abs() <= f32::EPSILON {
            return None;
        }
        if area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            // Right-hand perpendicular of a CCW edge points outward
            normals.push(Vec2::new(edge.y, -edge.x).normalize_or_zero());
        }

        let mut bounds = Aabb::new(vertices[0], vertices[0]);
        for v in &vertices[1..] {
            bounds = bounds.union(&Aabb::new(*v, *v));
        }

        Some(Self {
            vertices,
            normals,
            bounds,
        })
    }

    /// Rectangle covering `aabb`.
    pub fn from_aabb(aabb: Aabb) -> Self {
        let vertices = vec![
            aabb.min,
            Vec2::new(aabb.max.x, aabb.min.y),
            aabb.max,
            Vec2::new(aabb.min.x, aabb.max.y),
        ];
        Self {
            vertices,
            normals: vec![Vec2::NEG_Y, Vec2::X, Vec2::Y, Vec2::NEG_X],
            bounds: aabb,
        }
    }

    /// Right triangle standing on `base_min`, `width` wide, whose tall side
    /// (of `height`) is on the right when `rises_toward > 0`, else on the left.
    pub fn right_triangle(
        base_min: Vec2,
        width: f32,
        height: f32,
        rises_toward: i32,
    ) -> Option<Self> {
        let left = base_min;
        let right = base_min + Vec2::new(width, 0.0);
        let apex = if rises_toward > 0 {
            right + Vec2::new(0.0, height)
        } else {
            left + Vec2::new(0.0, height)
        };
        Self::new(vec![left, right, apex])
    }

    /// Vertices in counter-clockwise order.
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward unit normals, one per edge.
    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Bounding box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Projection interval onto `axis`.
    #[inline]
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for v in &self.vertices {
            let d = v.dot(axis);
            lo = lo.min(d);
            hi = hi.max(d);
        }
        (lo, hi)
    }
}

fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

// =============================================================================
// SWEEP / OVERLAP
// =============================================================================

/// Strict overlap of a box and a polygon (touching does not count).
pub fn overlaps(moving: &Aabb, target: &ConvexPolygon) -> bool {
    if !moving.overlaps(&target.bounds) {
        return false;
    }
    for axis in candidate_axes(target) {
        let (a0, a1) = moving.project(axis);
        let (b0, b1) = target.project(axis);
        if a1 <= b0 || b1 <= a0 {
            return false;
        }
    }
    true
}

/// Sweep `moving` along unit direction `dir` for up to `max_distance`.
///
/// Returns the distance travelled before contact. A zero `dir` degrades to
/// an overlap test that reports distance 0.
pub fn sweep(moving: &Aabb, dir: Vec2, max_distance: f32, target: &ConvexPolygon) -> Option<f32> {
    if dir == Vec2::ZERO {
        return overlaps(moving, target).then_some(0.0);
    }

    let reach = moving.swept(dir * (max_distance + CONTACT_SLOP));
    if !reach.overlaps(&target.bounds) && !touches(&reach, &target.bounds) {
        return None;
    }

    let mut enter = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;

    for axis in candidate_axes(target) {
        let (a0, a1) = moving.project(axis);
        let (b0, b1) = target.project(axis);
        let speed = dir.dot(axis);

        if speed.abs() < PARALLEL_EPS {
            // Never closes the gap along this axis
            if a1 <= b0 || b1 <= a0 {
                return None;
            }
            continue;
        }

        let (t0, t1) = if speed > 0.0 {
            ((b0 - a1) / speed, (b1 - a0) / speed)
        } else {
            ((b1 - a0) / speed, (b0 - a1) / speed)
        };

        enter = enter.max(t0);
        exit = exit.min(t1);
        if enter > exit {
            return None;
        }
    }

    // Separating, or contact lies behind the start
    if exit <= 0.0 {
        return None;
    }
    if enter > max_distance + CONTACT_SLOP {
        return None;
    }

    Some(enter.max(0.0))
}

fn touches(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

fn candidate_axes(target: &ConvexPolygon) -> impl Iterator<Item = Vec2> + '_ {
    [Vec2::X, Vec2::Y].into_iter().chain(
        target
            .normals()
            .iter()
            .copied()
            .filter(|n| n.x.abs() > PARALLEL_EPS && n.y.abs() > PARALLEL_EPS),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::approx_eq;

    fn unit_box_at(x: f32, y: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::splat(0.5))
    }

    #[test]
    fn test_polygon_winding_normalized() {
        let cw = ConvexPolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(signed_area(cw.vertices()) > 0.0);

        assert!(ConvexPolygon::new(vec![Vec2::ZERO, Vec2::X]).is_none());
        assert!(ConvexPolygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::X * 2.0]).is_none());
    }

    #[test]
    fn test_triangle_normals_point_outward() {
        let tri = ConvexPolygon::right_triangle(Vec2::ZERO, 2.0, 1.0, 1).unwrap();
        let center = tri.vertices().iter().copied().sum::<Vec2>() / 3.0;
        let n = tri.vertices().len();
        for i in 0..n {
            let mid = (tri.vertices()[i] + tri.vertices()[(i + 1) % n]) * 0.5;
            assert!((mid - center).dot(tri.normals()[i]) > 0.0);
        }
    }

    #[test]
    fn test_sweep_box_hits_wall() {
        let actor = unit_box_at(0.0, 0.5);
        let wall = ConvexPolygon::from_aabb(Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)));

        let d = sweep(&actor, Vec2::X, 1.0, &wall).unwrap();
        assert!(approx_eq(d, 0.5));

        // Too short to reach
        assert!(sweep(&actor, Vec2::X, 0.4, &wall).is_none());

        // Moving away
        assert!(sweep(&actor, Vec2::NEG_X, 5.0, &wall).is_none());
    }

    #[test]
    fn test_sweep_parallel_touch_is_free() {
        // Resting exactly on a floor, walking along it
        let actor = unit_box_at(0.0, 0.5);
        let floor = ConvexPolygon::from_aabb(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0)));

        assert!(sweep(&actor, Vec2::X, 3.0, &floor).is_none());
        // But pressing into it is contact at zero
        assert_eq!(sweep(&actor, Vec2::NEG_Y, 1.0, &floor), Some(0.0));
    }

    #[test]
    fn test_zero_direction_is_overlap_test() {
        let actor = unit_box_at(0.0, 0.0);
        let block = ConvexPolygon::from_aabb(unit_box_at(0.5, 0.0));
        assert_eq!(sweep(&actor, Vec2::ZERO, 0.0, &block), Some(0.0));

        let touching = ConvexPolygon::from_aabb(unit_box_at(1.0, 0.0));
        assert_eq!(sweep(&actor, Vec2::ZERO, 0.0, &touching), None);
    }

    #[test]
    fn test_sweep_onto_slope_surface() {
        // Slope rising right from x=0..4, degree 0.5
        let slope = ConvexPolygon::right_triangle(Vec2::ZERO, 4.0, 2.0, 1).unwrap();
        // Box spanning x=1.5..2.5; surface under its right edge is 1.25
        let actor = Aabb::new(Vec2::new(1.5, 2.0), Vec2::new(2.5, 3.0));

        // Bottom-right corner meets the incline first
        let d = sweep(&actor, Vec2::NEG_Y, 5.0, &slope).unwrap();
        assert!(approx_eq(d, 2.0 - 1.25), "got {}", d);
    }

    #[test]
    fn test_sweep_along_slope_is_free() {
        let slope = ConvexPolygon::right_triangle(Vec2::ZERO, 4.0, 2.0, 1).unwrap();
        // Bottom-right corner hovering 0.01 above the incline at x=1.0
        let actor = Aabb::new(Vec2::new(0.0, 0.51), Vec2::new(1.0, 1.51));
        let along = Vec2::new(1.0, 0.5).normalize();
        assert!(sweep(&actor, along, 1.0, &slope).is_none());
    }
}
