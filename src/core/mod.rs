//! Core geometric primitives.
//!
//! Everything the movement code needs below the collision world: scalar
//! helpers on top of `glam::Vec2`, axis-aligned boxes, and the swept
//! separating-axis test used by every shape-cast.

pub mod math;
pub mod shape;

// Re-export core types
pub use glam::Vec2;
pub use math::{approx_eq, sign, sign_f32};
pub use shape::{Aabb, ConvexPolygon};
