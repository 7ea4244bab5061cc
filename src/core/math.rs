//! Scalar and Vector Helpers
//!
//! Small helpers the movement code leans on. `f32::signum` reports `1.0`
//! for `+0.0`, which is wrong for direction selection: a resting axis must
//! produce a zero direction, so movement code uses [`sign`] instead.

use glam::Vec2;

/// Tolerance used by [`approx_eq`] and [`approx_eq_vec`].
pub const APPROX_EPS: f32 = 1.0e-5;

/// Sign of a scalar as -1, 0 or +1.
///
/// Zero (and NaN) map to 0.
#[inline]
pub fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// [`sign`] as a float, convenient for scaling.
#[inline]
pub fn sign_f32(value: f32) -> f32 {
    sign(value) as f32
}

/// Unit direction along X for a signed speed, or zero when at rest.
#[inline]
pub fn axis_dir_x(speed: f32) -> Vec2 {
    Vec2::new(sign_f32(speed), 0.0)
}

/// Unit direction along Y for a signed speed, or zero when at rest.
#[inline]
pub fn axis_dir_y(speed: f32) -> Vec2 {
    Vec2::new(0.0, sign_f32(speed))
}

/// Approximate scalar comparison.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= APPROX_EPS
}

/// Approximate component-wise vector comparison.
#[inline]
pub fn approx_eq_vec(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}
