//! Render Interpolator
//!
//! Render frames run at their own rate. Between fixed ticks the actor's
//! transform is blended from the last tick's start to its end position.

use glam::Vec2;

use crate::physics::actor::{Actor, TickSnapshot};

/// Blend factor for `now`, clamped to `[0, 1]`. `None` before any tick.
pub fn blend_factor(snapshot: &TickSnapshot, now: f64, fixed_dt: f32) -> Option<f32> {
    let timestamp = snapshot.timestamp?;
    let t = (now - timestamp) / f64::from(fixed_dt);
    Some(t.clamp(0.0, 1.0) as f32)
}

/// Interpolated position for `now`. `None` before any tick.
pub fn interpolate(snapshot: &TickSnapshot, now: f64, fixed_dt: f32) -> Option<Vec2> {
    blend_factor(snapshot, now, fixed_dt).map(|t| snapshot.start.lerp(snapshot.end, t))
}

impl Actor {
    /// Move the transform to its interpolated position for `now`.
    pub fn interpolate(&mut self, now: f64, fixed_dt: f32) {
        if let Some(position) = interpolate(&self.snapshot, now, fixed_dt) {
            self.position = position;
        }
    }
}
