//! Appear Sequence
//!
//! Scripted entry animation (emerging from a pipe or a block): the actor
//! slides along one axis at a constant speed, ignoring gravity and
//! collision, until it has travelled its own size plus a margin.

use glam::Vec2;
use serde::Serialize;
use tracing::debug;

use crate::core::math::sign_f32;
use crate::physics::actor::Actor;
use crate::physics::events::PhysicsEventKind;
use crate::physics::step::StepEnv;

/// Progress of a running appear sequence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AppearState {
    /// Unit axis of travel
    pub direction: Vec2,
    /// Distance still to cover
    pub remaining: f32,
}

/// Snap `v` to the unit vector of its dominant axis. Ties go to X.
pub fn dominant_axis(v: Vec2) -> Vec2 {
    if v.x.abs() >= v.y.abs() {
        Vec2::new(sign_f32(v.x), 0.0)
    } else {
        Vec2::new(0.0, sign_f32(v.y))
    }
}

impl Actor {
    /// Start the appear sequence along `direction` for an object of `size`.
    ///
    /// Travel covers the size along the chosen axis plus the configured
    /// margin. Restarting while already appearing replaces the old run.
    pub fn begin_appear(&mut self, direction: Vec2, size: Vec2) {
        let direction = dominant_axis(direction);
        let extent = if direction.x != 0.0 { size.x } else { size.y };
        self.appear = Some(AppearState {
            direction,
            remaining: extent + self.config.appear_margin,
        });
        debug!(actor = %self.id, ?direction, extent, "appear started");
    }

    /// Remaining appear distance, if appearing.
    pub fn appear_remaining(&self) -> Option<f32> {
        self.appear.map(|a| a.remaining)
    }

    /// One appear tick: slide, record the snapshot, finish when done.
    pub(crate) fn appear_tick(&mut self, env: &mut StepEnv<'_>) {
        let Some(mut appear) = self.appear else {
            return;
        };
        let distance = self.config.appear_speed * env.physics.fixed_dt();

        // Undo render interpolation, as the normal step does
        if self.snapshot.timestamp.is_some() {
            self.position = self.snapshot.end;
        }
        self.snapshot.start = self.position;
        self.translate(appear.direction * distance);
        self.snapshot.end = self.position;
        self.snapshot.timestamp = Some(env.now);

        appear.remaining -= distance;
        if appear.remaining <= 0.0 {
            self.appear = None;
            debug!(actor = %self.id, position = ?self.position, "appear finished");
            env.emit(self.id, PhysicsEventKind::AppearFinished);
        } else {
            self.appear = Some(appear);
        }
    }
}
