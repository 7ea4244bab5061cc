//! Slope Classifier
//!
//! Runs once per tick before movement. Two short casts decide whether the
//! actor is walking up a slope (cast along the horizontal direction of
//! travel) or down one (cast straight down). Ascending wins when both
//! would match. Hits without a slope component are ignored here; they
//! still block movement later.

use glam::Vec2;
use serde::Serialize;
use tracing::debug;

use crate::core::math::sign;
use crate::physics::actor::Actor;
use crate::physics::collider::{ColliderId, SlopeSurface};
use crate::physics::events::PhysicsEventKind;
use crate::physics::step::StepEnv;

/// Slope relationship for the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SlopeState {
    /// Not on a slope
    #[default]
    Flat,
    /// Moving toward the rising side of a slope
    Ascending,
    /// Moving away from the rising side of a slope underfoot
    Descending,
}

/// The slope surface an actor last engaged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EngagedSlope {
    /// Collider carrying the surface
    pub collider: ColliderId,
    /// Surface geometry
    pub surface: SlopeSurface,
    /// Cached `1 / sqrt(1 + degree²)`
    pub slope_factor: f32,
}

/// Per-actor slope state.
///
/// `state` is recomputed every tick; `engaged` survives until a different
/// slope is engaged so re-engaging the same surface costs nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SlopeContact {
    /// Classification for this tick
    pub state: SlopeState,
    /// Last engaged surface
    pub engaged: Option<EngagedSlope>,
}

impl SlopeContact {
    /// Engage `surface`; returns `true` if it differs from the current one.
    pub fn engage(&mut self, collider: ColliderId, surface: SlopeSurface) -> bool {
        if let Some(current) = &self.engaged {
            if current.collider == collider && current.surface == surface {
                return false;
            }
        }
        self.engaged = Some(EngagedSlope {
            collider,
            surface,
            slope_factor: surface.slope_factor(),
        });
        true
    }

    /// Slope factor of the engaged surface, 1 when none.
    pub fn slope_factor(&self) -> f32 {
        self.engaged.map_or(1.0, |e| e.slope_factor)
    }

    /// Rise over run of the engaged surface, 0 when none.
    pub fn degree(&self) -> f32 {
        self.engaged.map_or(0.0, |e| e.surface.degree())
    }

    /// Engaged surface when the state is [`SlopeState::Ascending`].
    pub fn ascending(&self) -> Option<&EngagedSlope> {
        match self.state {
            SlopeState::Ascending => self.engaged.as_ref(),
            _ => None,
        }
    }

    /// Engaged surface when the state is [`SlopeState::Descending`].
    pub fn descending(&self) -> Option<&EngagedSlope> {
        match self.state {
            SlopeState::Descending => self.engaged.as_ref(),
            _ => None,
        }
    }
}

impl Actor {
    /// Classify the actor's slope relationship for this tick.
    ///
    /// Resets to [`SlopeState::Flat`] first. A resting horizontal speed can
    /// neither ascend nor descend, so nothing is cast.
    pub fn classify_slope(&mut self, env: &mut StepEnv<'_>) -> SlopeState {
        self.slope.state = SlopeState::Flat;
        let dir_x = sign(self.velocity.x);
        if dir_x == 0 {
            return SlopeState::Flat;
        }
        let reach = env.physics.config().slope_check_distance;

        // Up: surface rises the way we are heading
        self.cast(env, Vec2::new(dir_x as f32, 0.0), reach);
        if let Some((collider, surface)) = self.first_slope(|s| s.direction() == dir_x) {
            self.engage_slope(env, SlopeState::Ascending, collider, surface);
            return SlopeState::Ascending;
        }

        // Down: surface underfoot rises behind us
        self.cast(env, Vec2::NEG_Y, reach);
        if let Some((collider, surface)) = self.first_slope(|s| s.direction() + dir_x == 0) {
            self.engage_slope(env, SlopeState::Descending, collider, surface);
            return SlopeState::Descending;
        }

        SlopeState::Flat
    }

    fn first_slope(
        &self,
        accept: impl Fn(&SlopeSurface) -> bool,
    ) -> Option<(ColliderId, SlopeSurface)> {
        self.scratch
            .hits()
            .iter()
            .find_map(|hit| hit.slope.filter(|s| accept(s)).map(|s| (hit.collider, s)))
    }

    fn engage_slope(
        &mut self,
        env: &mut StepEnv<'_>,
        state: SlopeState,
        collider: ColliderId,
        surface: SlopeSurface,
    ) {
        self.slope.state = state;
        if self.slope.engage(collider, surface) {
            let slope_factor = self.slope.slope_factor();
            debug!(actor = %self.id, ?collider, ?state, slope_factor, "slope engaged");
            env.emit(self.id, PhysicsEventKind::SlopeEngaged { collider, slope_factor });
        }
    }
}
