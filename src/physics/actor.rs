//! Actor State
//!
//! One moving entity: its box, velocity, ground and slope state, the
//! appear sequence, and the tick snapshot the render interpolator reads.
//!
//! The actor's `position` is the single transform. The interpolator writes
//! it between ticks; the physics step snaps it back to the last solved
//! position before moving.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{ActorConfig, ConfigError};
use crate::core::shape::Aabb;
use crate::physics::appear::AppearState;
use crate::physics::events::HitReaction;
use crate::physics::query::HitBuffer;
use crate::physics::slope::{SlopeContact, SlopeState};
use crate::ONE_PIXEL;

/// Actor handle, unique within one [`Scene`](crate::physics::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Positions at the start and end of the last fixed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TickSnapshot {
    /// Position before the last tick's movement
    pub start: Vec2,
    /// Position after the last tick's movement
    pub end: Vec2,
    /// Simulated time of the last tick; `None` until one has run
    pub timestamp: Option<f64>,
}

impl TickSnapshot {
    /// Snapshot at rest at `position`, before any tick.
    pub fn at(position: Vec2) -> Self {
        Self {
            start: position,
            end: position,
            timestamp: None,
        }
    }
}

/// A moving entity simulated by the fixed-step physics.
pub struct Actor {
    pub(crate) id: ActorId,
    pub(crate) config: ActorConfig,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) gravity_scale: f32,
    pub(crate) on_ground: bool,
    pub(crate) appear: Option<AppearState>,
    pub(crate) slope: SlopeContact,
    pub(crate) snapshot: TickSnapshot,
    /// Direction of the last horizontal block this tick (-1, 0 or +1)
    pub(crate) wall_contact: i32,
    pub(crate) reactions: Vec<Box<dyn HitReaction>>,
    /// Per-actor cast scratch; only valid until the next cast
    pub(crate) scratch: HitBuffer,
}

impl Actor {
    /// Create an actor centered on `position`.
    ///
    /// The config is validated here so the step never sees bad tuning.
    pub fn new(id: ActorId, config: ActorConfig, position: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            config,
            position,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            on_ground: false,
            appear: None,
            slope: SlopeContact::default(),
            snapshot: TickSnapshot::at(position),
            wall_contact: 0,
            reactions: Vec::new(),
            scratch: HitBuffer::with_capacity(8),
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Handle of this actor.
    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Authoring-time tuning.
    #[inline]
    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Current (possibly interpolated) center position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision box at the current position.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.config.half_extents)
    }

    /// Current velocity `(x_speed, y_speed)`.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Replace the velocity.
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Whether the last downward move was blocked and the ground check
    /// still finds a surface.
    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Whether the appear sequence is running.
    #[inline]
    pub fn is_appearing(&self) -> bool {
        self.appear.is_some()
    }

    /// Slope state computed by the last tick's classifier.
    #[inline]
    pub fn slope_state(&self) -> SlopeState {
        self.slope.state
    }

    /// Slope contact, including the last engaged surface.
    #[inline]
    pub fn slope_contact(&self) -> &SlopeContact {
        &self.slope
    }

    /// Snapshot of the last fixed tick.
    #[inline]
    pub fn snapshot(&self) -> &TickSnapshot {
        &self.snapshot
    }

    /// Multiplier applied to configured gravity.
    #[inline]
    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    /// Set the gravity multiplier (variable jump height).
    #[inline]
    pub fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    /// Effective downward acceleration.
    #[inline]
    pub fn effective_gravity(&self) -> f32 {
        self.config.gravity * self.gravity_scale
    }

    /// Replace the configured gravity (e.g. a platform starting to fall).
    pub fn set_gravity(&mut self, gravity: f32) {
        self.config.gravity = gravity;
    }

    /// Side the actor was blocked on horizontally during the last tick.
    #[inline]
    pub fn wall_contact(&self) -> i32 {
        self.wall_contact
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Register a reaction to axis hits. Reactions run in registration order.
    pub fn add_reaction(&mut self, reaction: impl HitReaction + 'static) {
        self.reactions.push(Box::new(reaction));
    }

    /// Move instantly to `position`, discarding interpolation state.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.snapshot.start = position;
        self.snapshot.end = position;
    }

    /// Whether the actor's feet are at or above a platform top at `top_y`.
    pub fn is_standing_on(&self, top_y: f32) -> bool {
        self.bounds().min.y >= top_y - ONE_PIXEL
    }

    #[inline]
    pub(crate) fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("on_ground", &self.on_ground)
            .field("appear", &self.appear)
            .field("slope", &self.slope)
            .field("reactions", &self.reactions.len())
            .finish()
    }
}
