//! Physics Events
//!
//! Structured notifications produced while stepping actors. Hits along an
//! axis are dispatched immediately to the actor's registered
//! [`HitReaction`]s (velocity not yet zeroed) and also recorded as
//! [`PhysicsEvent`]s returned with the tick result.

use glam::Vec2;
use serde::Serialize;

use crate::physics::actor::ActorId;
use crate::physics::collider::ColliderId;

/// Movement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

/// An actor was blocked while moving along an axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisHit {
    /// Actor that was blocked
    pub actor: ActorId,
    /// Axis of the blocked move
    pub axis: Axis,
    /// Blocking colliders, nearest first
    pub colliders: Vec<ColliderId>,
    /// Speed along the axis before any handler zeroed it
    pub incoming_speed: f32,
}

/// Reaction to axis hits, registered per actor.
///
/// Reactions run in registration order, before the engine zeroes vertical
/// speed, and may rewrite the actor's velocity (bounce, reverse, stop).
pub trait HitReaction {
    /// Handle one hit.
    fn on_hit(&mut self, hit: &AxisHit, velocity: &mut Vec2);
}

/// Reverses horizontal speed on every horizontal hit (patrolling walkers).
#[derive(Clone, Copy, Debug, Default)]
pub struct ReverseOnWall;

impl HitReaction for ReverseOnWall {
    fn on_hit(&mut self, hit: &AxisHit, velocity: &mut Vec2) {
        if hit.axis == Axis::X {
            velocity.x = -hit.incoming_speed;
        }
    }
}

/// Event payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PhysicsEventKind {
    /// Blocked along an axis
    Hit(AxisHit),

    /// Upward hit that no hittable collider handled; the host plays its
    /// default bump feedback
    HeadBump {
        /// Colliders bumped
        colliders: Vec<ColliderId>,
    },

    /// Downward move was blocked while airborne
    Landed {
        /// Downward speed at impact
        impact_speed: f32,
    },

    /// Ground check found nothing below
    LeftGround,

    /// Slope classifier engaged a different slope
    SlopeEngaged {
        /// Slope collider
        collider: ColliderId,
        /// New slope factor
        slope_factor: f32,
    },

    /// Appear sequence completed
    AppearFinished,

    /// Spawned inside geometry and pushed out
    SpawnPushed {
        /// Applied offset
        offset: Vec2,
    },
}

/// A physics event with timing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhysicsEvent {
    /// Tick when the event occurred
    pub tick: u64,
    /// Actor involved
    pub actor: ActorId,
    /// Event data
    pub kind: PhysicsEventKind,
}

impl PhysicsEvent {
    /// Create a new event.
    pub fn new(tick: u64, actor: ActorId, kind: PhysicsEventKind) -> Self {
        Self { tick, actor, kind }
    }

    /// Axis hit event.
    pub fn hit(tick: u64, hit: AxisHit) -> Self {
        Self::new(tick, hit.actor, PhysicsEventKind::Hit(hit))
    }

    /// Whether this is a hit along `axis`.
    pub fn is_hit_on(&self, axis: Axis) -> bool {
        matches!(&self.kind, PhysicsEventKind::Hit(h) if h.axis == axis)
    }
}
