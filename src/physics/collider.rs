//! Static Colliders
//!
//! World geometry that actors collide with. A collider is a convex polygon
//! on some layers, optionally carrying a [`SlopeSurface`] component (slope
//! geometry used by the slope classifier) and a [`Hittable`] capability
//! (reacts to being bumped from below).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::core::shape::ConvexPolygon;
use crate::physics::actor::ActorId;
use crate::physics::layers::Layers;

/// Collider handle, unique within one [`CollisionWorld`](crate::physics::CollisionWorld).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

// =============================================================================
// SLOPE SURFACE
// =============================================================================

/// Slope component: which way the surface rises and how steeply.
///
/// Immutable once placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlopeSurface {
    direction: i32,
    degree: f32,
}

impl SlopeSurface {
    /// Create a slope rising toward `direction` (-1 or +1) with rise/run `degree`.
    pub fn new(direction: i32, degree: f32) -> Result<Self, ConfigError> {
        if direction != 1 && direction != -1 {
            return Err(ConfigError::InvalidSlopeDirection(direction));
        }
        if !(degree > 0.0 && degree.is_finite()) {
            return Err(ConfigError::InvalidSlopeDegree(degree));
        }
        Ok(Self { direction, degree })
    }

    /// Horizontal direction the surface rises toward.
    #[inline]
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Rise over run.
    #[inline]
    pub fn degree(&self) -> f32 {
        self.degree
    }

    /// Scale turning horizontal speed into distance along the incline:
    /// `1 / sqrt(1 + degree²)`.
    #[inline]
    pub fn slope_factor(&self) -> f32 {
        1.0 / (1.0 + self.degree * self.degree).sqrt()
    }
}

// =============================================================================
// HITTABLE CAPABILITY
// =============================================================================

/// What a [`Hittable`] learns about the actor that bumped it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitContext {
    /// Actor that bumped the collider
    pub actor: ActorId,
    /// Actor position at the moment of the hit
    pub position: Vec2,
    /// Actor velocity before it was zeroed
    pub velocity: Vec2,
}

/// Capability for colliders that react to an actor's head bump.
pub trait Hittable {
    /// React to a hit from below. Return `true` if the hit was handled,
    /// which suppresses the default head-bump feedback.
    fn on_hit(&mut self, ctx: &HitContext) -> bool;
}

/// Block holding a number of items; each bump from below releases one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemBlock {
    contents: u32,
    released: u32,
}

impl ItemBlock {
    /// Block holding `contents` items.
    pub fn new(contents: u32) -> Self {
        Self {
            contents,
            released: 0,
        }
    }

    /// Items left inside.
    pub fn contents(&self) -> u32 {
        self.contents
    }

    /// Items released so far.
    pub fn released(&self) -> u32 {
        self.released
    }
}

impl Hittable for ItemBlock {
    fn on_hit(&mut self, _ctx: &HitContext) -> bool {
        if self.contents == 0 {
            return false;
        }
        self.contents -= 1;
        self.released += 1;
        true
    }
}

// =============================================================================
// COLLIDER
// =============================================================================

/// A static collider placed in the world.
pub struct Collider {
    pub(crate) id: ColliderId,
    pub(crate) shape: ConvexPolygon,
    pub(crate) layers: Layers,
    pub(crate) is_trigger: bool,
    pub(crate) slope: Option<SlopeSurface>,
    pub(crate) hittable: Option<Box<dyn Hittable>>,
}

impl Collider {
    /// Handle of this collider.
    #[inline]
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Collision polygon.
    #[inline]
    pub fn shape(&self) -> &ConvexPolygon {
        &self.shape
    }

    /// Layers this collider sits on.
    #[inline]
    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// Whether this collider only detects overlaps.
    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    /// Slope component, if this collider carries slope geometry.
    #[inline]
    pub fn slope(&self) -> Option<&SlopeSurface> {
        self.slope.as_ref()
    }

    /// Whether this collider reacts to head bumps.
    #[inline]
    pub fn is_hittable(&self) -> bool {
        self.hittable.is_some()
    }

    /// Offer a head bump to the hittable capability, if any.
    ///
    /// Returns `true` only when a capability exists and handled the hit.
    pub fn offer_hit(&mut self, ctx: &HitContext) -> bool {
        match self.hittable.as_mut() {
            Some(hittable) => hittable.on_hit(ctx),
            None => false,
        }
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("id", &self.id)
            .field("bounds", &self.shape.bounds())
            .field("layers", &self.layers)
            .field("is_trigger", &self.is_trigger)
            .field("slope", &self.slope)
            .field("hittable", &self.hittable.is_some())
            .finish()
    }
}
