//! Collision World
//!
//! Storage for static colliders and the shape-cast queries the movement
//! code is built on. Colliders live in a `BTreeMap` so every query visits
//! them in id order and equal-distance hits come back in a stable order.

use std::collections::BTreeMap;

use glam::Vec2;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::ConfigError;
use crate::core::shape::{self, Aabb, ConvexPolygon};
use crate::physics::collider::{Collider, ColliderId, Hittable, SlopeSurface};
use crate::physics::layers::{Layers, QueryFilter};
use crate::physics::query::{HitBuffer, RaycastHit};

/// Description of a collider to insert.
pub struct ColliderDesc {
    shape: ConvexPolygon,
    layers: Layers,
    is_trigger: bool,
    slope: Option<SlopeSurface>,
    hittable: Option<Box<dyn Hittable>>,
}

impl ColliderDesc {
    /// Solid box on the terrain layer.
    pub fn block(aabb: Aabb) -> Self {
        Self::polygon(ConvexPolygon::from_aabb(aabb))
    }

    /// Solid convex polygon on the terrain layer.
    pub fn polygon(shape: ConvexPolygon) -> Self {
        Self {
            shape,
            layers: Layers::TERRAIN,
            is_trigger: false,
            slope: None,
            hittable: None,
        }
    }

    /// Right-triangle slope standing on `base_min`, `width` wide, shaped by
    /// `surface`.
    pub fn slope(base_min: Vec2, width: f32, surface: SlopeSurface) -> Result<Self, ConfigError> {
        let height = width * surface.degree();
        let shape = ConvexPolygon::right_triangle(base_min, width, height, surface.direction())
            .ok_or(ConfigError::DegenerateShape)?;
        Ok(Self {
            slope: Some(surface),
            ..Self::polygon(shape)
        })
    }

    /// Place on `layers` instead of terrain.
    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    /// Mark as trigger-only.
    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Attach a head-bump capability.
    pub fn with_hittable(mut self, hittable: impl Hittable + 'static) -> Self {
        self.hittable = Some(Box::new(hittable));
        self
    }
}

/// All static colliders of a level.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: BTreeMap<ColliderId, Collider>,
    next_id: u32,
}

impl CollisionWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collider and return its handle.
    pub fn insert(&mut self, desc: ColliderDesc) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.insert(
            id,
            Collider {
                id,
                shape: desc.shape,
                layers: desc.layers,
                is_trigger: desc.is_trigger,
                slope: desc.slope,
                hittable: desc.hittable,
            },
        );
        id
    }

    /// Insert a solid terrain box.
    pub fn add_block(&mut self, aabb: Aabb) -> ColliderId {
        self.insert(ColliderDesc::block(aabb))
    }

    /// Insert a terrain slope.
    pub fn add_slope(
        &mut self,
        base_min: Vec2,
        width: f32,
        surface: SlopeSurface,
    ) -> Result<ColliderId, ConfigError> {
        Ok(self.insert(ColliderDesc::slope(base_min, width, surface)?))
    }

    /// Remove a collider.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(&id)
    }

    /// Look up a collider.
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Look up a collider mutably.
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(&id)
    }

    /// Number of colliders.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the world has no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate colliders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.values()
    }

    /// Sweep `shape` along `direction` for up to `max_distance`.
    ///
    /// `direction` is normalized here; a zero direction checks for overlaps
    /// at the current position, reported at distance 0. Results replace the
    /// contents of `out`, nearest first. Returns the hit count.
    pub fn cast(
        &self,
        shape: &Aabb,
        direction: Vec2,
        max_distance: f32,
        filter: &QueryFilter,
        out: &mut HitBuffer,
    ) -> usize {
        out.clear();
        let dir = direction.normalize_or_zero();
        let max_distance = max_distance.max(0.0);

        for collider in self.colliders.values() {
            if !filter.accepts(collider.layers, collider.is_trigger) {
                continue;
            }
            if let Some(distance) = shape::sweep(shape, dir, max_distance, &collider.shape) {
                out.push(RaycastHit {
                    collider: collider.id,
                    distance,
                    slope: collider.slope,
                });
            }
        }
        out.sort();

        #[cfg(feature = "debug-tracing")]
        trace!(
            ?dir,
            max_distance,
            hits = out.len(),
            nearest = ?out.nearest().map(|h| h.distance),
            "cast"
        );

        out.len()
    }

    /// Colliders overlapping `shape` right now.
    pub fn overlap(&self, shape: &Aabb, filter: &QueryFilter, out: &mut HitBuffer) -> usize {
        self.cast(shape, Vec2::ZERO, 0.0, filter, out)
    }
}
