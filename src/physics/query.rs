//! Shape-Cast Results
//!
//! A cast fills a caller-owned [`HitBuffer`] with every blocking collider
//! along the sweep, nearest first. The buffer is scratch space: its
//! contents are only meaningful until the next cast that fills it.

use serde::Serialize;

use crate::physics::collider::{ColliderId, SlopeSurface};

/// One collider hit by a shape-cast.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RaycastHit {
    /// Collider that was hit
    pub collider: ColliderId,
    /// Distance travelled before contact
    pub distance: f32,
    /// Slope component of the collider, if any
    pub slope: Option<SlopeSurface>,
}

/// Reusable, caller-owned storage for cast results.
#[derive(Clone, Debug, Default)]
pub struct HitBuffer {
    hits: Vec<RaycastHit>,
}

impl HitBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `capacity` hits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.hits.clear();
    }

    pub(crate) fn push(&mut self, hit: RaycastHit) {
        self.hits.push(hit);
    }

    /// Order nearest first; equal distances fall back to collider id.
    pub(crate) fn sort(&mut self) {
        self.hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.collider.cmp(&b.collider))
        });
    }

    /// Number of hits from the last cast.
    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether the last cast hit nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Nearest hit.
    #[inline]
    pub fn nearest(&self) -> Option<&RaycastHit> {
        self.hits.first()
    }

    /// All hits, nearest first.
    #[inline]
    pub fn hits(&self) -> &[RaycastHit] {
        &self.hits
    }

    /// Collider ids of all hits, nearest first.
    pub fn colliders(&self) -> Vec<ColliderId> {
        self.hits.iter().map(|h| h.collider).collect()
    }

    /// Whether any hit carries a slope component.
    pub fn any_slope(&self) -> bool {
        self.hits.iter().any(|h| h.slope.is_some())
    }
}
