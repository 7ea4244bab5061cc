//! Collision Layers and Query Filter
//!
//! Every collider sits on one or more layers. Movement queries run through a
//! [`QueryFilter`] that drops trigger-only colliders and the layers that must
//! never block an actor (other movable actors, damage-detector volumes).

use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;

/// Layer bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layers(pub u32);

impl Layers {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Static level geometry: ground, walls, slopes, blocks.
    pub const TERRAIN: Self = Self(1 << 0);

    /// Movable actors: players, enemies, moving platforms.
    pub const ACTORS: Self = Self(1 << 1);

    /// Volumes that only detect damage (hurtboxes, stomp sensors).
    pub const DAMAGE_DETECTOR: Self = Self(1 << 2);

    /// Solid objects that are not terrain (item blocks, pipes).
    pub const PROPS: Self = Self(1 << 3);

    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Check if all of `other`'s bits are set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of `other`'s bits are set.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Union of both sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Everything in `self` not in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for Layers {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Which colliders a movement query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Layers that are considered
    pub mask: Layers,
    /// Whether trigger-only colliders are reported
    pub include_triggers: bool,
}

impl QueryFilter {
    /// Filter that accepts everything.
    pub const ALL: Self = Self {
        mask: Layers::ALL,
        include_triggers: true,
    };

    /// Build the movement filter from engine config.
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            mask: Layers::ALL.difference(config.excluded_layers),
            include_triggers: config.include_triggers,
        }
    }

    /// Filter restricted to `layers`, solids only.
    pub const fn only(layers: Layers) -> Self {
        Self {
            mask: layers,
            include_triggers: false,
        }
    }

    /// Check a collider's layers and trigger flag against this filter.
    #[inline]
    pub fn accepts(&self, layers: Layers, is_trigger: bool) -> bool {
        if is_trigger && !self.include_triggers {
            return false;
        }
        self.mask.intersects(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ops() {
        let both = Layers::TERRAIN | Layers::PROPS;
        assert!(both.contains(Layers::TERRAIN));
        assert!(both.intersects(Layers::PROPS));
        assert!(!both.intersects(Layers::ACTORS));
        assert_eq!(both.difference(Layers::PROPS), Layers::TERRAIN);
    }

    #[test]
    fn test_default_filter_excludes_actors_and_detectors() {
        let filter = QueryFilter::from_config(&PhysicsConfig::default());
        assert!(filter.accepts(Layers::TERRAIN, false));
        assert!(filter.accepts(Layers::PROPS, false));
        assert!(!filter.accepts(Layers::ACTORS, false));
        assert!(!filter.accepts(Layers::DAMAGE_DETECTOR, false));
        assert!(!filter.accepts(Layers::TERRAIN, true), "triggers never block");
    }

    #[test]
    fn test_filter_with_triggers() {
        let config = PhysicsConfig {
            include_triggers: true,
            ..PhysicsConfig::default()
        };
        let filter = QueryFilter::from_config(&config);
        assert!(filter.accepts(Layers::TERRAIN, true));
    }
}
