//! Engine and Actor Configuration
//!
//! Two layers of tuning:
//!
//! - [`PhysicsConfig`]: engine-wide constants (tick length, anti-trap
//!   epsilon, cast lengths, query filter). Validated once by
//!   [`PhysicsContext::new`](crate::physics::PhysicsContext::new).
//! - [`ActorConfig`]: authoring-time values for one kind of actor
//!   (shape, gravity, speed clamps, appear sequence).
//!
//! Both deserialize from JSON; missing fields take the defaults below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::layers::Layers;
use crate::{ONE_PIXEL, DEFAULT_TICK_RATE};

/// Configuration errors, reported at initialization time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Fixed tick length is not a positive finite number.
    #[error("fixed_dt must be positive and finite, got {0}")]
    InvalidTickLength(f32),

    /// A distance tunable is not positive and finite.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveDistance {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A speed limit or rate is negative or NaN.
    #[error("{name} must be non-negative, got {value}")]
    NegativeLimit {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Actor half extents are not positive.
    #[error("actor half extents must be positive, got ({0}, {1})")]
    InvalidExtents(f32, f32),

    /// Slope degree is not positive and finite.
    #[error("slope degree must be positive and finite, got {0}")]
    InvalidSlopeDegree(f32),

    /// Slope direction is not -1 or +1.
    #[error("slope direction must be -1 or +1, got {0}")]
    InvalidSlopeDirection(i32),

    /// Polygon collider is degenerate.
    #[error("collider polygon is degenerate")]
    DegenerateShape,
}

fn check_distance(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDistance { name, value })
    }
}

fn check_limit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // Infinity is a valid "unbounded" limit
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeLimit { name, value })
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Engine-wide physics tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed tick length in seconds
    pub fixed_dt: f32,

    /// Gap kept between an actor and any surface it is blocked by
    pub anti_trap_epsilon: f32,

    /// Length of the slope classification casts
    pub slope_check_distance: f32,

    /// Squared speed below which an actor skips movement for the tick
    pub rest_speed_sq: f32,

    /// Length of the downward cast that keeps `is_on_ground` alive
    pub ground_check_distance: f32,

    /// Upward nudge applied to actors spawned inside geometry
    pub spawn_push: f32,

    /// Layers ignored by movement queries
    pub excluded_layers: Layers,

    /// Whether trigger-only colliders block movement
    pub include_triggers: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let anti_trap_epsilon = ONE_PIXEL / 8.0;
        Self {
            fixed_dt: 1.0 / DEFAULT_TICK_RATE as f32,
            anti_trap_epsilon,
            slope_check_distance: 0.125,
            rest_speed_sq: 1.0e-8,
            ground_check_distance: 2.0 * anti_trap_epsilon,
            spawn_push: 0.01,
            excluded_layers: Layers::ACTORS.union(Layers::DAMAGE_DETECTOR),
            include_triggers: false,
        }
    }
}

impl PhysicsConfig {
    /// Check every tunable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(ConfigError::InvalidTickLength(self.fixed_dt));
        }
        check_distance("anti_trap_epsilon", self.anti_trap_epsilon)?;
        check_distance("slope_check_distance", self.slope_check_distance)?;
        check_distance("ground_check_distance", self.ground_check_distance)?;
        check_limit("rest_speed_sq", self.rest_speed_sq)?;
        check_limit("spawn_push", self.spawn_push)?;
        Ok(())
    }
}

// =============================================================================
// ACTOR CONFIG
// =============================================================================

/// Per-actor physics tuning, set at authoring time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Half size of the actor's collision box
    pub half_extents: Vec2,

    /// Downward acceleration (units/s², positive pulls down)
    pub gravity: f32,

    /// Horizontal speed limit in either direction
    #[serde(with = "unbounded")]
    pub max_x_speed: f32,

    /// Upward speed limit
    #[serde(with = "unbounded")]
    pub max_y_speed: f32,

    /// Downward speed limit (magnitude)
    #[serde(with = "unbounded")]
    pub min_y_speed: f32,

    /// Speed of the appear sequence (units/s)
    pub appear_speed: f32,

    /// Extra distance added to an appear sequence's travel
    pub appear_margin: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(0.5, 0.5),
            gravity: 0.0,
            max_x_speed: f32::INFINITY,
            max_y_speed: f32::INFINITY,
            min_y_speed: f32::INFINITY,
            appear_speed: 1.5,
            appear_margin: ONE_PIXEL,
        }
    }
}

impl ActorConfig {
    /// Config with a given box size and gravity, everything else default.
    pub fn new(half_extents: Vec2, gravity: f32) -> Self {
        Self {
            half_extents,
            gravity,
            ..Self::default()
        }
    }

    /// Check every tunable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let he = self.half_extents;
        if !(he.x > 0.0 && he.y > 0.0 && he.is_finite()) {
            return Err(ConfigError::InvalidExtents(he.x, he.y));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NegativeLimit {
                name: "gravity",
                value: self.gravity,
            });
        }
        check_limit("max_x_speed", self.max_x_speed)?;
        check_limit("max_y_speed", self.max_y_speed)?;
        check_limit("min_y_speed", self.min_y_speed)?;
        check_distance("appear_speed", self.appear_speed)?;
        check_limit("appear_margin", self.appear_margin)?;
        Ok(())
    }
}

/// Speed limits serialize as `null` when unbounded (JSON has no infinity).
mod unbounded {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        let opt = value.is_finite().then_some(*value);
        opt.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PhysicsConfig::default().validate().is_ok());
        assert!(ActorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_epsilon_is_eighth_pixel() {
        let config = PhysicsConfig::default();
        assert_eq!(config.anti_trap_epsilon, 1.0 / 256.0);
        assert_eq!(config.ground_check_distance, 2.0 / 256.0);
        assert_eq!(config.fixed_dt, 1.0 / 50.0);
    }

    #[test]
    fn test_rejects_bad_engine_config() {
        let config = PhysicsConfig {
            fixed_dt: 0.0,
            ..PhysicsConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickLength(0.0)));

        let config = PhysicsConfig {
            anti_trap_epsilon: -1.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDistance { name: "anti_trap_epsilon", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_actor_config() {
        let config = ActorConfig::new(Vec2::new(0.0, 0.5), 10.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidExtents(..))));

        let config = ActorConfig {
            max_x_speed: -1.0,
            ..ActorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeLimit { name: "max_x_speed", .. })
        ));
    }

    #[test]
    fn test_actor_config_from_json() {
        let json = r#"{
            "half_extents": [0.4, 0.5],
            "gravity": 20.0,
            "max_x_speed": 8.0,
            "min_y_speed": null
        }"#;
        let config: ActorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.half_extents, Vec2::new(0.4, 0.5));
        assert_eq!(config.gravity, 20.0);
        assert_eq!(config.max_x_speed, 8.0);
        assert!(config.max_y_speed.is_infinite());
        assert!(config.min_y_speed.is_infinite());
        assert_eq!(config.appear_speed, 1.5);
    }

    #[test]
    fn test_engine_config_from_json() {
        let json = r#"{ "fixed_dt": 0.01, "include_triggers": true }"#;
        let config: PhysicsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fixed_dt, 0.01);
        assert!(config.include_triggers);
        assert_eq!(config.slope_check_distance, 0.125);
    }
}
