//! Engine Context
//!
//! Validated engine configuration plus the query filter derived from it.
//! Built once before the first tick and shared by every actor.

use crate::config::{ConfigError, PhysicsConfig};
use crate::physics::layers::QueryFilter;

/// Ready-to-use engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsContext {
    config: PhysicsConfig,
    filter: QueryFilter,
}

impl PhysicsContext {
    /// Validate `config` and derive the movement query filter.
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = QueryFilter::from_config(&config);
        Ok(Self { config, filter })
    }

    /// Engine tuning.
    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Filter applied to every movement cast.
    #[inline]
    pub fn filter(&self) -> &QueryFilter {
        &self.filter
    }

    /// Fixed tick length in seconds.
    #[inline]
    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    /// Gap kept between actors and blocking surfaces.
    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.config.anti_trap_epsilon
    }
}

impl Default for PhysicsContext {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        let filter = QueryFilter::from_config(&config);
        Self { config, filter }
    }
}
