//! Physics Module
//!
//! Fixed-timestep raycast movement for platformer actors.
//!
//! ## Module Structure
//!
//! - `layers`: Collision layers and the movement query filter
//! - `collider`: Static colliders, slope surfaces, hittable capability
//! - `world`: Collider storage and shape-cast queries
//! - `query`: Cast results and the reusable hit buffer
//! - `context`: Validated engine configuration
//! - `actor`: Actor state and accessors
//! - `slope`: Slope classifier
//! - `mover`: Axis mover and wall pre-check
//! - `appear`: Appear sequence
//! - `step`: Per-actor fixed tick
//! - `interpolate`: Render interpolation
//! - `events`: Axis hits, reactions and tick events
//! - `control`: Walk/run/jump intents
//! - `level`: ASCII tile-grid levels
//! - `scene`: World + actors + fixed-step clock

pub mod layers;
pub mod collider;
pub mod world;
pub mod query;
pub mod context;
pub mod actor;
pub mod slope;
pub mod mover;
pub mod appear;
pub mod step;
pub mod interpolate;
pub mod events;
pub mod control;
pub mod level;
pub mod scene;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use layers::{Layers, QueryFilter};
pub use collider::{Collider, ColliderId, HitContext, Hittable, ItemBlock, SlopeSurface};
pub use world::{ColliderDesc, CollisionWorld};
pub use query::{HitBuffer, RaycastHit};
pub use context::PhysicsContext;
pub use actor::{Actor, ActorId, TickSnapshot};
pub use slope::{SlopeContact, SlopeState};
pub use mover::{AxisMove, Displacement};
pub use step::{StepEnv, TickResult};
pub use events::{Axis, AxisHit, HitReaction, PhysicsEvent, PhysicsEventKind, ReverseOnWall};
pub use control::{Locomotion, LocomotionConfig, Movable};
pub use level::{Level, LevelError};
pub use scene::Scene;
