//! # Platformer Physics
//!
//! Fixed-timestep raycast movement for 2D platformer actors: gravity,
//! speed clamps, axis-separated movement against static colliders, slope
//! ascent and descent, head bumps, an appear sequence, and render
//! interpolation between ticks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PLATFORMER PHYSICS                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs       - Engine / actor tuning, validation         │
//! │                                                              │
//! │  core/           - Geometry primitives                       │
//! │  ├── math.rs     - Sign helpers, approximate comparison      │
//! │  └── shape.rs    - AABB, convex polygons, swept SAT          │
//! │                                                              │
//! │  physics/        - Simulation                                │
//! │  ├── world.rs    - Colliders + shape-cast queries            │
//! │  ├── slope.rs    - Slope classifier                          │
//! │  ├── mover.rs    - Axis mover, wall pre-check                │
//! │  ├── step.rs     - Per-actor fixed tick                      │
//! │  ├── appear.rs   - Appear sequence                           │
//! │  ├── interpolate.rs - Render interpolation                   │
//! │  ├── control.rs  - Walk / run / jump intents                 │
//! │  ├── level.rs    - ASCII tile levels                         │
//! │  └── scene.rs    - Fixed-step driver                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tick Order
//!
//! Within a tick, slope classification precedes movement and X movement
//! precedes Y movement. Actors are stepped in id order and interact only
//! through collision queries. The core is single-threaded; the host frame
//! loop drives both the fixed tick and the render interpolation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod physics;

// Re-export commonly used types
pub use config::{ActorConfig, ConfigError, PhysicsConfig};
pub use crate::core::shape::{Aabb, ConvexPolygon};
pub use glam::Vec2;
pub use physics::{
    Actor, ActorId, CollisionWorld, Level, PhysicsContext, PhysicsEvent, Scene, SlopeState,
    TickResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation tick rate (Hz)
pub const DEFAULT_TICK_RATE: u32 = 50;

/// One pixel in world units (32 pixels per unit)
pub const ONE_PIXEL: f32 = 1.0 / 32.0;
