//! Scene Driver
//!
//! Owns the collision world and every actor, and drives them with a
//! fixed-step accumulator. Host frames call [`Scene::advance`] with their
//! variable frame time; the scene runs as many fixed ticks as fit and then
//! interpolates every actor for rendering.
//!
//! Actors live in a `BTreeMap` so each tick steps them in id order.

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::{debug, info};

use crate::config::{ActorConfig, ConfigError};
use crate::physics::actor::{Actor, ActorId};
use crate::physics::context::PhysicsContext;
use crate::physics::events::PhysicsEvent;
use crate::physics::step::{StepEnv, TickResult};
use crate::physics::world::CollisionWorld;

/// Upper bound on ticks run by a single `advance` call.
pub const MAX_TICKS_PER_ADVANCE: u32 = 8;

/// A collision world, its actors and the fixed-step clock.
#[derive(Debug)]
pub struct Scene {
    physics: PhysicsContext,
    world: CollisionWorld,
    actors: BTreeMap<ActorId, Actor>,
    next_actor: u32,
    /// Events raised between ticks, reported with the next tick
    pending: Vec<PhysicsEvent>,
    tick: u64,
    time: f64,
    accumulator: f64,
}

impl Scene {
    /// Scene over `world` using the validated engine context.
    pub fn new(physics: PhysicsContext, world: CollisionWorld) -> Self {
        info!(
            fixed_dt = physics.fixed_dt(),
            colliders = world.len(),
            "scene created"
        );
        Self {
            physics,
            world,
            actors: BTreeMap::new(),
            next_actor: 0,
            pending: Vec::new(),
            tick: 0,
            time: 0.0,
            accumulator: 0.0,
        }
    }

    // =========================================================================
    // ACTORS
    // =========================================================================

    /// Add an actor centered on `position`, pushing it out of any geometry
    /// it was placed inside.
    ///
    /// A push-out is reported as `SpawnPushed` in the next tick's result.
    pub fn spawn(&mut self, config: ActorConfig, position: Vec2) -> Result<ActorId, ConfigError> {
        let mut actor = self.create(config, position)?;
        let id = actor.id();
        let mut env = StepEnv::new(
            &mut self.world,
            &self.physics,
            self.tick,
            self.time,
            &mut self.pending,
        );
        actor.settle_spawn(&mut env);
        self.actors.insert(id, actor);
        debug!(actor = %id, ?position, "spawned");
        Ok(id)
    }

    /// Add an actor that starts with an appear sequence.
    pub fn spawn_appearing(
        &mut self,
        config: ActorConfig,
        position: Vec2,
        direction: Vec2,
        size: Vec2,
    ) -> Result<ActorId, ConfigError> {
        let mut actor = self.create(config, position)?;
        actor.begin_appear(direction, size);
        let id = actor.id();
        self.actors.insert(id, actor);
        Ok(id)
    }

    fn create(&mut self, config: ActorConfig, position: Vec2) -> Result<Actor, ConfigError> {
        let id = ActorId(self.next_actor);
        let actor = Actor::new(id, config, position)?;
        self.next_actor += 1;
        Ok(actor)
    }

    /// Remove an actor.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    /// Look up an actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Look up an actor mutably.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Iterate actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Number of actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // =========================================================================
    // WORLD AND CLOCK
    // =========================================================================

    /// Collision world.
    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Collision world, mutably (level edits between ticks).
    pub fn world_mut(&mut self) -> &mut CollisionWorld {
        &mut self.world
    }

    /// Engine context.
    pub fn physics(&self) -> &PhysicsContext {
        &self.physics
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulated time of the last tick.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Render time: last tick plus unconsumed frame time.
    pub fn render_time(&self) -> f64 {
        self.time + self.accumulator
    }

    // =========================================================================
    // SIMULATION
    // =========================================================================

    /// Run one fixed tick over every actor.
    pub fn tick(&mut self) -> TickResult {
        self.tick += 1;
        self.time += f64::from(self.physics.fixed_dt());

        let mut result = TickResult {
            tick: self.tick,
            events: std::mem::take(&mut self.pending),
        };
        let mut env = StepEnv::new(
            &mut self.world,
            &self.physics,
            self.tick,
            self.time,
            &mut result.events,
        );
        for actor in self.actors.values_mut() {
            actor.step(&mut env);
        }
        result
    }

    /// Interpolate every actor for a render frame at `now`.
    pub fn render(&mut self, now: f64) {
        let dt = self.physics.fixed_dt();
        for actor in self.actors.values_mut() {
            actor.interpolate(now, dt);
        }
    }

    /// Consume `frame_dt` seconds of host time: run the ticks that fit,
    /// then interpolate at the resulting render time.
    ///
    /// At most [`MAX_TICKS_PER_ADVANCE`] ticks run per call; leftover time
    /// beyond that is dropped.
    pub fn advance(&mut self, frame_dt: f64) -> Vec<TickResult> {
        let step = f64::from(self.physics.fixed_dt());
        self.accumulator += frame_dt.max(0.0);

        let mut results = Vec::new();
        while self.accumulator >= step {
            if results.len() as u32 == MAX_TICKS_PER_ADVANCE {
                debug!(dropped = self.accumulator, "frame too long, dropping time");
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= step;
            results.push(self.tick());
        }

        self.render(self.render_time());
        results
    }
}
