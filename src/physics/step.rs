//! Physics Step
//!
//! The per-actor fixed tick. An actor is either running its appear
//! sequence (no gravity, no collision) or moving normally:
//!
//! ```text
//! gravity -> rest check -> snap to last solved position -> clamp speed
//!         -> classify slope -> stop towards walls -> move X -> move Y
//!         -> record tick snapshot
//! ```
//!
//! The wall pre-check zeroes speed for the following tick only. This
//! tick's displacement still uses the speed requested before the check,
//! and the axis mover keeps it from passing through anything.

use glam::Vec2;
use serde::Serialize;
use tracing::debug;

use crate::physics::actor::{Actor, ActorId};
use crate::physics::context::PhysicsContext;
use crate::physics::events::{Axis, PhysicsEvent, PhysicsEventKind};
use crate::physics::world::CollisionWorld;

/// Everything an actor needs from the outside during one tick.
pub struct StepEnv<'a> {
    /// Static geometry (mutable for hittable colliders)
    pub world: &'a mut CollisionWorld,
    /// Engine configuration and query filter
    pub physics: &'a PhysicsContext,
    /// Current tick number
    pub tick: u64,
    /// Simulated time of this tick in seconds
    pub now: f64,
    /// Sink for events produced this tick
    pub events: &'a mut Vec<PhysicsEvent>,
}

impl<'a> StepEnv<'a> {
    /// Bundle the per-tick environment.
    pub fn new(
        world: &'a mut CollisionWorld,
        physics: &'a PhysicsContext,
        tick: u64,
        now: f64,
        events: &'a mut Vec<PhysicsEvent>,
    ) -> Self {
        Self {
            world,
            physics,
            tick,
            now,
            events,
        }
    }

    /// Record an event for `actor` at the current tick.
    pub fn emit(&mut self, actor: ActorId, kind: PhysicsEventKind) {
        self.events.push(PhysicsEvent::new(self.tick, actor, kind));
    }
}

/// Result of a scene tick.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TickResult {
    /// Tick number
    pub tick: u64,
    /// Events generated this tick, in actor order
    pub events: Vec<PhysicsEvent>,
}

impl TickResult {
    /// Events involving `actor`.
    pub fn events_for(&self, actor: ActorId) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter().filter(move |e| e.actor == actor)
    }

    /// Whether `actor` was blocked along `axis` this tick.
    pub fn was_blocked(&self, actor: ActorId, axis: Axis) -> bool {
        self.events_for(actor).any(|e| e.is_hit_on(axis))
    }
}

impl Actor {
    /// Run one fixed tick.
    pub fn step(&mut self, env: &mut StepEnv<'_>) {
        if self.appear.is_some() {
            self.appear_tick(env);
            return;
        }
        self.wall_contact = 0;

        let dt = env.physics.fixed_dt();
        self.velocity.y -= self.effective_gravity() * dt;
        if self.velocity.length_squared() <= env.physics.config().rest_speed_sq {
            return;
        }

        // Undo render interpolation before solving
        if self.snapshot.timestamp.is_some() {
            self.position = self.snapshot.end;
        }

        self.clamp_speed();
        let requested = self.check_surroundings(env);
        self.move_and_record(env, requested, dt);
    }

    /// Clamp velocity to the configured limits.
    pub fn clamp_speed(&mut self) {
        let config = &self.config;
        self.velocity.x = self.velocity.x.clamp(-config.max_x_speed, config.max_x_speed);
        self.velocity.y = self.velocity.y.clamp(-config.min_y_speed, config.max_y_speed);
    }

    /// Slope classification followed by the wall pre-check. Returns the
    /// speed requested before the pre-check zeroed anything.
    fn check_surroundings(&mut self, env: &mut StepEnv<'_>) -> Vec2 {
        self.classify_slope(env);
        self.stop_towards_walls(env)
    }

    /// Move by `requested * dt`. Hits report `requested` as incoming speed,
    /// even where the wall pre-check has already zeroed the velocity.
    fn move_and_record(&mut self, env: &mut StepEnv<'_>, requested: Vec2, dt: f32) {
        self.snapshot.start = self.position;
        self.move_x_at(env, requested.x * dt, requested.x);
        self.move_y_at(env, requested.y * dt, requested.y);
        self.snapshot.end = self.position;
        self.snapshot.timestamp = Some(env.now);
    }

    /// Push the actor out of geometry it was spawned inside.
    ///
    /// Appearing actors are expected to start inside their spawner and are
    /// left alone. Returns whether a push was applied.
    pub fn settle_spawn(&mut self, env: &mut StepEnv<'_>) -> bool {
        if self.is_appearing() || self.cast(env, Vec2::ZERO, 0.0) == 0 {
            return false;
        }
        let offset = Vec2::new(0.0, env.physics.config().spawn_push);
        self.teleport(self.position + offset);
        debug!(actor = %self.id, ?offset, "spawned inside geometry, pushed out");
        env.emit(self.id, PhysicsEventKind::SpawnPushed { offset });
        true
    }
}
