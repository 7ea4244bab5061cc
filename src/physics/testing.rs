//! Test rig: a world, an engine context and an event sink for stepping
//! actors by hand.

use crate::config::PhysicsConfig;
use crate::physics::actor::Actor;
use crate::physics::context::PhysicsContext;
use crate::physics::events::PhysicsEvent;
use crate::physics::step::StepEnv;
use crate::physics::world::CollisionWorld;

pub(crate) struct Rig {
    pub world: CollisionWorld,
    pub physics: PhysicsContext,
    pub events: Vec<PhysicsEvent>,
    pub tick: u64,
    pub now: f64,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            world: CollisionWorld::new(),
            physics: PhysicsContext::new(config).unwrap(),
            events: Vec::new(),
            tick: 0,
            now: 0.0,
        }
    }

    pub fn env(&mut self) -> StepEnv<'_> {
        StepEnv::new(&mut self.world, &self.physics, self.tick, self.now, &mut self.events)
    }

    /// Advance the clock one tick and step `actor`.
    pub fn step(&mut self, actor: &mut Actor) {
        self.tick += 1;
        self.now += f64::from(self.physics.fixed_dt());
        actor.step(&mut self.env());
    }

    /// Step `actor` `n` times.
    pub fn run(&mut self, actor: &mut Actor, n: usize) {
        for _ in 0..n {
            self.step(actor);
        }
    }
}
