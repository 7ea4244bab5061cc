//! Control Intents
//!
//! Player-style locomotion layered on top of the physics core. Input is
//! delivered as discrete intents (`set_horizontal_intent`, `request_jump`,
//! ...) and applied once per tick, before the physics step, through the
//! [`Movable`] capability. Nothing here touches collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::math::sign;
use crate::physics::actor::Actor;

/// What a control behavior may read and change on a moving body.
pub trait Movable {
    /// Current velocity.
    fn velocity(&self) -> Vec2;

    /// Replace the velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Whether the body stands on something.
    fn is_on_ground(&self) -> bool;

    /// Set the gravity multiplier.
    fn set_gravity_scale(&mut self, scale: f32);

    /// Side the body was blocked on horizontally last tick (-1, 0, +1).
    fn wall_contact(&self) -> i32;

    /// Replace the horizontal speed.
    fn set_x_speed(&mut self, x: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(x, v.y));
    }

    /// Replace the vertical speed.
    fn set_y_speed(&mut self, y: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(v.x, y));
    }
}

impl Movable for Actor {
    fn velocity(&self) -> Vec2 {
        Actor::velocity(self)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        Actor::set_velocity(self, velocity);
    }

    fn is_on_ground(&self) -> bool {
        Actor::is_on_ground(self)
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        Actor::set_gravity_scale(self, scale);
    }

    fn wall_contact(&self) -> i32 {
        Actor::wall_contact(self)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Acceleration profile for one gait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccProfile {
    /// Top horizontal speed
    pub max_speed: f32,
    /// Acceleration while speeding up in the current direction
    pub run_acc: f32,
    /// Acceleration while turning around
    pub turn_acc: f32,
}

impl AccProfile {
    /// Create a profile.
    pub const fn new(max_speed: f32, run_acc: f32, turn_acc: f32) -> Self {
        Self {
            max_speed,
            run_acc,
            turn_acc,
        }
    }
}

/// Locomotion tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Profile without the run key
    pub walk: AccProfile,
    /// Profile with the run key held
    pub run: AccProfile,
    /// Speed kick when starting to move from below it
    pub min_speed: f32,
    /// Vertical speed given by a jump
    pub jump_speed: f32,
    /// Gravity scale while a walking jump is held and rising
    pub walk_jump_gravity_scale: f32,
    /// Gravity scale while a running jump is held and rising
    pub run_jump_gravity_scale: f32,
    /// Horizontal speed above which a jump counts as running
    pub run_speed_threshold: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk: AccProfile::new(35.0 / 8.0, 0.125, 0.5),
            run: AccProfile::new(8.0, 0.125, 0.5),
            min_speed: 1.0,
            jump_speed: 10.0,
            walk_jump_gravity_scale: 0.6,
            run_jump_gravity_scale: 0.5,
            run_speed_threshold: 5.0 / 8.0,
        }
    }
}

// =============================================================================
// LOCOMOTION
// =============================================================================

/// Intent-driven walking, running and jumping.
#[derive(Clone, Debug, Default)]
pub struct Locomotion {
    config: LocomotionConfig,
    intent: i32,
    run_held: bool,
    jump_held: bool,
    jump_armed: bool,
    disabled: bool,
}

impl Locomotion {
    /// Locomotion with the given tuning and no input.
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Tuning.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Horizontal input direction; any value is reduced to its sign.
    pub fn set_horizontal_intent(&mut self, direction: i32) {
        self.intent = direction.signum();
    }

    /// Current horizontal intent (-1, 0, +1).
    pub fn horizontal_intent(&self) -> i32 {
        self.intent
    }

    /// Run key state.
    pub fn set_run_held(&mut self, held: bool) {
        self.run_held = held;
    }

    /// Jump key pressed. Arms a jump unless the body is still rising.
    pub fn request_jump(&mut self, body: &impl Movable) {
        self.jump_held = true;
        if body.velocity().y <= 0.0 {
            self.jump_armed = true;
        }
    }

    /// Jump key released.
    pub fn release_jump(&mut self) {
        self.jump_held = false;
        self.jump_armed = false;
    }

    /// Whether the jump key is held.
    pub fn is_jump_held(&self) -> bool {
        self.jump_held
    }

    /// Ignore horizontal intent (cutscenes, death).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Running needs the run key and no wall in the way.
    pub fn is_running(&self, body: &impl Movable) -> bool {
        let towards_wall = self.intent != 0 && body.wall_contact() == self.intent;
        self.run_held && !towards_wall
    }

    /// Profile for the current gait.
    pub fn profile(&self, body: &impl Movable) -> AccProfile {
        if self.is_running(body) {
            self.config.run
        } else {
            self.config.walk
        }
    }

    /// Gravity multiplier for variable jump height.
    pub fn gravity_scale(&self, body: &impl Movable) -> f32 {
        let v = body.velocity();
        if !self.jump_held || v.y <= 0.0 {
            1.0
        } else if v.x.abs() > self.config.run_speed_threshold {
            self.config.run_jump_gravity_scale
        } else {
            self.config.walk_jump_gravity_scale
        }
    }

    /// Apply this tick's intents to `body`. Returns whether a jump fired.
    pub fn apply(&mut self, body: &mut impl Movable, dt: f32) -> bool {
        let direction = if self.disabled { 0 } else { self.intent };
        if direction != 0 {
            self.accelerate(body, direction, dt);
        } else if body.velocity().x != 0.0 {
            self.decelerate(body, dt);
        }

        let jumped = self.jump_armed && body.is_on_ground();
        if jumped {
            body.set_y_speed(self.config.jump_speed);
            self.jump_armed = false;
            debug!(jump_speed = self.config.jump_speed, "jump");
        }

        let scale = self.gravity_scale(body);
        body.set_gravity_scale(scale);
        jumped
    }

    fn accelerate(&self, body: &mut impl Movable, direction: i32, dt: f32) {
        let profile = self.profile(body);
        let dir = direction as f32;
        let mut x = body.velocity().x;

        if sign(x) != direction {
            // Turning around, or starting from rest
            x += profile.turn_acc * dir * dt;
        } else {
            if x.abs() < self.config.min_speed {
                x += self.config.min_speed * dir;
            }
            x += profile.run_acc * dir * dt;
        }
        body.set_x_speed(x.clamp(-profile.max_speed, profile.max_speed));
    }

    fn decelerate(&self, body: &mut impl Movable, dt: f32) {
        let profile = self.profile(body);
        let x = body.velocity().x;
        let before = sign(x);
        let slowed = x - profile.run_acc * before as f32 * dt;
        body.set_x_speed(if sign(slowed) == before { slowed } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActorConfig;
    use crate::core::math::approx_eq;
    use crate::physics::actor::ActorId;

    const DT: f32 = 0.02;

    fn body() -> Actor {
        Actor::new(ActorId(1), ActorConfig::new(Vec2::new(0.5, 0.5), 20.0), Vec2::ZERO).unwrap()
    }

    #[test]
    fn test_start_from_rest_gets_kick() {
        let mut body = body();
        let mut loco = Locomotion::default();
        loco.set_horizontal_intent(1);

        // First tick counts as turning: sign(0) != 1
        loco.apply(&mut body, DT);
        assert!(approx_eq(body.velocity().x, 0.5 * DT));

        loco.apply(&mut body, DT);
        assert!(approx_eq(body.velocity().x, 0.5 * DT + 1.0 + 0.125 * DT));
    }

    #[test]
    fn test_speed_capped_by_profile() {
        let mut body = body();
        body.set_velocity(Vec2::new(10.0, 0.0));
        let mut loco = Locomotion::default();
        loco.set_horizontal_intent(1);

        loco.apply(&mut body, DT);
        assert_eq!(body.velocity().x, 35.0 / 8.0);

        loco.set_run_held(true);
        body.set_velocity(Vec2::new(10.0, 0.0));
        loco.apply(&mut body, DT);
        assert_eq!(body.velocity().x, 8.0);
    }

    #[test]
    fn test_running_blocked_by_wall() {
        let mut body = body();
        let mut loco = Locomotion::default();
        loco.set_run_held(true);
        loco.set_horizontal_intent(-1);
        assert!(loco.is_running(&body));

        body.wall_contact = -1;
        assert!(!loco.is_running(&body));
        assert_eq!(loco.profile(&body), loco.config().walk);

        // Wall behind us does not matter
        loco.set_horizontal_intent(1);
        assert!(loco.is_running(&body));
    }

    #[test]
    fn test_deceleration_stops_at_zero() {
        let mut body = body();
        body.set_velocity(Vec2::new(-1.0, 0.0));
        let mut loco = Locomotion::default();

        loco.apply(&mut body, DT);
        assert!(approx_eq(body.velocity().x, -1.0 + 0.125 * DT));

        body.set_velocity(Vec2::new(0.001, 0.0));
        loco.apply(&mut body, DT);
        assert_eq!(body.velocity().x, 0.0, "sign flip clamps to zero");
    }

    #[test]
    fn test_disabled_ignores_intent() {
        let mut body = body();
        let mut loco = Locomotion::default();
        loco.set_horizontal_intent(1);
        loco.set_enabled(false);
        loco.apply(&mut body, DT);
        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn test_jump_fires_on_ground() {
        let mut body = body();
        let mut loco = Locomotion::default();

        loco.request_jump(&body);
        assert!(!loco.apply(&mut body, DT), "airborne: stays armed");

        body.on_ground = true;
        assert!(loco.apply(&mut body, DT));
        assert_eq!(body.velocity().y, 10.0);

        // Fired once
        assert!(!loco.apply(&mut body, DT));
    }

    #[test]
    fn test_jump_not_armed_while_rising() {
        let mut body = body();
        body.on_ground = true;
        body.set_velocity(Vec2::new(0.0, 3.0));
        let mut loco = Locomotion::default();

        loco.request_jump(&body);
        assert!(!loco.apply(&mut body, DT));
        assert!(loco.is_jump_held());
    }

    #[test]
    fn test_release_cancels_jump() {
        let mut body = body();
        let mut loco = Locomotion::default();
        loco.request_jump(&body);
        loco.release_jump();
        body.on_ground = true;
        assert!(!loco.apply(&mut body, DT));
    }

    #[test]
    fn test_gravity_scale_while_holding_jump() {
        let mut body = body();
        let mut loco = Locomotion::default();
        body.on_ground = true;
        loco.request_jump(&body);
        loco.apply(&mut body, DT);
        assert_eq!(body.gravity_scale(), 0.6);

        body.set_velocity(Vec2::new(2.0, 5.0));
        loco.apply(&mut body, DT);
        assert_eq!(body.gravity_scale(), 0.5);

        loco.release_jump();
        loco.apply(&mut body, DT);
        assert_eq!(body.gravity_scale(), 1.0);
    }
}
