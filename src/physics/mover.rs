//! Axis Mover
//!
//! Moves an actor along one axis at a time, stopping `anti_trap_epsilon`
//! short of whatever blocks it. Horizontal moves carry the slope overlay:
//! ascending turns the move into a diagonal along the incline, descending
//! follows the horizontal move with a downward hug of the surface.
//!
//! Zero-length requests return immediately without casting.

use glam::Vec2;
use tracing::debug;

use crate::core::math::{axis_dir_x, axis_dir_y, sign, sign_f32};
use crate::physics::actor::Actor;
use crate::physics::collider::{ColliderId, HitContext};
use crate::physics::events::{Axis, AxisHit, PhysicsEvent, PhysicsEventKind};
use crate::physics::step::StepEnv;

/// Outcome of a single-axis move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisMove {
    /// Signed distance actually travelled along the axis
    pub achieved: f32,
    /// Colliders that stopped the move, nearest first
    pub blocked_by: Vec<ColliderId>,
}

impl AxisMove {
    /// Whether anything blocked the move.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        !self.blocked_by.is_empty()
    }
}

/// Outcome of a free-direction move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Displacement {
    /// Offset actually applied
    pub applied: Vec2,
    /// Number of colliders found along the way
    pub hits: usize,
}

impl Actor {
    /// Cast the actor's box into its scratch buffer.
    pub(crate) fn cast(&mut self, env: &StepEnv<'_>, direction: Vec2, distance: f32) -> usize {
        let bounds = self.bounds();
        env.world
            .cast(&bounds, direction, distance, env.physics.filter(), &mut self.scratch)
    }

    /// Distance that can be covered before stopping `epsilon` short of the
    /// nearest scratch hit, never negative and never beyond `wanted`.
    fn clearance(&self, epsilon: f32, wanted: f32) -> f32 {
        self.scratch
            .nearest()
            .map_or(wanted, |hit| (hit.distance - epsilon).clamp(0.0, wanted))
    }

    // =========================================================================
    // HORIZONTAL
    // =========================================================================

    /// Move horizontally by `distance`, applying the slope overlay.
    ///
    /// Hit reactions see the current horizontal speed as incoming speed.
    pub fn move_x(&mut self, env: &mut StepEnv<'_>, distance: f32) -> AxisMove {
        let incoming = self.velocity.x;
        self.move_x_at(env, distance, incoming)
    }

    /// [`Actor::move_x`] reporting `incoming` as the speed behind the move.
    pub(crate) fn move_x_at(
        &mut self,
        env: &mut StepEnv<'_>,
        distance: f32,
        incoming: f32,
    ) -> AxisMove {
        if distance == 0.0 {
            return AxisMove::default();
        }
        let eps = env.physics.epsilon();
        let wanted = distance.abs();
        let mut result = AxisMove::default();

        let hits = self.cast(env, axis_dir_x(distance), wanted + eps);
        if hits == 0 {
            self.translate(Vec2::new(distance, 0.0));
            result.achieved = distance;
        } else if let Some(engaged) = self.slope.ascending().copied() {
            let dx = distance * engaged.slope_factor;
            let climb = Vec2::new(dx, dx.abs() * engaged.surface.degree());
            let moved = self.move_by(env, climb);
            result.achieved = moved.applied.x;
            if moved.hits > 0 {
                result.blocked_by = self.scratch.colliders();
            }
        } else {
            let actual = self.clearance(eps, wanted);
            self.translate(Vec2::new(sign_f32(distance) * actual, 0.0));
            result.achieved = sign_f32(distance) * actual;
            result.blocked_by = self.scratch.colliders();
        }

        if result.is_blocked() {
            self.wall_contact = sign(distance);
            self.dispatch_hit(env, Axis::X, result.blocked_by.clone(), incoming);
        }

        // Hug the downslope; corrected again next tick if it overshoots
        if let Some(engaged) = self.slope.descending().copied() {
            let drop = result.achieved.abs() * engaged.surface.degree();
            self.move_by(env, Vec2::new(0.0, -drop));
        }

        result
    }

    // =========================================================================
    // VERTICAL
    // =========================================================================

    /// Move vertically by `distance`, maintaining ground state.
    ///
    /// A blocked move always zeroes vertical speed; a blocked downward move
    /// puts the actor on the ground.
    pub fn move_y(&mut self, env: &mut StepEnv<'_>, distance: f32) -> AxisMove {
        let incoming = self.velocity.y;
        self.move_y_at(env, distance, incoming)
    }

    /// [`Actor::move_y`] reporting `incoming` as the speed behind the move.
    pub(crate) fn move_y_at(
        &mut self,
        env: &mut StepEnv<'_>,
        distance: f32,
        incoming: f32,
    ) -> AxisMove {
        if distance == 0.0 {
            return AxisMove::default();
        }
        let eps = env.physics.epsilon();
        let wanted = distance.abs();

        let hits = self.cast(env, axis_dir_y(distance), wanted + eps);
        if hits == 0 {
            self.translate(Vec2::new(0.0, distance));
            self.check_ground(env);
            return AxisMove {
                achieved: distance,
                blocked_by: Vec::new(),
            };
        }

        let actual = sign_f32(distance) * self.clearance(eps, wanted);
        self.translate(Vec2::new(0.0, actual));
        let blocked_by = self.scratch.colliders();

        self.dispatch_hit(env, Axis::Y, blocked_by.clone(), incoming);
        if distance > 0.0 {
            self.bump_head(env, &blocked_by);
        } else {
            if !self.on_ground {
                debug!(actor = %self.id, impact_speed = incoming, "landed");
                env.emit(self.id, PhysicsEventKind::Landed { impact_speed: incoming });
            }
            self.on_ground = true;
        }
        self.velocity.y = 0.0;

        AxisMove {
            achieved: actual,
            blocked_by,
        }
    }

    /// Clear ground state if nothing is just below.
    fn check_ground(&mut self, env: &mut StepEnv<'_>) {
        let reach = env.physics.config().ground_check_distance;
        if self.cast(env, Vec2::NEG_Y, reach) > 0 {
            return;
        }
        if self.on_ground {
            debug!(actor = %self.id, "left ground");
            env.emit(self.id, PhysicsEventKind::LeftGround);
        }
        self.on_ground = false;
    }

    /// Default upward-hit handling: every hittable collider gets a look,
    /// and if none handled it the host plays its bump feedback.
    fn bump_head(&mut self, env: &mut StepEnv<'_>, colliders: &[ColliderId]) {
        let ctx = HitContext {
            actor: self.id,
            position: self.position,
            velocity: self.velocity,
        };
        let mut handled = false;
        for id in colliders {
            if let Some(collider) = env.world.collider_mut(*id) {
                handled |= collider.offer_hit(&ctx);
            }
        }
        if !handled {
            env.emit(
                self.id,
                PhysicsEventKind::HeadBump {
                    colliders: colliders.to_vec(),
                },
            );
        }
    }

    /// Run the registered reactions, then record the hit.
    fn dispatch_hit(
        &mut self,
        env: &mut StepEnv<'_>,
        axis: Axis,
        colliders: Vec<ColliderId>,
        incoming_speed: f32,
    ) {
        let hit = AxisHit {
            actor: self.id,
            axis,
            colliders,
            incoming_speed,
        };
        for reaction in self.reactions.iter_mut() {
            reaction.on_hit(&hit, &mut self.velocity);
        }
        env.events.push(PhysicsEvent::hit(env.tick, hit));
    }

    // =========================================================================
    // FREE DIRECTION
    // =========================================================================

    /// Move by an arbitrary offset with a single cast.
    ///
    /// Unlike the axis moves, this fires no hit callbacks. A blocked move
    /// shorter than the anti-trap epsilon does not move at all.
    pub fn move_by(&mut self, env: &StepEnv<'_>, offset: Vec2) -> Displacement {
        let length = offset.length();
        if length == 0.0 {
            return Displacement::default();
        }
        let eps = env.physics.epsilon();

        let hits = self.cast(env, offset / length, length + eps);
        if hits == 0 {
            self.translate(offset);
            return Displacement { applied: offset, hits };
        }
        if length <= eps {
            return Displacement {
                applied: Vec2::ZERO,
                hits,
            };
        }
        let applied = offset * (self.clearance(eps, length) / length);
        self.translate(applied);
        Displacement { applied, hits }
    }

    // =========================================================================
    // STOP TOWARDS WALL
    // =========================================================================

    /// Horizontal direction of travel, following the incline when ascending.
    pub fn slope_aware_dir_x(&self) -> Vec2 {
        let x = sign_f32(self.velocity.x);
        match self.slope.ascending() {
            Some(engaged) if x != 0.0 => {
                let sf = engaged.slope_factor;
                Vec2::new(x * sf, sf * engaged.surface.degree())
            }
            _ => Vec2::new(x, 0.0),
        }
    }

    /// Whether a plain wall sits within epsilon along `direction`.
    ///
    /// Any slope among the hits lets the actor keep its speed.
    pub fn is_against_wall(&mut self, env: &StepEnv<'_>, direction: Vec2) -> bool {
        if direction == Vec2::ZERO {
            return false;
        }
        let hits = self.cast(env, direction, env.physics.epsilon());
        hits > 0 && !self.scratch.any_slope()
    }

    /// Zero the speed of each axis that is pressed against a wall.
    ///
    /// Returns the velocity as it was before zeroing.
    pub(crate) fn stop_towards_walls(&mut self, env: &StepEnv<'_>) -> Vec2 {
        let requested = self.velocity;
        let dir_x = self.slope_aware_dir_x();
        if self.is_against_wall(env, dir_x) {
            debug!(actor = %self.id, x_speed = requested.x, "wall stop x");
            self.velocity.x = 0.0;
        }
        let dir_y = axis_dir_y(self.velocity.y);
        if self.is_against_wall(env, dir_y) {
            self.velocity.y = 0.0;
        }
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActorConfig, PhysicsConfig};
    use crate::core::math::{approx_eq, approx_eq_vec};
    use crate::core::shape::Aabb;
    use crate::physics::actor::ActorId;
    use crate::physics::collider::{ItemBlock, SlopeSurface};
    use crate::physics::events::ReverseOnWall;
    use crate::physics::layers::Layers;
    use crate::physics::slope::SlopeState;
    use crate::physics::testing::Rig;
    use crate::physics::world::ColliderDesc;
    use proptest::prelude::*;

    const EPS: f32 = 1.0 / 256.0;

    fn unit_actor(position: Vec2) -> Actor {
        Actor::new(ActorId(1), ActorConfig::default(), position).unwrap()
    }

    /// Rig whose wall starts `gap` to the right of a unit actor at the origin.
    fn wall_rig(gap: f32) -> (Rig, ColliderId) {
        let mut rig = Rig::new();
        let id = rig
            .world
            .add_block(Aabb::new(Vec2::new(0.5 + gap, -5.0), Vec2::new(1.5 + gap, 5.0)));
        (rig, id)
    }

    #[test]
    fn test_zero_distance_is_noop() {
        let (mut rig, _) = wall_rig(0.0);
        let mut actor = unit_actor(Vec2::ZERO);
        actor.on_ground = true;

        assert_eq!(actor.move_x(&mut rig.env(), 0.0), AxisMove::default());
        assert_eq!(actor.move_y(&mut rig.env(), 0.0), AxisMove::default());
        assert_eq!(actor.position(), Vec2::ZERO);
        assert!(actor.is_on_ground(), "no ground check, no ground change");
        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_blocked_x_stops_short_and_fires_hit() {
        let config = PhysicsConfig {
            anti_trap_epsilon: 0.01,
            ..PhysicsConfig::default()
        };
        let mut rig = Rig::with_config(config);
        let wall = rig
            .world
            .add_block(Aabb::new(Vec2::new(0.6, -5.0), Vec2::new(1.6, 5.0)));
        let mut actor = unit_actor(Vec2::ZERO);
        actor.set_velocity(Vec2::new(5.0, 0.0));

        let moved = actor.move_x(&mut rig.env(), 0.1);
        assert!(approx_eq(moved.achieved, 0.09));
        assert_eq!(moved.blocked_by, vec![wall]);
        assert_eq!(actor.wall_contact(), 1);
        assert!(rig.events[0].is_hit_on(Axis::X));
        // Horizontal speed is left to the caller
        assert_eq!(actor.velocity().x, 5.0);
    }

    #[test]
    fn test_flush_against_wall_moves_nothing() {
        let (mut rig, _) = wall_rig(EPS * 0.5);
        let mut actor = unit_actor(Vec2::ZERO);
        let moved = actor.move_x(&mut rig.env(), 0.3);
        assert_eq!(moved.achieved, 0.0);
        assert!(moved.is_blocked());
        assert_eq!(actor.position(), Vec2::ZERO);
    }

    #[test]
    fn test_reactions_see_incoming_speed() {
        let (mut rig, _) = wall_rig(0.05);
        let mut actor = unit_actor(Vec2::ZERO);
        actor.add_reaction(ReverseOnWall);
        actor.set_velocity(Vec2::new(3.0, 0.0));

        actor.move_x(&mut rig.env(), 0.2);
        assert_eq!(actor.velocity().x, -3.0);
    }

    #[test]
    fn test_landing_sets_ground_and_zeroes_speed() {
        let mut rig = Rig::new();
        let floor = rig
            .world
            .add_block(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0)));
        let mut actor = unit_actor(Vec2::new(0.0, 0.55));
        actor.set_velocity(Vec2::new(0.0, -5.0));

        let moved = actor.move_y(&mut rig.env(), -0.1);
        assert!(approx_eq(moved.achieved, -(0.05 - EPS)));
        assert_eq!(moved.blocked_by, vec![floor]);
        assert!(actor.is_on_ground());
        assert_eq!(actor.velocity().y, 0.0);
        assert!(rig
            .events
            .iter()
            .any(|e| matches!(
                e.kind,
                PhysicsEventKind::Landed { impact_speed } if impact_speed == -5.0
            )));
    }

    #[test]
    fn test_walking_off_ledge_leaves_ground() {
        let mut rig = Rig::new();
        rig.world
            .add_block(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(0.0, 0.0)));
        let mut actor = unit_actor(Vec2::new(1.0, 0.5 + EPS));
        actor.on_ground = true;

        actor.move_y(&mut rig.env(), -0.02);
        assert!(!actor.is_on_ground());
        assert!(rig
            .events
            .iter()
            .any(|e| e.kind == PhysicsEventKind::LeftGround));
    }

    #[test]
    fn test_upward_move_keeps_ground_contact() {
        let mut rig = Rig::new();
        rig.world
            .add_block(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0)));
        let mut actor = unit_actor(Vec2::new(0.0, 0.5 + EPS));
        actor.on_ground = true;

        // Still within the ground check after rising a hair
        actor.move_y(&mut rig.env(), EPS * 0.5);
        assert!(actor.is_on_ground());

        actor.move_y(&mut rig.env(), 0.2);
        assert!(!actor.is_on_ground());
    }

    #[test]
    fn test_head_bump_offers_hittable() {
        let mut rig = Rig::new();
        let block = rig.world.insert(
            ColliderDesc::block(Aabb::new(Vec2::new(-0.5, 1.0), Vec2::new(0.5, 2.0)))
                .with_layers(Layers::PROPS)
                .with_hittable(ItemBlock::new(1)),
        );
        let mut actor = unit_actor(Vec2::ZERO);
        actor.set_velocity(Vec2::new(0.0, 8.0));

        actor.move_y(&mut rig.env(), 0.8);
        assert_eq!(actor.velocity().y, 0.0);
        assert!(!actor.is_on_ground(), "upward hits never ground");
        assert!(!rig
            .events
            .iter()
            .any(|e| matches!(e.kind, PhysicsEventKind::HeadBump { .. })));

        // Emptied block falls back to default feedback
        actor.set_velocity(Vec2::new(0.0, 8.0));
        actor.move_y(&mut rig.env(), 0.8);
        assert!(rig.events.iter().any(|e| matches!(
            &e.kind,
            PhysicsEventKind::HeadBump { colliders } if colliders == &vec![block]
        )));
    }

    #[test]
    fn test_move_by_stops_short_along_offset() {
        let (mut rig, _) = wall_rig(0.5);
        let mut actor = unit_actor(Vec2::ZERO);

        let moved = actor.move_by(&rig.env(), Vec2::new(1.0, 0.0));
        assert_eq!(moved.hits, 1);
        assert!(approx_eq_vec(moved.applied, Vec2::new(0.5 - EPS, 0.0)));

        // Too short to bother
        let moved = actor.move_by(&rig.env(), Vec2::new(EPS * 0.5, 0.0));
        assert_eq!(moved.applied, Vec2::ZERO);
        assert_eq!(moved.hits, 1);
    }

    #[test]
    fn test_ascending_move_climbs_incline() {
        let mut rig = Rig::new();
        let surface = SlopeSurface::new(1, 0.5).unwrap();
        let slope = rig.world.add_slope(Vec2::new(0.0, 0.0), 8.0, surface).unwrap();

        // Bottom-right corner at x=1 sits EPS above the incline (height 0.5)
        let mut actor = unit_actor(Vec2::new(0.5, 1.0 + EPS));
        actor.slope.state = SlopeState::Ascending;
        actor.slope.engage(slope, surface);

        let before = actor.position();
        actor.move_x(&mut rig.env(), 0.2);
        let delta = actor.position() - before;
        assert!(approx_eq(delta.x, 0.2 * surface.slope_factor()));
        assert!(approx_eq(delta.y / delta.x, 0.5));
    }

    #[test]
    fn test_stop_towards_wall_ignores_slopes() {
        let (mut rig, _) = wall_rig(EPS * 0.5);
        let mut actor = unit_actor(Vec2::ZERO);
        actor.set_velocity(Vec2::new(4.0, 0.0));
        let requested = actor.stop_towards_walls(&rig.env());
        assert_eq!(requested.x, 4.0);
        assert_eq!(actor.velocity().x, 0.0);

        let mut rig = Rig::new();
        let surface = SlopeSurface::new(1, 1.0).unwrap();
        rig.world.add_slope(Vec2::new(0.5 + EPS * 0.25, -0.5), 2.0, surface).unwrap();
        let mut actor = unit_actor(Vec2::new(0.0, 0.0));
        actor.set_velocity(Vec2::new(4.0, 0.0));
        actor.stop_towards_walls(&rig.env());
        assert_eq!(actor.velocity().x, 4.0);
    }

    proptest! {
        #[test]
        fn test_open_lane_moves_exactly(start in -50.0f32..50.0, distance in 0.001f32..20.0) {
            let mut rig = Rig::new();
            let mut actor = unit_actor(Vec2::new(start, 0.0));
            let moved = actor.move_x(&mut rig.env(), distance);
            prop_assert_eq!(moved.achieved, distance);
            prop_assert_eq!(actor.position().x, start + distance);
            prop_assert!(!moved.is_blocked());
        }

        #[test]
        fn test_obstructed_move_stops_epsilon_short(gap in 0.0f32..2.0, extra in 0.001f32..3.0) {
            let (mut rig, _) = wall_rig(gap);
            let mut actor = unit_actor(Vec2::ZERO);
            let moved = actor.move_x(&mut rig.env(), gap + extra);
            prop_assert!(moved.is_blocked());
            prop_assert!(moved.achieved >= 0.0);
            prop_assert!(approx_eq(moved.achieved, (gap - EPS).max(0.0)));
        }
    }
}
