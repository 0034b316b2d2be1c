// SPDX-License-Identifier: MIT OR Apache-2.0
//! Point-to-point and waypoint actor movement.
//!
//! [`ActorMover`] walks an actor transform between two points or along a list of path
//! points. Leg duration is derived from distance and speed. Arriving at a waypoint can
//! trigger a camera shot through [`ShotTrigger`].

use crate::curve::{AnimationCurve, Curve};
use crate::player::ShotTrigger;
use crate::pose::{convergence, look_rotation, TransformSink};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where the mover walks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveMode {
    /// Back and forth between two points
    PointToPoint {
        /// Point A, waypoint 0
        point_a: Option<Vec3>,
        /// Point B, waypoint 1
        point_b: Option<Vec3>,
    },
    /// Through an ordered list of points
    Path {
        /// Path points, waypoint index = list index
        points: Vec<Vec3>,
    },
}

impl Default for MoveMode {
    fn default() -> Self {
        Self::PointToPoint {
            point_a: None,
            point_b: None,
        }
    }
}

/// Shot to request when the actor reaches a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointTrigger {
    /// Waypoint index (0 = A, 1 = B in point mode)
    pub waypoint: usize,
    /// Shot index passed to the trigger
    pub shot_index: usize,
}

/// Coarse mover state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoverState {
    /// Not moving
    #[default]
    Idle,
    /// Walking a leg
    Moving,
    /// Paused before the next looped leg
    Waiting,
}

/// Notification emitted by the mover, collected until [`ActorMover::take_events`]
#[derive(Debug, Clone, PartialEq)]
pub enum MoverEvent {
    /// A leg began
    Started {
        /// Leg target
        target: Vec3,
    },
    /// A leg ended at its target
    Arrived {
        /// Leg target
        target: Vec3,
        /// Waypoint index, `None` for custom points
        waypoint: Option<usize>,
    },
    /// A waypoint trigger fired
    ShotTriggered {
        /// Requested shot
        shot_index: usize,
        /// Whether the trigger accepted the request
        accepted: bool,
    },
    /// The last path point was reached without looping
    PathCompleted,
    /// Movement was stopped explicitly
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LegKind {
    PointA,
    PointB,
    PathPoint(usize),
    Custom,
}

impl LegKind {
    fn waypoint(self) -> Option<usize> {
        match self {
            Self::PointA => Some(0),
            Self::PointB => Some(1),
            Self::PathPoint(index) => Some(index),
            Self::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Leg {
    kind: LegKind,
    target: Vec3,
    speed: f32,
    /// Captured from the transform on the leg's first tick
    origin: Option<Vec3>,
    elapsed: f32,
    duration: f32,
    position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Moving(Leg),
    Waiting { remaining: f32, next: LegKind },
}

/// Moves an actor transform between points
#[derive(Debug, Clone)]
pub struct ActorMover {
    /// Point or path mode
    pub mode: MoveMode,
    /// Units per second
    pub move_speed: f32,
    /// Easing over each leg
    pub movement_curve: AnimationCurve,
    /// Turn the actor toward its travel direction
    pub rotate_towards_target: bool,
    /// Rotation convergence rate, 1/s
    pub rotation_speed: f32,
    /// Loop between points, or back to the first path point
    pub loop_movement: bool,
    /// Pause before each looped leg, seconds
    pub loop_delay: f32,
    /// Start moving on [`ActorMover::begin`]
    pub auto_start: bool,
    /// Shots requested on waypoint arrival
    pub triggers: Vec<WaypointTrigger>,
    phase: Phase,
    moving_to_b: bool,
    current_target: Vec3,
    current_path_index: usize,
    pending_events: Vec<MoverEvent>,
}

impl ActorMover {
    /// Create a mover in the given mode with default settings
    pub fn new(mode: MoveMode) -> Self {
        Self {
            mode,
            move_speed: 5.0,
            movement_curve: AnimationCurve::default(),
            rotate_towards_target: true,
            rotation_speed: 10.0,
            loop_movement: false,
            loop_delay: 0.5,
            auto_start: true,
            triggers: Vec::new(),
            phase: Phase::Idle,
            moving_to_b: true,
            current_target: Vec3::ZERO,
            current_path_index: 0,
            pending_events: Vec::new(),
        }
    }

    /// Mover walking between two points
    pub fn between(point_a: Vec3, point_b: Vec3) -> Self {
        Self::new(MoveMode::PointToPoint {
            point_a: Some(point_a),
            point_b: Some(point_b),
        })
    }

    /// Mover walking along a path
    pub fn along(points: Vec<Vec3>) -> Self {
        Self::new(MoveMode::Path { points })
    }

    /// Add a waypoint trigger
    pub fn with_trigger(mut self, waypoint: usize, shot_index: usize) -> Self {
        self.triggers.push(WaypointTrigger {
            waypoint,
            shot_index,
        });
        self
    }

    /// Auto start: place the actor at A and walk to B, or start the path
    pub fn begin(&mut self, actor: &mut dyn TransformSink) -> bool {
        if !self.auto_start {
            return false;
        }
        match &self.mode {
            MoveMode::PointToPoint {
                point_a: Some(a),
                point_b: Some(_),
            } => {
                actor.set_position(*a);
                self.move_to_point_b()
            }
            MoveMode::PointToPoint { .. } => {
                tracing::warn!("Cannot auto start: point A or B is not assigned");
                false
            }
            MoveMode::Path { .. } => self.start_path(),
        }
    }

    // --- Commands ---

    /// Walk to point A
    pub fn move_to_point_a(&mut self) -> bool {
        let Some(target) = self.point(LegKind::PointA) else {
            tracing::warn!("Point A is not assigned");
            return false;
        };
        let started = self.start_leg(LegKind::PointA, target, self.move_speed);
        if started {
            self.moving_to_b = false;
        }
        started
    }

    /// Walk to point B
    pub fn move_to_point_b(&mut self) -> bool {
        let Some(target) = self.point(LegKind::PointB) else {
            tracing::warn!("Point B is not assigned");
            return false;
        };
        let started = self.start_leg(LegKind::PointB, target, self.move_speed);
        if started {
            self.moving_to_b = true;
        }
        started
    }

    /// Walk to an arbitrary point, at `speed` if given and positive
    pub fn move_to_custom_point(&mut self, target: Vec3, speed: Option<f32>) -> bool {
        let speed = speed.filter(|s| *s > 0.0).unwrap_or(self.move_speed);
        self.start_leg(LegKind::Custom, target, speed)
    }

    /// Walk the path from its first point
    pub fn start_path(&mut self) -> bool {
        self.move_to_path_point(0)
    }

    /// Walk to path point `index`, continuing along the path from there
    pub fn move_to_path_point(&mut self, index: usize) -> bool {
        let Some(target) = self.point(LegKind::PathPoint(index)) else {
            tracing::warn!("Path point {} does not exist", index);
            return false;
        };
        self.current_path_index = index;
        self.start_leg(LegKind::PathPoint(index), target, self.move_speed)
    }

    /// Stop moving. The actor stays where it is.
    pub fn stop_movement(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.phase = Phase::Idle;
        self.pending_events.push(MoverEvent::Stopped);
        tracing::debug!("Actor movement stopped");
    }

    /// Stop if moving, otherwise head for the opposite point or resume the path
    pub fn toggle_movement(&mut self, actor: &dyn TransformSink) -> bool {
        if self.is_moving() {
            self.stop_movement();
            return true;
        }
        match &self.mode {
            MoveMode::PointToPoint {
                point_a: Some(a),
                point_b: Some(b),
            } => {
                let position = actor.position();
                if self.moving_to_b || position.distance(*a) < position.distance(*b) {
                    self.move_to_point_b()
                } else {
                    self.move_to_point_a()
                }
            }
            MoveMode::PointToPoint { .. } => {
                tracing::warn!("Cannot toggle movement: point A or B is not assigned");
                false
            }
            MoveMode::Path { .. } => self.move_to_path_point(self.current_path_index),
        }
    }

    /// Switch to point mode with new points. Stops any movement.
    pub fn set_points(&mut self, point_a: Option<Vec3>, point_b: Option<Vec3>) {
        self.cancel();
        self.mode = MoveMode::PointToPoint { point_a, point_b };
    }

    /// Switch to path mode with new points. Stops any movement.
    pub fn set_path(&mut self, points: Vec<Vec3>) {
        self.cancel();
        self.current_path_index = 0;
        self.mode = MoveMode::Path { points };
    }

    fn point(&self, kind: LegKind) -> Option<Vec3> {
        match (&self.mode, kind) {
            (MoveMode::PointToPoint { point_a, .. }, LegKind::PointA) => *point_a,
            (MoveMode::PointToPoint { point_b, .. }, LegKind::PointB) => *point_b,
            (MoveMode::Path { points }, LegKind::PathPoint(index)) => points.get(index).copied(),
            _ => None,
        }
    }

    fn start_leg(&mut self, kind: LegKind, target: Vec3, speed: f32) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            tracing::warn!("Cannot move at speed {}", speed);
            return false;
        }
        self.cancel();
        self.current_target = target;
        self.phase = Phase::Moving(Leg {
            kind,
            target,
            speed,
            origin: None,
            elapsed: 0.0,
            duration: 0.0,
            position: target,
        });
        self.pending_events.push(MoverEvent::Started { target });
        true
    }

    fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    // --- Tick ---

    /// Advance movement by `delta_time` seconds
    pub fn tick(
        &mut self,
        delta_time: f32,
        actor: &mut dyn TransformSink,
        trigger: Option<&mut dyn ShotTrigger>,
    ) {
        let dt = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };

        if let Phase::Waiting { remaining, next } = self.phase {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.phase = Phase::Waiting { remaining, next };
                return;
            }
            self.resume(next, -remaining);
        }

        let Phase::Moving(mut leg) = self.phase else {
            return;
        };

        let origin = match leg.origin {
            Some(origin) => {
                leg.elapsed += dt;
                origin
            }
            None => {
                let origin = actor.position();
                let distance = origin.distance(leg.target);
                leg.origin = Some(origin);
                leg.duration = distance / leg.speed;
                tracing::debug!(
                    "Moving to {:?} - Distance: {:.2}, Duration: {:.2}s",
                    leg.kind,
                    distance,
                    leg.duration
                );
                origin
            }
        };

        if leg.elapsed >= leg.duration {
            self.arrive(leg, actor, trigger);
            return;
        }

        let t = self.movement_curve.evaluate(leg.elapsed / leg.duration);
        leg.position = origin.lerp(leg.target, t);
        actor.set_position(leg.position);

        if self.rotate_towards_target {
            if let Some(facing) = look_rotation(leg.target - origin) {
                let step = convergence(self.rotation_speed, dt);
                actor.set_rotation(actor.rotation().slerp(facing, step));
            }
        }

        self.phase = Phase::Moving(leg);
    }

    fn arrive(
        &mut self,
        leg: Leg,
        actor: &mut dyn TransformSink,
        mut trigger: Option<&mut dyn ShotTrigger>,
    ) {
        actor.set_position(leg.target);
        let overshoot = (leg.elapsed - leg.duration).max(0.0);
        let waypoint = leg.kind.waypoint();
        tracing::debug!("Actor reached {:?}", leg.kind);
        self.pending_events.push(MoverEvent::Arrived {
            target: leg.target,
            waypoint,
        });

        if let Some(waypoint) = waypoint {
            let shots: Vec<usize> = self
                .triggers
                .iter()
                .filter(|t| t.waypoint == waypoint)
                .map(|t| t.shot_index)
                .collect();
            for shot_index in shots {
                let Some(trigger) = trigger.as_deref_mut() else {
                    break;
                };
                let accepted = trigger.trigger_shot(shot_index);
                tracing::debug!(
                    "Waypoint {} triggered shot {} (accepted: {})",
                    waypoint,
                    shot_index,
                    accepted
                );
                self.pending_events.push(MoverEvent::ShotTriggered {
                    shot_index,
                    accepted,
                });
            }
        }

        self.phase = match leg.kind {
            LegKind::PointA | LegKind::PointB if self.loop_movement => {
                let next = if self.moving_to_b {
                    LegKind::PointA
                } else {
                    LegKind::PointB
                };
                self.moving_to_b = !self.moving_to_b;
                Phase::Waiting {
                    remaining: self.loop_delay - overshoot,
                    next,
                }
            }
            LegKind::PathPoint(index) => {
                let next = index + 1;
                match self.point(LegKind::PathPoint(next)) {
                    Some(_) => {
                        if self.move_to_path_point(next) {
                            self.lead_leg(overshoot);
                        }
                        return;
                    }
                    None if self.loop_movement => Phase::Waiting {
                        remaining: self.loop_delay - overshoot,
                        next: LegKind::PathPoint(0),
                    },
                    None => {
                        tracing::info!("Actor path completed");
                        self.pending_events.push(MoverEvent::PathCompleted);
                        Phase::Idle
                    }
                }
            }
            _ => Phase::Idle,
        };
    }

    /// Start the leg after a loop delay that ended `lead` seconds ago
    fn resume(&mut self, next: LegKind, lead: f32) {
        let resumed = match next {
            LegKind::PointA => self.move_to_point_a(),
            LegKind::PointB => self.move_to_point_b(),
            LegKind::PathPoint(index) => self.move_to_path_point(index),
            LegKind::Custom => false,
        };
        if resumed {
            self.lead_leg(lead);
        } else {
            self.phase = Phase::Idle;
        }
    }

    /// Credit a freshly started leg with time already spent
    fn lead_leg(&mut self, lead: f32) {
        if let Phase::Moving(leg) = &mut self.phase {
            leg.elapsed = lead;
        }
    }

    // --- State ---

    /// Coarse state
    pub fn state(&self) -> MoverState {
        match self.phase {
            Phase::Idle => MoverState::Idle,
            Phase::Moving(_) => MoverState::Moving,
            Phase::Waiting { .. } => MoverState::Waiting,
        }
    }

    /// Whether a leg is in progress
    pub fn is_moving(&self) -> bool {
        matches!(self.phase, Phase::Moving(_))
    }

    /// Direction flag: heading A to B
    pub fn is_moving_to_b(&self) -> bool {
        self.moving_to_b
    }

    /// Target of the latest leg
    pub fn current_target(&self) -> Vec3 {
        self.current_target
    }

    /// Path point index of the latest path leg
    pub fn current_path_index(&self) -> usize {
        self.current_path_index
    }

    /// Fraction of the current leg's distance covered, 0 when not moving
    pub fn progress_to_target(&self) -> f32 {
        let Phase::Moving(Leg {
            origin: Some(origin),
            target,
            position,
            ..
        }) = self.phase
        else {
            return 0.0;
        };
        let total = origin.distance(target);
        if total <= f32::EPSILON {
            return 1.0;
        }
        (origin.distance(position) / total).clamp(0.0, 1.0)
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<MoverEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for ActorMover {
    fn default() -> Self {
        Self::new(MoveMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Transform, FORWARD};

    const A: Vec3 = Vec3::ZERO;
    const B: Vec3 = Vec3::new(2.0, 0.0, 0.0);

    fn run(mover: &mut ActorMover, actor: &mut Transform, ticks: usize, dt: f32) {
        for _ in 0..ticks {
            mover.tick(dt, actor, None);
        }
    }

    #[derive(Default)]
    struct Recorder {
        requested: Vec<usize>,
    }

    impl ShotTrigger for Recorder {
        fn trigger_shot(&mut self, index: usize) -> bool {
            self.requested.push(index);
            true
        }
    }

    #[test]
    fn test_begin_places_actor_at_a() {
        let mut mover = ActorMover::between(Vec3::ONE, B);
        let mut actor = Transform::default();
        assert!(mover.begin(&mut actor));
        assert_eq!(actor.position, Vec3::ONE);
        assert!(mover.is_moving());
        assert!(mover.is_moving_to_b());
        assert_eq!(mover.current_target(), B);
    }

    #[test]
    fn test_begin_without_auto_start() {
        let mut mover = ActorMover::between(A, B);
        mover.auto_start = false;
        let mut actor = Transform::default();
        assert!(!mover.begin(&mut actor));
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_missing_point_is_ignored() {
        let mut mover = ActorMover::new(MoveMode::PointToPoint {
            point_a: Some(A),
            point_b: None,
        });
        assert!(!mover.move_to_point_b());
        assert!(!mover.is_moving());
        assert!(mover.move_to_point_a());
    }

    #[test]
    fn test_duration_from_distance_and_speed() {
        let mut mover = ActorMover::between(A, B);
        mover.move_speed = 2.0;
        mover.movement_curve = AnimationCurve::linear(0.0, 0.0, 1.0, 1.0);
        let mut actor = Transform::default();
        mover.move_to_point_b();

        // First tick captures the origin without advancing
        run(&mut mover, &mut actor, 1, 0.25);
        assert_eq!(actor.position, A);
        run(&mut mover, &mut actor, 2, 0.25);
        assert!((actor.position.x - 1.0).abs() < 1e-5);
        assert!((mover.progress_to_target() - 0.5).abs() < 1e-5);

        run(&mut mover, &mut actor, 2, 0.25);
        assert_eq!(actor.position, B);
        assert!(!mover.is_moving());
        assert_eq!(mover.progress_to_target(), 0.0);
    }

    #[test]
    fn test_arrival_snaps_exactly() {
        let mut mover = ActorMover::between(A, Vec3::new(1.0, 2.0, 3.0));
        mover.move_speed = 0.7;
        let mut actor = Transform::default();
        mover.move_to_point_b();
        run(&mut mover, &mut actor, 400, 1.0 / 60.0);
        assert_eq!(actor.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            mover.take_events().last(),
            Some(&MoverEvent::Arrived {
                target: Vec3::new(1.0, 2.0, 3.0),
                waypoint: Some(1),
            })
        );
    }

    #[test]
    fn test_loop_round_trip_returns_to_a() {
        let mut mover = ActorMover::between(A, B);
        mover.move_speed = 2.0;
        mover.loop_movement = true;
        let mut actor = Transform::default();
        mover.begin(&mut actor);
        let initial_direction = mover.is_moving_to_b();

        // Leg to B: 1 + 4 ticks, delay: 2 ticks (the second starts the return leg), leg to A: 4
        run(&mut mover, &mut actor, 5, 0.25);
        assert_eq!(actor.position, B);
        assert_eq!(mover.state(), MoverState::Waiting);
        run(&mut mover, &mut actor, 6, 0.25);

        assert_eq!(actor.position, A);
        assert_eq!(mover.is_moving_to_b(), initial_direction);
        let arrivals = mover
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, MoverEvent::Arrived { .. }))
            .count();
        assert_eq!(arrivals, 2);
    }

    #[test]
    fn test_loop_delay_leftover_starts_return_leg() {
        let mut mover = ActorMover::between(A, B);
        mover.move_speed = 2.0;
        mover.movement_curve = AnimationCurve::linear(0.0, 0.0, 1.0, 1.0);
        mover.loop_movement = true;
        mover.loop_delay = 0.375;
        let mut actor = Transform::default();
        mover.begin(&mut actor);

        run(&mut mover, &mut actor, 5, 0.25);
        assert_eq!(actor.position, B);

        // The delay ends 0.125 s into the second waiting tick; that time counts toward the leg
        run(&mut mover, &mut actor, 2, 0.25);
        assert!(mover.is_moving());
        assert!((actor.position.x - 1.75).abs() < 1e-5);
        assert!((mover.progress_to_target() - 0.125).abs() < 1e-5);

        run(&mut mover, &mut actor, 1, 0.25);
        assert!((actor.position.x - 1.25).abs() < 1e-5);
    }

    #[test]
    fn test_set_path_switches_mode() {
        let mut mover = ActorMover::between(A, B);
        mover.move_to_point_b();
        mover.set_path(vec![Vec3::ONE, Vec3::new(3.0, 1.0, 1.0)]);
        assert!(!mover.is_moving());
        assert_eq!(mover.current_path_index(), 0);
        assert!(!mover.move_to_point_b());

        assert!(mover.start_path());
        assert_eq!(mover.current_target(), Vec3::ONE);
        let mut actor = Transform::default();
        run(&mut mover, &mut actor, 200, 0.05);
        assert_eq!(actor.position, Vec3::new(3.0, 1.0, 1.0));
        assert_eq!(mover.take_events().last(), Some(&MoverEvent::PathCompleted));
    }

    #[test]
    fn test_no_loop_stops_at_target() {
        let mut mover = ActorMover::between(A, B);
        let mut actor = Transform::default();
        mover.begin(&mut actor);
        run(&mut mover, &mut actor, 100, 0.1);
        assert_eq!(actor.position, B);
        assert_eq!(mover.state(), MoverState::Idle);
    }

    #[test]
    fn test_zero_distance_arrives_immediately() {
        let mut mover = ActorMover::default();
        let mut actor = Transform::default();
        assert!(mover.move_to_custom_point(Vec3::ZERO, None));
        run(&mut mover, &mut actor, 1, 0.1);
        assert!(!mover.is_moving());
        assert!(actor.position.is_finite());
    }

    #[test]
    fn test_custom_point_speed() {
        let mut mover = ActorMover::default();
        let mut actor = Transform::default();
        assert!(mover.move_to_custom_point(B, Some(20.0)));
        // 2 units at 20/s: origin tick + one 0.1 s tick
        run(&mut mover, &mut actor, 2, 0.1);
        assert_eq!(actor.position, B);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut mover = ActorMover::between(A, B);
        mover.move_speed = 0.0;
        assert!(!mover.move_to_point_b());
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_stop_freezes_actor() {
        let mut mover = ActorMover::between(A, B);
        let mut actor = Transform::default();
        mover.begin(&mut actor);
        run(&mut mover, &mut actor, 3, 0.05);
        mover.stop_movement();
        let frozen = actor;
        run(&mut mover, &mut actor, 10, 0.05);
        assert_eq!(actor, frozen);
        assert_eq!(mover.take_events().last(), Some(&MoverEvent::Stopped));
    }

    #[test]
    fn test_toggle_movement() {
        let mut mover = ActorMover::between(A, B);
        let mut actor = Transform::default();
        assert!(mover.toggle_movement(&actor));
        assert_eq!(mover.current_target(), B);
        assert!(mover.toggle_movement(&actor));
        assert!(!mover.is_moving());

        mover.move_to_point_a();
        mover.stop_movement();
        actor.position = B;
        mover.toggle_movement(&actor);
        assert_eq!(mover.current_target(), A);
    }

    #[test]
    fn test_rotates_towards_travel_direction() {
        let mut mover = ActorMover::between(A, Vec3::new(10.0, 0.0, 0.0));
        let mut actor = Transform::default();
        mover.begin(&mut actor);
        run(&mut mover, &mut actor, 30, 1.0 / 30.0);
        let facing = actor.rotation * FORWARD;
        assert!(facing.dot(Vec3::X) > 0.99);
    }

    #[test]
    fn test_path_walks_every_point() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)];
        let mut mover = ActorMover::along(points.clone());
        mover.move_speed = 4.0;
        let mut actor = Transform::default();
        assert!(mover.begin(&mut actor));
        run(&mut mover, &mut actor, 50, 0.05);

        assert_eq!(actor.position, points[2]);
        assert_eq!(mover.current_path_index(), 2);
        let events = mover.take_events();
        let reached: Vec<Option<usize>> = events
            .iter()
            .filter_map(|e| match e {
                MoverEvent::Arrived { waypoint, .. } => Some(*waypoint),
                _ => None,
            })
            .collect();
        assert_eq!(reached, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(events.last(), Some(&MoverEvent::PathCompleted));
    }

    #[test]
    fn test_path_loops_to_first_point() {
        let mut mover = ActorMover::along(vec![Vec3::ZERO, Vec3::X]);
        mover.loop_movement = true;
        mover.loop_delay = 0.0;
        let mut actor = Transform::default();
        mover.start_path();
        run(&mut mover, &mut actor, 100, 0.05);
        assert!(mover.state() != MoverState::Idle);
        assert!(mover
            .take_events()
            .iter()
            .filter(|e| matches!(e, MoverEvent::Arrived { waypoint: Some(0), .. }))
            .count()
            > 1);
    }

    #[test]
    fn test_waypoint_trigger_requests_shot() {
        let mut mover = ActorMover::between(A, B).with_trigger(1, 3).with_trigger(0, 7);
        mover.move_speed = 20.0;
        let mut actor = Transform::default();
        let mut recorder = Recorder::default();
        mover.begin(&mut actor);
        for _ in 0..5 {
            mover.tick(0.1, &mut actor, Some(&mut recorder));
        }
        assert_eq!(recorder.requested, vec![3]);
        assert!(mover.take_events().contains(&MoverEvent::ShotTriggered {
            shot_index: 3,
            accepted: true,
        }));
    }

    #[test]
    fn test_set_points_switches_mode() {
        let mut mover = ActorMover::along(vec![Vec3::ONE]);
        mover.start_path();
        mover.set_points(Some(A), Some(B));
        assert!(!mover.is_moving());
        assert!(!mover.move_to_path_point(0));
        assert!(mover.move_to_point_b());
    }
}
