// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera pans through a list of authored poses.
//!
//! [`CameraPanner`] blends the camera from one pose to the next in a fixed time per
//! segment. One curve eases position and rotation together. Like the other players it is
//! advanced by [`CameraPanner::tick`] and writes through a [`TransformSink`].

use crate::curve::{AnimationCurve, Curve};
use crate::pose::{Pose, TransformSink};

/// Notification emitted by the panner, collected until [`CameraPanner::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PannerEvent {
    /// Panning through the points started
    Started,
    /// The camera settled on a point
    ReachedPoint {
        /// Point index
        index: usize,
    },
    /// The last segment finished
    Finished,
    /// Panning was stopped explicitly
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Every point in order, wrapping when looping
    Through,
    /// One point, then stop
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    route: Route,
    /// Captured from the camera on the first tick when `None`
    from: Option<Pose>,
    to: usize,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Panning(Segment),
}

/// Pans a camera through poses
#[derive(Debug, Clone)]
pub struct CameraPanner {
    /// Poses visited in order
    pub points: Vec<Pose>,
    /// Seconds per segment
    pub pan_duration: f32,
    /// Easing over each segment
    pub pan_curve: AnimationCurve,
    /// Start panning on [`CameraPanner::begin`]
    pub auto_start: bool,
    /// Pan from the last point back to the first and keep going
    pub loop_panning: bool,
    phase: Phase,
    current_point_index: usize,
    pending_events: Vec<PannerEvent>,
}

impl CameraPanner {
    /// Create a panner over `points` with default settings
    pub fn new(points: Vec<Pose>) -> Self {
        Self {
            points,
            pan_duration: 2.0,
            pan_curve: AnimationCurve::default(),
            auto_start: false,
            loop_panning: false,
            phase: Phase::Idle,
            current_point_index: 0,
            pending_events: Vec::new(),
        }
    }

    /// Auto start: pan through the points if enabled
    pub fn begin(&mut self) -> bool {
        self.auto_start && !self.points.is_empty() && self.start_panning()
    }

    /// Pan through every point from the first. Needs two points and an idle panner.
    pub fn start_panning(&mut self) -> bool {
        if self.is_panning() {
            tracing::debug!("Camera is already panning");
            return false;
        }
        let Some(first) = self.points.first().copied() else {
            tracing::warn!("Cannot pan: no pan points");
            return false;
        };
        if self.points.len() < 2 {
            tracing::warn!("Cannot pan: a single pan point");
            return false;
        }

        self.current_point_index = 0;
        self.phase = Phase::Panning(Segment {
            route: Route::Through,
            from: Some(first),
            to: 1,
            elapsed: 0.0,
        });
        self.pending_events.push(PannerEvent::Started);
        tracing::info!("Panning through {} points", self.points.len());
        true
    }

    /// Blend from the camera's current pose to point `index`, then stop
    pub fn pan_to_point(&mut self, index: usize) -> bool {
        if self.is_panning() {
            tracing::debug!("Cannot pan to point {} while panning", index);
            return false;
        }
        if index >= self.points.len() {
            tracing::warn!("Pan point {} out of range ({} points)", index, self.points.len());
            return false;
        }

        self.current_point_index = index;
        self.phase = Phase::Panning(Segment {
            route: Route::Single,
            from: None,
            to: index,
            elapsed: 0.0,
        });
        true
    }

    /// Stop panning. The camera keeps its last committed pose.
    pub fn stop_panning(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.phase = Phase::Idle;
        self.pending_events.push(PannerEvent::Stopped);
        tracing::debug!("Camera panning stopped");
    }

    /// Advance panning by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32, camera: &mut dyn TransformSink) {
        let dt = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        let Phase::Panning(mut segment) = self.phase else {
            return;
        };
        let Some(to) = self.points.get(segment.to).copied() else {
            tracing::warn!("Pan point {} no longer exists", segment.to);
            self.phase = Phase::Idle;
            return;
        };

        let from = *segment.from.get_or_insert_with(|| camera.pose());
        segment.elapsed += dt;
        if segment.elapsed < self.pan_duration {
            let t = self.pan_curve.evaluate(segment.elapsed / self.pan_duration);
            camera.set_pose(Pose::new(
                from.position.lerp(to.position, t),
                from.rotation.slerp(to.rotation, t),
            ));
            self.phase = Phase::Panning(segment);
            return;
        }

        camera.set_pose(to);
        let overshoot = if self.pan_duration > 0.0 {
            segment.elapsed - self.pan_duration
        } else {
            0.0
        };
        self.arrive(segment, to, overshoot);
    }

    fn arrive(&mut self, segment: Segment, reached: Pose, overshoot: f32) {
        let index = segment.to;
        self.current_point_index = index;
        self.pending_events.push(PannerEvent::ReachedPoint { index });
        tracing::debug!("Camera reached pan point {}", index);

        let next = match segment.route {
            Route::Single => None,
            Route::Through if index + 1 < self.points.len() => Some(index + 1),
            Route::Through if self.loop_panning => Some(0),
            Route::Through => None,
        };

        self.phase = match next {
            Some(next) => Phase::Panning(Segment {
                route: Route::Through,
                from: Some(reached),
                to: next,
                elapsed: overshoot,
            }),
            None => {
                tracing::debug!("Camera panning finished");
                self.pending_events.push(PannerEvent::Finished);
                Phase::Idle
            }
        };
    }

    // --- State ---

    /// Whether a segment is in progress
    pub fn is_panning(&self) -> bool {
        matches!(self.phase, Phase::Panning(_))
    }

    /// Index of the point last reached, or the target of [`CameraPanner::pan_to_point`]
    pub fn current_point_index(&self) -> usize {
        self.current_point_index
    }

    /// Point the camera is heading for
    pub fn target_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Panning(segment) => Some(segment.to),
            Phase::Idle => None,
        }
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<PannerEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for CameraPanner {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
