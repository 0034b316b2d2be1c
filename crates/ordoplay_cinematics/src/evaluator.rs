// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-tick shot evaluation.
//!
//! Poses are computed from `elapsed` directly, so evaluating the same tick twice gives the
//! same result. The exceptions are smoothed look-at rotations, once-only look-at and
//! `KeepCurrentRotation`, which read the previously committed rotation from the context.

use crate::binding::Anchors;
use crate::curve::Curve;
use crate::error::ShotError;
use crate::pose::{apply_offset, convergence, euler_degrees, look_rotation, Pose};
use crate::shot::{resolve, RotationKind, ShotDescriptor, ShotKind};
use glam::{Quat, Vec3};

/// Inputs for evaluating one tick of a shot
#[derive(Debug, Clone, Copy)]
pub struct ShotContext<'a> {
    /// Seconds since the shot started, in `[0, duration]`
    pub elapsed: f32,
    /// Seconds since the previous tick (0 on the first tick)
    pub delta_time: f32,
    /// Last committed camera pose
    pub previous: Pose,
    /// Live target positions
    pub anchors: &'a Anchors,
}

impl<'a> ShotContext<'a> {
    /// Create a context
    pub fn new(elapsed: f32, delta_time: f32, previous: Pose, anchors: &'a Anchors) -> Self {
        Self {
            elapsed,
            delta_time,
            previous,
            anchors,
        }
    }

    fn is_first_tick(&self) -> bool {
        self.elapsed <= 0.0
    }
}

/// Stateless shot evaluation
pub struct ShotEvaluator;

impl ShotEvaluator {
    /// Compute the camera pose for `shot` at `ctx.elapsed`.
    ///
    /// Fails only when the shot is structurally unplayable; callers skip the shot then.
    pub fn evaluate(shot: &ShotDescriptor, ctx: &ShotContext<'_>) -> Result<Pose, ShotError> {
        shot.validate(ctx.anchors)?;
        let Some(start) = shot.start else {
            return Err(ShotError::MissingStartPose(shot.kind));
        };
        let t = normalized_time(ctx.elapsed, shot.duration);

        let pose = match shot.kind {
            ShotKind::Static => Self::evaluate_static(shot, ctx, start),
            ShotKind::Movement => {
                let position = Self::travel(shot, start, t);
                Pose::new(position, Self::resolve_rotation(shot, ctx, start, position, t))
            }
            ShotKind::Pan => {
                let rotation = Self::pan_rotation(shot, ctx, start.position, t)
                    .map_or(ctx.previous.rotation, |r| apply_offset(r, shot.pan_rotation_offset));
                Pose::new(start.position, rotation)
            }
            ShotKind::MovementWithPan => {
                let position = Self::travel(shot, start, t);
                let rotation =
                    Self::pan_rotation(shot, ctx, position, t).unwrap_or(ctx.previous.rotation);
                Pose::new(position, rotation)
            }
            ShotKind::OrbitAround => Self::evaluate_orbit(shot, ctx, start, t),
            ShotKind::DollyPath => {
                let position = Self::dolly_position(shot, t);
                Pose::new(position, Self::resolve_rotation(shot, ctx, start, position, t))
            }
            ShotKind::FreeRotation => {
                let rotation = match shot.end {
                    Some(end) => {
                        blend_rotation(start.rotation, end.rotation, &shot.rotation_curve, t)
                    }
                    None => start.rotation,
                };
                Pose::new(start.position, rotation)
            }
            ShotKind::LookAtOnly => {
                let rotation =
                    Self::look_at(shot, ctx, start.position, shot.look_at_rotation_offset);
                Pose::new(start.position, rotation)
            }
            ShotKind::CustomSequence => match shot.end {
                None => Self::evaluate_static(shot, ctx, start),
                Some(_) => {
                    let position = Self::travel(shot, start, t);
                    let rotation = if shot.use_look_at {
                        Self::aim_at_look_target(shot, ctx, position, Vec3::ZERO)
                    } else {
                        Self::resolve_rotation(shot, ctx, start, position, t)
                    };
                    Pose::new(position, rotation)
                }
            },
        };

        Ok(pose)
    }

    /// Pose at the end of the active duration
    pub fn final_pose(
        shot: &ShotDescriptor,
        previous: Pose,
        anchors: &Anchors,
    ) -> Result<Pose, ShotError> {
        Self::evaluate(shot, &ShotContext::new(shot.duration, 0.0, previous, anchors))
    }

    fn evaluate_static(shot: &ShotDescriptor, ctx: &ShotContext<'_>, start: Pose) -> Pose {
        let rotation = if shot.use_static_rotation_override {
            euler_degrees(shot.static_rotation_override)
        } else if shot.use_look_at {
            Self::look_at(shot, ctx, start.position, Vec3::ZERO)
        } else {
            Self::resolve_rotation(shot, ctx, start, start.position, 0.0)
        };
        Pose::new(start.position, rotation)
    }

    /// Straight start-to-end travel, snapped to the end on the final tick
    fn travel(shot: &ShotDescriptor, start: Pose, t: f32) -> Vec3 {
        match shot.end {
            Some(end) if t >= 1.0 => end.position,
            Some(end) => lerp(start.position, end.position, shot.movement_curve.evaluate(t)),
            None => start.position,
        }
    }

    fn pan_rotation(
        shot: &ShotDescriptor,
        ctx: &ShotContext<'_>,
        from: Vec3,
        t: f32,
    ) -> Option<Quat> {
        let first = resolve(&shot.pan_start_target, ctx.anchors)?;
        let last = resolve(&shot.pan_end_target, ctx.anchors)?;
        let target = lerp(first, last, shot.pan_curve.evaluate(t));
        look_rotation(target - from)
    }

    fn evaluate_orbit(shot: &ShotDescriptor, ctx: &ShotContext<'_>, start: Pose, t: f32) -> Pose {
        let Some(center) = resolve(&shot.orbit_center, ctx.anchors) else {
            return start;
        };
        let axis = shot.orbit_axis.try_normalize().unwrap_or(Vec3::Y);
        let (u, _) = axis.any_orthonormal_pair();
        let w = axis.cross(u);

        let offset = start.position - center;
        let height = offset.dot(axis);
        let planar = offset - axis * height;
        let start_angle = planar.dot(w).atan2(planar.dot(u));
        let angle = start_angle + shot.orbit_angle.to_radians() * shot.movement_curve.evaluate(t);

        let mut position = center + (u * angle.cos() + w * angle.sin()) * shot.orbit_radius;
        if shot.maintain_orbit_height {
            position += axis * height;
        }

        let target = if shot.use_look_at {
            resolve(&shot.look_at_target, ctx.anchors).unwrap_or(center)
        } else {
            center
        };
        let offset = shot.orbit_look_offset;
        let rotation = if shot.continuous_look_at {
            Self::aim(shot, ctx, position, target, offset, shot.smooth_look_at)
        } else if ctx.is_first_tick() {
            Self::aim(shot, ctx, position, target, offset, false)
        } else {
            ctx.previous.rotation
        };
        Pose::new(position, rotation)
    }

    /// Piecewise-linear position along the dolly track with equal-weight segments
    fn dolly_position(shot: &ShotDescriptor, t: f32) -> Vec3 {
        let path = &shot.dolly_path;
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Vec3::ZERO;
        };
        if path.len() < 2 {
            return first.position;
        }
        if t >= 1.0 {
            return last.position;
        }

        let segments = path.len() - 1;
        let progress = shot.movement_curve.evaluate(t) * segments as f32;
        let index = (progress.floor().max(0.0) as usize).min(segments - 1);
        let segment_t = progress - index as f32;
        lerp(path[index].position, path[index + 1].position, segment_t)
    }

    /// Rotation rule shared by kinds without their own
    fn resolve_rotation(
        shot: &ShotDescriptor,
        ctx: &ShotContext<'_>,
        start: Pose,
        position: Vec3,
        t: f32,
    ) -> Quat {
        match shot.rotation_kind {
            RotationKind::UseStartEndOrientation => Self::start_end_rotation(shot, start, t),
            RotationKind::LookAtTarget => Self::look_at(shot, ctx, position, Vec3::ZERO),
            RotationKind::KeepCurrentRotation => ctx.previous.rotation,
            RotationKind::CustomEulerAngles => Self::custom_euler_rotation(shot, start, t),
            RotationKind::FreeRotation => {
                let authored = shot.custom_rotation_start != Vec3::ZERO
                    || shot.custom_rotation_end != Vec3::ZERO;
                if authored {
                    Self::custom_euler_rotation(shot, start, t)
                } else {
                    Self::start_end_rotation(shot, start, t)
                }
            }
            RotationKind::FollowMovementDirection => shot
                .end
                .and_then(|end| look_rotation(end.position - start.position))
                .unwrap_or(ctx.previous.rotation),
        }
    }

    fn start_end_rotation(shot: &ShotDescriptor, start: Pose, t: f32) -> Quat {
        match shot.end {
            Some(end) => blend_rotation(start.rotation, end.rotation, &shot.rotation_curve, t),
            None => start.rotation,
        }
    }

    fn custom_euler_rotation(shot: &ShotDescriptor, start: Pose, t: f32) -> Quat {
        let euler = shot
            .custom_rotation_start
            .lerp(shot.custom_rotation_end, shot.rotation_curve.evaluate(t));
        let rotation = euler_degrees(euler);
        if shot.use_local_rotation {
            start.rotation * rotation
        } else {
            rotation
        }
    }

    /// Look-at honouring `continuous_look_at`: once-only aims on the first tick and holds after
    fn look_at(shot: &ShotDescriptor, ctx: &ShotContext<'_>, from: Vec3, offset: Vec3) -> Quat {
        if shot.continuous_look_at {
            Self::aim_at_look_target(shot, ctx, from, offset)
        } else if ctx.is_first_tick() {
            match resolve(&shot.look_at_target, ctx.anchors) {
                Some(target) => Self::aim(shot, ctx, from, target, offset, false),
                None => ctx.previous.rotation,
            }
        } else {
            ctx.previous.rotation
        }
    }

    fn aim_at_look_target(
        shot: &ShotDescriptor,
        ctx: &ShotContext<'_>,
        from: Vec3,
        offset: Vec3,
    ) -> Quat {
        match resolve(&shot.look_at_target, ctx.anchors) {
            Some(target) => Self::aim(shot, ctx, from, target, offset, shot.smooth_look_at),
            None => ctx.previous.rotation,
        }
    }

    /// Aim from `from` at `target`. A degenerate direction keeps the previous rotation.
    fn aim(
        shot: &ShotDescriptor,
        ctx: &ShotContext<'_>,
        from: Vec3,
        target: Vec3,
        offset: Vec3,
        smooth: bool,
    ) -> Quat {
        let Some(look) = look_rotation(target - from) else {
            return ctx.previous.rotation;
        };
        let look = apply_offset(look, offset);
        if smooth {
            ctx.previous
                .rotation
                .slerp(look, convergence(shot.look_at_speed, ctx.delta_time))
        } else {
            look
        }
    }
}

/// `elapsed / duration` clamped to `[0, 1]`; a degenerate duration counts as finished
pub fn normalized_time(elapsed: f32, duration: f32) -> f32 {
    if !duration.is_finite() || duration <= 0.0 {
        return 1.0;
    }
    let t = elapsed / duration;
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// Lerp that returns the endpoints exactly at `s = 0` and `s = 1`
fn lerp(a: Vec3, b: Vec3, s: f32) -> Vec3 {
    if s == 0.0 {
        a
    } else if s == 1.0 {
        b
    } else {
        a + (b - a) * s
    }
}

/// Curve-eased slerp, snapped to `to` on the final tick
fn blend_rotation(from: Quat, to: Quat, curve: &impl Curve, t: f32) -> Quat {
    if t >= 1.0 {
        return to;
    }
    let s = curve.evaluate(t);
    if s == 0.0 {
        from
    } else if s == 1.0 {
        to
    } else {
        from.slerp(to, s)
    }
}
