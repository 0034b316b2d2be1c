// SPDX-License-Identifier: MIT OR Apache-2.0
//! Poses, transform sinks and orientation helpers.
//!
//! Conventions: right-handed, `+Y` up, cameras and actors look down `-Z`.
//! Euler angles are authored in degrees as `(pitch, yaw, roll)` and applied yaw first.

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local forward axis of cameras and actors
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// World up axis used for look rotations
pub const UP: Vec3 = Vec3::Y;

const MIN_DIRECTION_LENGTH_SQUARED: f32 = 1e-12;

/// Position and orientation snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position
    pub position: Vec3,
    /// World orientation
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl Pose {
    /// Pose at the origin with identity rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with identity rotation
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Pose at `position` facing `target`. Falls back to identity rotation if they coincide.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let rotation = look_rotation(target - position).unwrap_or(Quat::IDENTITY);
        Self::new(position, rotation)
    }

    /// Forward direction of this pose
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Host-owned transform the core writes poses into
pub trait TransformSink {
    /// Current position
    fn position(&self) -> Vec3;
    /// Current rotation
    fn rotation(&self) -> Quat;
    /// Overwrite the position
    fn set_position(&mut self, position: Vec3);
    /// Overwrite the rotation
    fn set_rotation(&mut self, rotation: Quat);

    /// Current pose
    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation())
    }

    /// Commit a full pose
    fn set_pose(&mut self, pose: Pose) {
        self.set_position(pose.position);
        self.set_rotation(pose.rotation);
    }
}

/// Plain in-memory transform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Number of pose writes received, used by hosts to detect idle frames
    #[serde(skip)]
    pub writes: u64,
}

impl Transform {
    /// Create a transform from a pose
    pub fn from_pose(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            writes: 0,
        }
    }
}

impl TransformSink for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.writes += 1;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.writes += 1;
    }
}

/// Rotation whose forward axis points along `direction`.
///
/// Returns `None` for zero-length or non-finite directions.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if !direction.is_finite() || direction.length_squared() < MIN_DIRECTION_LENGTH_SQUARED {
        return None;
    }
    let forward = direction.normalize();

    let mut right = forward.cross(UP);
    if right.length_squared() < MIN_DIRECTION_LENGTH_SQUARED {
        // Looking straight up or down
        right = forward.cross(Vec3::Z);
    }
    let right = right.normalize();
    let up = right.cross(forward);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}

/// Rotation from `(pitch, yaw, roll)` degrees
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

/// Post-multiply `rotation` by an Euler offset, skipping the zero offset
pub fn apply_offset(rotation: Quat, offset: Vec3) -> Quat {
    if offset == Vec3::ZERO {
        rotation
    } else {
        rotation * euler_degrees(offset)
    }
}

/// Slerp factor for rate-based convergence, clamped to `[0, 1]`
pub fn convergence(rate: f32, delta_time: f32) -> f32 {
    let step = rate * delta_time;
    if step.is_finite() {
        step.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_look_rotation_points_forward_axis() {
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::new(1.0, 2.0, -3.0)] {
            let rotation = look_rotation(direction).unwrap();
            assert!(approx_vec(rotation * FORWARD, direction.normalize()));
        }
    }

    #[test]
    fn test_look_rotation_identity_for_negative_z() {
        let rotation = look_rotation(Vec3::NEG_Z).unwrap();
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));
    }

    #[test]
    fn test_look_rotation_straight_up() {
        let rotation = look_rotation(Vec3::Y).unwrap();
        assert!(approx_vec(rotation * FORWARD, Vec3::Y));
        assert!(rotation.is_finite());
    }

    #[test]
    fn test_look_rotation_zero_direction() {
        assert!(look_rotation(Vec3::ZERO).is_none());
        assert!(look_rotation(Vec3::splat(f32::NAN)).is_none());
    }

    #[test]
    fn test_pose_looking_at() {
        let pose = Pose::looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(pose.position, Vec3::new(0.0, 2.0, 0.0));
        assert!(approx_vec(pose.forward(), Vec3::X));

        let degenerate = Pose::looking_at(Vec3::ONE, Vec3::ONE);
        assert_eq!(degenerate.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_euler_yaw_turns_forward() {
        let rotation = euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        // Yawing 90 degrees counter-clockwise around +Y turns -Z into -X
        assert!(approx_vec(rotation * FORWARD, Vec3::NEG_X));
    }

    #[test]
    fn test_apply_zero_offset_is_identity() {
        let rotation = euler_degrees(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(apply_offset(rotation, Vec3::ZERO), rotation);
    }

    #[test]
    fn test_convergence_clamped() {
        assert_eq!(convergence(2.0, 0.25), 0.5);
        assert_eq!(convergence(100.0, 1.0), 1.0);
        assert_eq!(convergence(-1.0, 1.0), 0.0);
        assert_eq!(convergence(f32::INFINITY, 0.0), 0.0);
    }

    #[test]
    fn test_transform_counts_writes() {
        let mut transform = Transform::default();
        transform.set_pose(Pose::at(Vec3::ONE));
        assert_eq!(transform.writes, 2);
        assert_eq!(transform.position, Vec3::ONE);
    }
}
