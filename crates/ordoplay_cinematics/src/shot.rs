// SPDX-License-Identifier: MIT OR Apache-2.0
//! Authored camera shot descriptions.

use crate::binding::{Anchors, TargetBinding};
use crate::curve::AnimationCurve;
use crate::error::ShotError;
use crate::pose::Pose;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShotId(pub Uuid);

impl ShotId {
    /// Create a new random shot ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Motion archetype of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShotKind {
    /// Camera holds one position
    #[default]
    Static,
    /// Camera moves from start to end
    Movement,
    /// Camera stays put and sweeps its view between two targets
    Pan,
    /// Camera moves while sweeping its view between two targets
    MovementWithPan,
    /// Camera circles a center point
    OrbitAround,
    /// Camera follows a track of waypoints
    DollyPath,
    /// Camera rotates in place
    FreeRotation,
    /// Camera stays put and aims at a target
    LookAtOnly,
    /// Movement with optional continuous look-at
    CustomSequence,
}

impl ShotKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Movement => "Movement",
            Self::Pan => "Pan",
            Self::MovementWithPan => "Movement With Pan",
            Self::OrbitAround => "Orbit Around",
            Self::DollyPath => "Dolly Path",
            Self::FreeRotation => "Free Rotation",
            Self::LookAtOnly => "Look At Only",
            Self::CustomSequence => "Custom Sequence",
        }
    }

    /// Get all kinds in authoring order
    pub fn all() -> &'static [ShotKind] {
        &[
            Self::Static,
            Self::Movement,
            Self::Pan,
            Self::MovementWithPan,
            Self::OrbitAround,
            Self::DollyPath,
            Self::FreeRotation,
            Self::LookAtOnly,
            Self::CustomSequence,
        ]
    }
}

/// How a shot resolves camera orientation when the kind has no rule of its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationKind {
    /// Slerp between the start and end pose rotations
    #[default]
    UseStartEndOrientation,
    /// Aim at the look-at target
    LookAtTarget,
    /// Custom Euler angles if set, otherwise start/end slerp
    FreeRotation,
    /// Face along the start-to-end displacement
    FollowMovementDirection,
    /// Leave the committed rotation alone
    KeepCurrentRotation,
    /// Interpolate between two authored Euler angles
    CustomEulerAngles,
}

/// Notification invoked once when a shot starts
#[derive(Clone)]
pub struct ShotHook(Arc<dyn Fn() + Send + Sync>);

impl ShotHook {
    /// Wrap a callback
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Invoke the callback
    pub fn invoke(&self) {
        (self.0)();
    }
}

impl fmt::Debug for ShotHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShotHook")
    }
}

/// One authored camera shot.
///
/// `kind` decides which fields are read; the rest are ignored, not invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotDescriptor {
    /// Unique shot ID
    pub id: ShotId,
    /// Shot name
    pub name: String,
    /// Active duration in seconds (must be > 0)
    pub duration: f32,
    /// Free-text description, display only
    pub description: String,
    /// Motion archetype
    pub kind: ShotKind,
    /// Orientation rule for kinds that defer to it
    pub rotation_kind: RotationKind,

    /// Start pose
    pub start: Option<Pose>,
    /// End pose (Movement, MovementWithPan, FreeRotation, CustomSequence)
    pub end: Option<Pose>,

    /// Aim at `look_at_target` (Static, OrbitAround, CustomSequence)
    pub use_look_at: bool,
    /// Look-at target
    pub look_at_target: Option<TargetBinding>,
    /// Re-aim every tick instead of once at shot start
    pub continuous_look_at: bool,
    /// Converge toward the aim rotation instead of snapping
    pub smooth_look_at: bool,
    /// Convergence rate for smoothed look-at (1/s)
    pub look_at_speed: f32,
    /// Euler offset applied after the look rotation (LookAtOnly)
    pub look_at_rotation_offset: Vec3,

    /// First pan target
    pub pan_start_target: Option<TargetBinding>,
    /// Last pan target
    pub pan_end_target: Option<TargetBinding>,
    /// Euler offset applied after the pan look rotation
    pub pan_rotation_offset: Vec3,

    /// Orbit center
    pub orbit_center: Option<TargetBinding>,
    /// Orbit axis
    pub orbit_axis: Vec3,
    /// Swept angle in degrees, signed, may exceed a full turn
    pub orbit_angle: f32,
    /// Orbit radius
    pub orbit_radius: f32,
    /// Keep the start height along the orbit axis
    pub maintain_orbit_height: bool,
    /// Euler offset applied after the orbit look rotation
    pub orbit_look_offset: Vec3,

    /// Dolly track waypoints
    pub dolly_path: Vec<Pose>,

    /// Position easing
    pub movement_curve: AnimationCurve,
    /// Rotation easing
    pub rotation_curve: AnimationCurve,
    /// Pan easing
    pub pan_curve: AnimationCurve,

    /// Use `static_rotation_override` for Static shots
    pub use_static_rotation_override: bool,
    /// Fixed Euler rotation for Static shots
    pub static_rotation_override: Vec3,

    /// Euler rotation at shot start (CustomEulerAngles)
    pub custom_rotation_start: Vec3,
    /// Euler rotation at shot end (CustomEulerAngles)
    pub custom_rotation_end: Vec3,
    /// Apply custom Euler angles relative to the start pose rotation
    pub use_local_rotation: bool,

    /// Hold the final pose after the shot
    pub wait_at_end: bool,
    /// Hold length in seconds
    pub wait_duration: f32,

    /// Invoked once when the shot starts
    #[serde(skip)]
    pub on_start: Option<ShotHook>,
}

impl ShotDescriptor {
    /// Create a new shot with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ShotId::new(),
            name: name.into(),
            duration: 5.0,
            description: String::new(),
            kind: ShotKind::Static,
            rotation_kind: RotationKind::UseStartEndOrientation,
            start: None,
            end: None,
            use_look_at: false,
            look_at_target: None,
            continuous_look_at: true,
            smooth_look_at: true,
            look_at_speed: 2.0,
            look_at_rotation_offset: Vec3::ZERO,
            pan_start_target: None,
            pan_end_target: None,
            pan_rotation_offset: Vec3::ZERO,
            orbit_center: None,
            orbit_axis: Vec3::Y,
            orbit_angle: 360.0,
            orbit_radius: 5.0,
            maintain_orbit_height: true,
            orbit_look_offset: Vec3::ZERO,
            dolly_path: Vec::new(),
            movement_curve: AnimationCurve::default(),
            rotation_curve: AnimationCurve::default(),
            pan_curve: AnimationCurve::default(),
            use_static_rotation_override: false,
            static_rotation_override: Vec3::ZERO,
            custom_rotation_start: Vec3::ZERO,
            custom_rotation_end: Vec3::ZERO,
            use_local_rotation: false,
            wait_at_end: false,
            wait_duration: 1.0,
            on_start: None,
        }
    }

    /// Set the shot kind
    pub fn with_kind(mut self, kind: ShotKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the rotation rule
    pub fn with_rotation(mut self, rotation_kind: RotationKind) -> Self {
        self.rotation_kind = rotation_kind;
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the start pose
    pub fn with_start(mut self, start: Pose) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end pose
    pub fn with_end(mut self, end: Pose) -> Self {
        self.end = Some(end);
        self
    }

    /// Enable look-at toward `target`
    pub fn with_look_at(mut self, target: impl Into<TargetBinding>) -> Self {
        self.use_look_at = true;
        self.look_at_target = Some(target.into());
        self
    }

    /// Set both pan targets
    pub fn with_pan(
        mut self,
        from: impl Into<TargetBinding>,
        to: impl Into<TargetBinding>,
    ) -> Self {
        self.pan_start_target = Some(from.into());
        self.pan_end_target = Some(to.into());
        self
    }

    /// Set the orbit center, swept angle and radius
    pub fn with_orbit(mut self, center: impl Into<TargetBinding>, angle: f32, radius: f32) -> Self {
        self.orbit_center = Some(center.into());
        self.orbit_angle = angle;
        self.orbit_radius = radius;
        self
    }

    /// Set the dolly track
    pub fn with_dolly_path(mut self, path: Vec<Pose>) -> Self {
        self.dolly_path = path;
        self
    }

    /// Hold the final pose for `duration` seconds
    pub fn with_wait(mut self, duration: f32) -> Self {
        self.wait_at_end = true;
        self.wait_duration = duration;
        self
    }

    /// Set the start hook
    pub fn with_on_start(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(ShotHook::new(callback));
        self
    }

    /// Active duration plus the trailing hold
    pub fn total_duration(&self) -> f32 {
        if self.wait_at_end {
            self.duration + self.wait_duration.max(0.0)
        } else {
            self.duration
        }
    }

    /// Whether evaluation of this shot reads `look_at_target`
    pub fn aims_at_look_target(&self) -> bool {
        let rotation_looks = self.rotation_kind == RotationKind::LookAtTarget;
        match self.kind {
            ShotKind::Static | ShotKind::CustomSequence => {
                !self.use_static_rotation_override && (self.use_look_at || rotation_looks)
            }
            ShotKind::Movement | ShotKind::DollyPath => rotation_looks,
            ShotKind::OrbitAround => self.use_look_at,
            ShotKind::LookAtOnly => true,
            ShotKind::Pan | ShotKind::MovementWithPan | ShotKind::FreeRotation => false,
        }
    }

    /// Check that every reference the shot kind needs is present and resolvable
    pub fn validate(&self, anchors: &Anchors) -> Result<(), ShotError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ShotError::InvalidDuration(self.duration));
        }
        if self.start.is_none() {
            return Err(ShotError::MissingStartPose(self.kind));
        }

        match self.kind {
            ShotKind::Movement | ShotKind::MovementWithPan if self.end.is_none() => {
                return Err(ShotError::MissingEndPose(self.kind));
            }
            ShotKind::OrbitAround if resolve(&self.orbit_center, anchors).is_none() => {
                return Err(ShotError::MissingOrbitCenter);
            }
            ShotKind::DollyPath if self.dolly_path.len() < 2 => {
                return Err(ShotError::DollyPathTooShort(self.dolly_path.len()));
            }
            _ => {}
        }

        if matches!(self.kind, ShotKind::Pan | ShotKind::MovementWithPan)
            && (resolve(&self.pan_start_target, anchors).is_none()
                || resolve(&self.pan_end_target, anchors).is_none())
        {
            return Err(ShotError::MissingPanTarget(self.kind));
        }

        if self.aims_at_look_target() && resolve(&self.look_at_target, anchors).is_none() {
            return Err(ShotError::MissingLookAtTarget(self.kind));
        }

        Ok(())
    }
}

impl Default for ShotDescriptor {
    fn default() -> Self {
        Self::new("New Shot")
    }
}

pub(crate) fn resolve(binding: &Option<TargetBinding>, anchors: &Anchors) -> Option<Vec3> {
    binding.as_ref().and_then(|b| b.resolve(anchors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn start() -> Pose {
        Pose::at(Vec3::ZERO)
    }

    #[test]
    fn test_shot_defaults() {
        let shot = ShotDescriptor::new("Opening");
        assert_eq!(shot.name, "Opening");
        assert_eq!(shot.duration, 5.0);
        assert_eq!(shot.kind, ShotKind::Static);
        assert_eq!(shot.orbit_axis, Vec3::Y);
        assert_eq!(shot.orbit_angle, 360.0);
        assert!(shot.continuous_look_at);
        assert!(shot.maintain_orbit_height);
    }

    #[test]
    fn test_total_duration_includes_wait() {
        let shot = ShotDescriptor::new("Hold").with_duration(2.0);
        assert_eq!(shot.total_duration(), 2.0);
        assert_eq!(shot.with_wait(1.5).total_duration(), 3.5);
    }

    #[test]
    fn test_validate_duration() {
        let anchors = Anchors::new();
        let shot = ShotDescriptor::new("Zero").with_start(start()).with_duration(0.0);
        assert_eq!(shot.validate(&anchors), Err(ShotError::InvalidDuration(0.0)));
        let shot = shot.with_duration(f32::NAN);
        assert!(matches!(shot.validate(&anchors), Err(ShotError::InvalidDuration(_))));
    }

    #[test]
    fn test_validate_missing_references() {
        let anchors = Anchors::new();

        let shot = ShotDescriptor::new("Move").with_kind(ShotKind::Movement);
        assert_eq!(
            shot.validate(&anchors),
            Err(ShotError::MissingStartPose(ShotKind::Movement))
        );

        let shot = shot.with_start(start());
        assert_eq!(
            shot.validate(&anchors),
            Err(ShotError::MissingEndPose(ShotKind::Movement))
        );

        let pan = ShotDescriptor::new("Pan")
            .with_kind(ShotKind::Pan)
            .with_start(start());
        assert_eq!(
            pan.validate(&anchors),
            Err(ShotError::MissingPanTarget(ShotKind::Pan))
        );

        let orbit = ShotDescriptor::new("Orbit")
            .with_kind(ShotKind::OrbitAround)
            .with_start(start());
        assert_eq!(orbit.validate(&anchors), Err(ShotError::MissingOrbitCenter));

        let dolly = ShotDescriptor::new("Dolly")
            .with_kind(ShotKind::DollyPath)
            .with_start(start())
            .with_dolly_path(vec![Pose::at(Vec3::X)]);
        assert_eq!(dolly.validate(&anchors), Err(ShotError::DollyPathTooShort(1)));

        let look = ShotDescriptor::new("Look")
            .with_kind(ShotKind::LookAtOnly)
            .with_start(start());
        assert_eq!(
            look.validate(&anchors),
            Err(ShotError::MissingLookAtTarget(ShotKind::LookAtOnly))
        );
    }

    #[test]
    fn test_validate_unresolved_anchor() {
        let mut anchors = Anchors::new();
        let shot = ShotDescriptor::new("Look")
            .with_kind(ShotKind::LookAtOnly)
            .with_start(start())
            .with_look_at(TargetBinding::anchor("hero"));
        assert!(shot.validate(&anchors).is_err());

        anchors.set("hero", Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(shot.validate(&anchors), Ok(()));
    }

    #[test]
    fn test_degrading_kinds_need_no_end_pose() {
        let anchors = Anchors::new();
        for kind in [ShotKind::FreeRotation, ShotKind::CustomSequence, ShotKind::Static] {
            let shot = ShotDescriptor::new("Degrade").with_kind(kind).with_start(start());
            assert_eq!(shot.validate(&anchors), Ok(()), "{kind:?}");
        }
    }

    #[test]
    fn test_static_override_ignores_look_at_target() {
        let mut shot = ShotDescriptor::new("Override").with_start(start());
        shot.use_look_at = true;
        assert!(shot.aims_at_look_target());
        shot.use_static_rotation_override = true;
        assert!(!shot.aims_at_look_target());
        assert_eq!(shot.validate(&Anchors::new()), Ok(()));
    }

    #[test]
    fn test_hook_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shot = ShotDescriptor::new("Hooked").with_on_start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let hook = shot.on_start.clone().unwrap();
        hook.invoke();
        hook.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_kind_names_unique() {
        let mut names: Vec<&str> = ShotKind::all().iter().map(ShotKind::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ShotKind::all().len());
    }
}
