// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cinematic camera shots and actor movement for `OrdoPlay`.
//!
//! This crate provides the runtime side of authored cinematics:
//! - Camera shots (static holds, moves, pans, orbits, dolly tracks, look-at holds)
//! - Per-tick shot evaluation into camera poses
//! - Sequence playback with delays, trailing holds and looping
//! - Point-to-point and path actor movement that can trigger shots
//! - Camera pans through a list of authored poses
//!
//! ## Architecture
//!
//! Everything is driven by an explicit `tick(dt)` from the host game loop:
//! - [`ShotEvaluator`] is stateless and maps a shot plus elapsed time to a [`Pose`]
//! - [`SequencePlayer`] owns traversal state and writes into a host [`TransformSink`]
//! - [`ActorMover`] moves an actor and may fire shots through [`ShotTrigger`]
//! - [`CameraPanner`] blends the camera through poses outside any shot
//! - [`Anchors`] carries live target positions the host updates between ticks

pub mod binding;
pub mod config;
pub mod curve;
pub mod error;
pub mod evaluator;
pub mod mover;
pub mod panner;
pub mod player;
pub mod pose;
pub mod shot;

pub use binding::{Anchors, TargetBinding};
pub use config::{MoverConfig, PannerConfig, SequenceConfig, CONFIG_FORMAT_VERSION};
pub use curve::{AnimationCurve, Curve, CurveKey};
pub use error::{ConfigError, ShotError};
pub use evaluator::{ShotContext, ShotEvaluator};
pub use mover::{ActorMover, MoveMode, MoverEvent, MoverState, WaypointTrigger};
pub use panner::{CameraPanner, PannerEvent};
pub use player::{PlaybackState, PlayerEvent, SequencePlayer, ShotTrigger};
pub use pose::{Pose, Transform, TransformSink};
pub use shot::{RotationKind, ShotDescriptor, ShotHook, ShotId, ShotKind};
