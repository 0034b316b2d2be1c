// SPDX-License-Identifier: MIT OR Apache-2.0
//! Authored sequence, mover and panner documents.
//!
//! Documents are RON files. Every field has a default, so partial documents load and
//! fill the rest from the defaults. A document with a newer `version` than
//! [`CONFIG_FORMAT_VERSION`] is rejected.

use crate::binding::Anchors;
use crate::curve::AnimationCurve;
use crate::error::ConfigError;
use crate::mover::{ActorMover, MoveMode, WaypointTrigger};
use crate::panner::CameraPanner;
use crate::player::SequencePlayer;
use crate::pose::Pose;
use crate::shot::ShotDescriptor;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current document format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Conventional extension for sequence documents
pub const SEQUENCE_FILE_EXTENSION: &str = "sequence.ron";

fn check_version(found: u32) -> Result<(), ConfigError> {
    if found > CONFIG_FORMAT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found,
            supported: CONFIG_FORMAT_VERSION,
        });
    }
    Ok(())
}

fn pretty() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::default()
        .struct_names(true)
        .enumerate_arrays(false)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<(), ConfigError> {
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A camera sequence: shots, playback settings and named anchor positions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Format version
    pub version: u32,
    /// Sequence name
    pub name: String,
    /// Restart after the last shot
    pub looping: bool,
    /// Seconds between shots
    pub delay_between_shots: f32,
    /// Initial anchor positions
    pub anchors: IndexMap<String, Vec3>,
    /// Shots in playback order
    pub shots: Vec<ShotDescriptor>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            name: "Untitled Sequence".to_string(),
            looping: false,
            delay_between_shots: 0.0,
            anchors: IndexMap::new(),
            shots: Vec::new(),
        }
    }
}

impl SequenceConfig {
    /// Create an empty sequence document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Capture a player's shots and settings
    pub fn from_player(
        name: impl Into<String>,
        player: &SequencePlayer,
        anchors: &Anchors,
    ) -> Self {
        Self {
            name: name.into(),
            looping: player.looping,
            delay_between_shots: player.delay_between_shots,
            anchors: anchors.iter().map(|(k, v)| (k.to_string(), v)).collect(),
            shots: player.shots().to_vec(),
            ..Self::default()
        }
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        check_version(config.version)?;
        Ok(config)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, pretty())?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_ron(&read(path)?)?;
        tracing::info!(
            "Loaded sequence '{}' ({} shots) from {:?}",
            config.name,
            config.shots.len(),
            path
        );
        Ok(config)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write(path, &self.to_ron()?)?;
        tracing::debug!("Saved sequence '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Anchor registry seeded from this document
    pub fn anchors(&self) -> Anchors {
        Anchors::from(self.anchors.clone())
    }

    /// Log shots that cannot play against the document's own anchors.
    ///
    /// Returns the number of defective shots. Defects are not fatal.
    pub fn report_defects(&self) -> usize {
        let anchors = self.anchors();
        let mut defects = 0;
        for (index, shot) in self.shots.iter().enumerate() {
            if let Err(e) = shot.validate(&anchors) {
                tracing::warn!("Shot {} '{}' will be skipped: {}", index, shot.name, e);
                defects += 1;
            }
        }
        defects
    }
}

impl From<&SequenceConfig> for Anchors {
    fn from(config: &SequenceConfig) -> Self {
        config.anchors()
    }
}

impl SequencePlayer {
    /// Create a player from a sequence document
    pub fn from_config(config: &SequenceConfig) -> Self {
        let mut player = Self::with_shots(config.shots.clone());
        player.looping = config.looping;
        player.delay_between_shots = config.delay_between_shots;
        player
    }
}

/// Actor mover settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    /// Format version
    pub version: u32,
    /// Point or path mode
    pub mode: MoveMode,
    /// Units per second
    pub move_speed: f32,
    /// Easing over each leg
    pub movement_curve: AnimationCurve,
    /// Turn toward the travel direction
    pub rotate_towards_target: bool,
    /// Rotation convergence rate, 1/s
    pub rotation_speed: f32,
    /// Loop between points or around the path
    pub loop_movement: bool,
    /// Pause before each looped leg
    pub loop_delay: f32,
    /// Start moving on begin
    pub auto_start: bool,
    /// Shots requested on waypoint arrival
    pub triggers: Vec<WaypointTrigger>,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self::from_mover(&ActorMover::default())
    }
}

impl MoverConfig {
    /// Capture a mover's settings
    pub fn from_mover(mover: &ActorMover) -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            mode: mover.mode.clone(),
            move_speed: mover.move_speed,
            movement_curve: mover.movement_curve.clone(),
            rotate_towards_target: mover.rotate_towards_target,
            rotation_speed: mover.rotation_speed,
            loop_movement: mover.loop_movement,
            loop_delay: mover.loop_delay,
            auto_start: mover.auto_start,
            triggers: mover.triggers.clone(),
        }
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        check_version(config.version)?;
        Ok(config)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, pretty())?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_ron(&read(path)?)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write(path, &self.to_ron()?)
    }
}

impl ActorMover {
    /// Create a mover from settings
    pub fn from_config(config: &MoverConfig) -> Self {
        let mut mover = Self::new(config.mode.clone());
        mover.move_speed = config.move_speed;
        mover.movement_curve = config.movement_curve.clone();
        mover.rotate_towards_target = config.rotate_towards_target;
        mover.rotation_speed = config.rotation_speed;
        mover.loop_movement = config.loop_movement;
        mover.loop_delay = config.loop_delay;
        mover.auto_start = config.auto_start;
        mover.triggers = config.triggers.clone();
        mover
    }
}

/// Camera panner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PannerConfig {
    /// Format version
    pub version: u32,
    /// Poses visited in order
    pub points: Vec<Pose>,
    /// Seconds per segment
    pub pan_duration: f32,
    /// Easing over each segment
    pub pan_curve: AnimationCurve,
    /// Start panning on begin
    pub auto_start: bool,
    /// Pan back to the first point and keep going
    pub loop_panning: bool,
}

impl Default for PannerConfig {
    fn default() -> Self {
        Self::from_panner(&CameraPanner::default())
    }
}

impl PannerConfig {
    /// Capture a panner's settings
    pub fn from_panner(panner: &CameraPanner) -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            points: panner.points.clone(),
            pan_duration: panner.pan_duration,
            pan_curve: panner.pan_curve.clone(),
            auto_start: panner.auto_start,
            loop_panning: panner.loop_panning,
        }
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        check_version(config.version)?;
        Ok(config)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, pretty())?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_ron(&read(path)?)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write(path, &self.to_ron()?)
    }
}

impl CameraPanner {
    /// Create a panner from settings
    pub fn from_config(config: &PannerConfig) -> Self {
        let mut panner = Self::new(config.points.clone());
        panner.pan_duration = config.pan_duration;
        panner.pan_curve = config.pan_curve.clone();
        panner.auto_start = config.auto_start;
        panner.loop_panning = config.loop_panning;
        panner
    }
}
