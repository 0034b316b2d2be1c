// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types.

use crate::shot::ShotKind;
use std::path::PathBuf;

/// Structural defect that makes a shot unplayable.
///
/// Never fatal: the player logs it and skips the shot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShotError {
    /// Duration is zero, negative or not finite
    #[error("Invalid shot duration: {0}")]
    InvalidDuration(f32),

    /// No start pose authored
    #[error("{0:?} shot has no start pose")]
    MissingStartPose(ShotKind),

    /// No end pose for a kind that moves between two poses
    #[error("{0:?} shot has no end pose")]
    MissingEndPose(ShotKind),

    /// Pan start or end target missing or unresolvable
    #[error("{0:?} shot is missing a pan target")]
    MissingPanTarget(ShotKind),

    /// Orbit center missing or unresolvable
    #[error("Orbit shot has no orbit center")]
    MissingOrbitCenter,

    /// Look-at target missing or unresolvable
    #[error("{0:?} shot needs a look-at target")]
    MissingLookAtTarget(ShotKind),

    /// Dolly path with fewer than two waypoints
    #[error("Dolly path needs at least 2 points, found {0}")]
    DollyPathTooShort(usize),
}

/// Error loading or saving an authored document
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Failed to access {path:?}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid RON for the expected type
    #[error("Failed to parse document: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Document could not be serialized
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] ron::Error),

    /// Document was written by a newer format version
    #[error("Unsupported document version {found} (max supported {supported})")]
    UnsupportedVersion {
        /// Version found in the document
        found: u32,
        /// Newest version this build understands
        supported: u32,
    },
}
