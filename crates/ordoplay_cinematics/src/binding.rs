// SPDX-License-Identifier: MIT OR Apache-2.0
//! Target bindings for look-at, pan, orbit and trigger targets.

use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where a shot reads a target position from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetBinding {
    /// Fixed world position
    Point(Vec3),
    /// Named anchor whose position the host updates between ticks
    Anchor(String),
}

impl TargetBinding {
    /// Bind to a named anchor
    pub fn anchor(name: impl Into<String>) -> Self {
        Self::Anchor(name.into())
    }

    /// Resolve against the current anchor positions
    pub fn resolve(&self, anchors: &Anchors) -> Option<Vec3> {
        match self {
            Self::Point(position) => Some(*position),
            Self::Anchor(name) => anchors.get(name),
        }
    }
}

impl From<Vec3> for TargetBinding {
    fn from(position: Vec3) -> Self {
        Self::Point(position)
    }
}

/// Live anchor positions, polled by the evaluator every tick it needs them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    positions: IndexMap<String, Vec3>,
}

impl Anchors {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move an anchor
    pub fn set(&mut self, name: impl Into<String>, position: Vec3) {
        self.positions.insert(name.into(), position);
    }

    /// Remove an anchor
    pub fn remove(&mut self, name: &str) -> Option<Vec3> {
        self.positions.shift_remove(name)
    }

    /// Current position of an anchor
    pub fn get(&self, name: &str) -> Option<Vec3> {
        self.positions.get(name).copied()
    }

    /// Whether an anchor is registered
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Iterate anchors in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec3)> {
        self.positions.iter().map(|(name, position)| (name.as_str(), *position))
    }

    /// Number of anchors
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no anchors are registered
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<IndexMap<String, Vec3>> for Anchors {
    fn from(positions: IndexMap<String, Vec3>) -> Self {
        Self { positions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_resolves_without_anchors() {
        let binding = TargetBinding::from(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(binding.resolve(&Anchors::new()), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_anchor_tracks_updates() {
        let mut anchors = Anchors::new();
        let binding = TargetBinding::anchor("hero");
        assert_eq!(binding.resolve(&anchors), None);

        anchors.set("hero", Vec3::X);
        assert_eq!(binding.resolve(&anchors), Some(Vec3::X));

        anchors.set("hero", Vec3::Y);
        assert_eq!(binding.resolve(&anchors), Some(Vec3::Y));
        assert_eq!(anchors.len(), 1);

        anchors.remove("hero");
        assert!(!anchors.contains("hero"));
        assert_eq!(binding.resolve(&anchors), None);
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut anchors = Anchors::new();
        anchors.set("b", Vec3::ZERO);
        anchors.set("a", Vec3::ZERO);
        anchors.set("c", Vec3::ZERO);
        anchors.remove("a");
        assert!(anchors.contains("b"));
        let names: Vec<&str> = anchors.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
