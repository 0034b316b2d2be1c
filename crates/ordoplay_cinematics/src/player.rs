// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shot sequence playback.
//!
//! The player is a state machine advanced by [`SequencePlayer::tick`]. Each tick either
//! evaluates the active shot and commits the pose, or counts down a trailing hold or
//! inter-shot delay with the camera frozen. Only one shot writes to the camera at a time:
//! either the sequence or a single out-of-band shot.

use crate::binding::Anchors;
use crate::error::ShotError;
use crate::evaluator::{ShotContext, ShotEvaluator};
use crate::pose::TransformSink;
use crate::shot::{ShotDescriptor, ShotId};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing is writing to the camera
    #[default]
    Stopped,
    /// Traversing the full shot list
    PlayingSequence,
    /// Running one shot out-of-band
    PlayingShot,
}

/// Notification emitted by the player, collected until [`SequencePlayer::take_events`]
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Sequence playback started
    SequenceStarted,
    /// A shot began
    ShotStarted {
        /// Shot index
        index: usize,
        /// Shot name
        name: String,
    },
    /// A shot could not be played and was skipped
    ShotSkipped {
        /// Shot index
        index: usize,
        /// Why it was skipped
        reason: ShotError,
    },
    /// A shot reached the end of its active duration
    ShotFinished {
        /// Shot index
        index: usize,
    },
    /// The last shot finished and playback wrapped to the first
    SequenceLooped,
    /// The last shot finished and playback ended
    SequenceFinished,
    /// Playback was stopped explicitly
    Stopped,
}

/// Something that can be asked to play one shot, fire-and-forget
pub trait ShotTrigger {
    /// Request shot `index`. Returns whether the request was accepted.
    fn trigger_shot(&mut self, index: usize) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// `lead` is time already spent past the previous phase boundary
    Starting { index: usize, lead: f32 },
    Running { index: usize, elapsed: f32 },
    Holding { index: usize, remaining: f32 },
    Delaying { next: usize, remaining: f32 },
}

/// Plays an ordered list of shots into a camera transform
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    shots: Vec<ShotDescriptor>,
    /// Restart from the first shot after the last one
    pub looping: bool,
    /// Seconds between consecutive shots, camera frozen
    pub delay_between_shots: f32,
    state: PlaybackState,
    phase: Phase,
    current_index: usize,
    selected_index: Option<usize>,
    pending_events: Vec<PlayerEvent>,
}

impl SequencePlayer {
    /// Create an empty player
    pub fn new() -> Self {
        Self {
            shots: Vec::new(),
            looping: false,
            delay_between_shots: 0.0,
            state: PlaybackState::Stopped,
            phase: Phase::Idle,
            current_index: 0,
            selected_index: None,
            pending_events: Vec::new(),
        }
    }

    /// Create a player with shots
    pub fn with_shots(shots: Vec<ShotDescriptor>) -> Self {
        Self {
            shots,
            ..Self::new()
        }
    }

    // --- Playback control ---

    /// Start the sequence from the first shot.
    ///
    /// No-op if the sequence is already playing or there are no shots. A running
    /// out-of-band shot is cancelled.
    pub fn play_sequence(&mut self) -> bool {
        if self.state == PlaybackState::PlayingSequence {
            tracing::debug!("Sequence already playing");
            return false;
        }
        if self.shots.is_empty() {
            tracing::warn!("Cannot play sequence: no shots");
            return false;
        }

        self.state = PlaybackState::PlayingSequence;
        self.current_index = 0;
        self.phase = Phase::Starting {
            index: 0,
            lead: 0.0,
        };
        self.pending_events.push(PlayerEvent::SequenceStarted);
        tracing::info!("Playing camera sequence ({} shots)", self.shots.len());
        true
    }

    /// Halt playback immediately. The camera keeps its last committed pose.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.phase = Phase::Idle;
        self.pending_events.push(PlayerEvent::Stopped);
        tracing::info!("Camera playback stopped");
    }

    /// Run one shot out-of-band. Rejected while the full sequence is playing.
    pub fn play_specific_shot(&mut self, index: usize) -> bool {
        if self.state == PlaybackState::PlayingSequence {
            tracing::warn!("Cannot play shot {} while the sequence is playing", index);
            return false;
        }
        if index >= self.shots.len() {
            tracing::warn!("Shot index {} out of range ({} shots)", index, self.shots.len());
            return false;
        }

        self.state = PlaybackState::PlayingShot;
        self.phase = Phase::Starting { index, lead: 0.0 };
        tracing::debug!("Playing single shot {}", index);
        true
    }

    /// Stop whatever is playing and run shot `index` on its own
    pub fn jump_to_shot(&mut self, index: usize) -> bool {
        self.stop();
        self.play_specific_shot(index)
    }

    /// Advance playback by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32, anchors: &Anchors, camera: &mut dyn TransformSink) {
        let mut dt = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        // Skips and zero-length delays resolve within the tick, at most one pass over the list
        let mut starts = 0;

        loop {
            match self.phase {
                Phase::Idle => return,
                Phase::Starting { index, lead } => {
                    if starts >= self.shots.len() {
                        return;
                    }
                    starts += 1;
                    if self.begin_shot(index, lead, anchors, camera) {
                        return;
                    }
                    self.phase = self.after_shot(index, lead);
                }
                Phase::Running { index, elapsed } => {
                    let step = dt;
                    let elapsed = elapsed + step;
                    dt = 0.0;
                    let Some(shot) = self.shots.get(index) else {
                        self.phase = self.after_shot(index, 0.0);
                        continue;
                    };

                    let finished = elapsed >= shot.duration;
                    let sample = if finished { shot.duration } else { elapsed };
                    let ctx = ShotContext::new(sample, step, camera.pose(), anchors);
                    match ShotEvaluator::evaluate(shot, &ctx) {
                        Ok(pose) => camera.set_pose(pose),
                        Err(reason) => {
                            self.skip(index, reason);
                            self.phase = self.after_shot(index, 0.0);
                            continue;
                        }
                    }

                    if !finished {
                        self.phase = Phase::Running { index, elapsed };
                        return;
                    }

                    tracing::debug!("Shot {} finished", index);
                    self.pending_events.push(PlayerEvent::ShotFinished { index });
                    let overshoot = elapsed - shot.duration;
                    self.phase = if shot.wait_at_end && shot.wait_duration > 0.0 {
                        Phase::Holding {
                            index,
                            remaining: shot.wait_duration - overshoot,
                        }
                    } else {
                        self.after_shot(index, overshoot)
                    };
                    return;
                }
                Phase::Holding { index, remaining } => {
                    let remaining = remaining - dt;
                    dt = 0.0;
                    if remaining > 0.0 {
                        self.phase = Phase::Holding { index, remaining };
                        return;
                    }
                    self.phase = self.after_shot(index, -remaining);
                }
                Phase::Delaying { next, remaining } => {
                    let remaining = remaining - dt;
                    dt = 0.0;
                    if remaining > 0.0 {
                        self.phase = Phase::Delaying { next, remaining };
                        return;
                    }
                    self.phase = Phase::Starting {
                        index: next,
                        lead: -remaining,
                    };
                }
            }
        }
    }

    /// Fire the hook, validate and commit the first pose. Returns false if skipped.
    ///
    /// The first pose is always sampled at `elapsed = 0`; `lead` only shifts the clock the
    /// following ticks advance from.
    fn begin_shot(
        &mut self,
        index: usize,
        lead: f32,
        anchors: &Anchors,
        camera: &mut dyn TransformSink,
    ) -> bool {
        let Some(shot) = self.shots.get(index) else {
            tracing::warn!("Shot index {} out of range", index);
            return false;
        };
        if self.state == PlaybackState::PlayingSequence {
            self.current_index = index;
        }

        tracing::debug!("Starting shot {} '{}' ({:?})", index, shot.name, shot.kind);
        if let Some(hook) = &shot.on_start {
            hook.invoke();
        }
        self.pending_events.push(PlayerEvent::ShotStarted {
            index,
            name: shot.name.clone(),
        });

        let ctx = ShotContext::new(0.0, 0.0, camera.pose(), anchors);
        match ShotEvaluator::evaluate(shot, &ctx) {
            Ok(pose) => {
                camera.set_pose(pose);
                self.phase = Phase::Running {
                    index,
                    elapsed: lead,
                };
                true
            }
            Err(reason) => {
                self.skip(index, reason);
                false
            }
        }
    }

    fn skip(&mut self, index: usize, reason: ShotError) {
        let name = self.shots.get(index).map_or("<missing>", |s| s.name.as_str());
        tracing::warn!("Skipping shot {} '{}': {}", index, name, reason);
        self.pending_events.push(PlayerEvent::ShotSkipped { index, reason });
    }

    /// Phase following shot `index` once it is done (or skipped), `carry` seconds late
    fn after_shot(&mut self, index: usize, carry: f32) -> Phase {
        if self.state != PlaybackState::PlayingSequence {
            self.state = PlaybackState::Stopped;
            return Phase::Idle;
        }

        let next = index + 1;
        let next = if next < self.shots.len() {
            next
        } else if self.looping {
            tracing::debug!("Camera sequence looping");
            self.pending_events.push(PlayerEvent::SequenceLooped);
            0
        } else {
            tracing::info!("Camera sequence finished");
            self.state = PlaybackState::Stopped;
            self.pending_events.push(PlayerEvent::SequenceFinished);
            return Phase::Idle;
        };

        if self.delay_between_shots > 0.0 {
            Phase::Delaying {
                next,
                remaining: self.delay_between_shots - carry,
            }
        } else {
            Phase::Starting { index: next, lead: carry }
        }
    }

    // --- State ---

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the full sequence is playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::PlayingSequence
    }

    /// Whether a single out-of-band shot is playing
    pub fn is_previewing(&self) -> bool {
        self.state == PlaybackState::PlayingShot
    }

    /// Index of the sequence's current shot
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Index of the shot currently being evaluated, held or waited on
    pub fn active_shot_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Idle => None,
            Phase::Starting { index, .. }
            | Phase::Running { index, .. }
            | Phase::Holding { index, .. } => Some(index),
            Phase::Delaying { next, .. } => Some(next),
        }
    }

    /// Shot currently playing
    pub fn current_shot(&self) -> Option<&ShotDescriptor> {
        self.active_shot_index().and_then(|i| self.shots.get(i))
    }

    /// Seconds into the running shot
    pub fn shot_elapsed(&self) -> Option<f32> {
        match self.phase {
            Phase::Running { elapsed, .. } => Some(elapsed),
            _ => None,
        }
    }

    /// Whether the camera is frozen in a trailing hold or inter-shot delay
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, Phase::Holding { .. } | Phase::Delaying { .. })
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // --- Shot list ---

    /// Get all shots
    pub fn shots(&self) -> &[ShotDescriptor] {
        &self.shots
    }

    /// Get a shot
    pub fn shot(&self, index: usize) -> Option<&ShotDescriptor> {
        self.shots.get(index)
    }

    /// Get shot count
    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    /// Find a shot index by ID
    pub fn shot_index(&self, id: ShotId) -> Option<usize> {
        self.shots.iter().position(|s| s.id == id)
    }

    /// Append a shot. Refused while anything is playing.
    pub fn add_shot(&mut self, shot: ShotDescriptor) -> Option<ShotId> {
        if self.is_active() {
            tracing::warn!("Cannot add shot '{}' during playback", shot.name);
            return None;
        }
        let id = shot.id;
        self.shots.push(shot);
        Some(id)
    }

    /// Insert a shot at `index` (clamped to the end). Refused while anything is playing.
    pub fn insert_shot(&mut self, index: usize, shot: ShotDescriptor) -> Option<ShotId> {
        if self.is_active() {
            tracing::warn!("Cannot insert shot '{}' during playback", shot.name);
            return None;
        }
        let id = shot.id;
        self.shots.insert(index.min(self.shots.len()), shot);
        Some(id)
    }

    /// Remove a shot. Refused while anything is playing.
    pub fn remove_shot(&mut self, index: usize) -> Option<ShotDescriptor> {
        if self.is_active() || index >= self.shots.len() {
            return None;
        }
        let removed = self.shots.remove(index);
        self.selected_index = match self.selected_index {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Some(removed)
    }

    /// Length of one pass through the sequence, including holds and delays
    pub fn total_duration(&self) -> f32 {
        let shots: f32 = self.shots.iter().map(ShotDescriptor::total_duration).sum();
        let gaps = self.shots.len().saturating_sub(1) as f32 * self.delay_between_shots.max(0.0);
        shots + gaps
    }

    fn is_active(&self) -> bool {
        self.state != PlaybackState::Stopped
    }

    // --- Selection (authoring only, never affects playback) ---

    /// Selected shot index
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Selected shot
    pub fn selected_shot(&self) -> Option<&ShotDescriptor> {
        self.selected_index.and_then(|i| self.shots.get(i))
    }

    /// Select a shot; an out-of-range index clears the selection
    pub fn select_shot(&mut self, index: usize) {
        self.selected_index = (index < self.shots.len()).then_some(index);
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }

    /// Select the next shot, wrapping to the first
    pub fn select_next_shot(&mut self) {
        let count = self.shots.len();
        self.selected_index = match (count, self.selected_index) {
            (0, _) => None,
            (_, None) => Some(0),
            (_, Some(i)) => Some((i + 1) % count),
        };
    }

    /// Select the previous shot, wrapping to the last
    pub fn select_previous_shot(&mut self) {
        let count = self.shots.len();
        self.selected_index = match (count, self.selected_index) {
            (0, _) => None,
            (_, None) => Some(count - 1),
            (_, Some(i)) => Some((i + count - 1) % count),
        };
    }

    /// Jump to the selected shot
    pub fn jump_to_selected_shot(&mut self) -> bool {
        match self.selected_index {
            Some(index) => self.jump_to_shot(index),
            None => false,
        }
    }

    /// Play the selected shot out-of-band
    pub fn preview_selected_shot(&mut self) -> bool {
        match self.selected_index {
            Some(index) => self.play_specific_shot(index),
            None => false,
        }
    }
}

impl Default for SequencePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShotTrigger for SequencePlayer {
    fn trigger_shot(&mut self, index: usize) -> bool {
        self.play_specific_shot(index)
    }
}
