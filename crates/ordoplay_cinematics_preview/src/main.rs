// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless preview runner for `OrdoPlay` cinematic sequences.
//!
//! Plays a sequence document at a fixed step with a walking actor bound to the `hero`
//! anchor, and logs shot changes and camera samples.
//!
//! ```text
//! ordoplay_cinematics_preview [sequence.ron] [seconds] [fps]
//! ```

use glam::Vec3;
use ordoplay_cinematics::{
    ActorMover, ConfigError, MoverEvent, MoverState, PlaybackState, PlayerEvent, Pose,
    SequenceConfig, SequencePlayer, ShotHook, Transform,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEMO_SEQUENCE: &str = include_str!("../assets/demo.sequence.ron");

/// Anchor the walking actor publishes its position to
const HERO_ANCHOR: &str = "hero";

#[derive(Debug, thiserror::Error)]
enum PreviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid {name} argument '{value}'")]
    Argument { name: &'static str, value: String },
}

#[derive(Debug)]
struct Options {
    sequence: Option<PathBuf>,
    seconds: f32,
    fps: u32,
}

impl Options {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, PreviewError> {
        let sequence = args.next().map(PathBuf::from);
        let seconds = match args.next() {
            Some(value) => parse_positive(&value, "seconds")?,
            None => 10.0,
        };
        let fps = match args.next() {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|fps| *fps > 0)
                .ok_or(PreviewError::Argument { name: "fps", value })?,
            None => 60,
        };
        Ok(Self {
            sequence,
            seconds,
            fps,
        })
    }
}

fn parse_positive(value: &str, name: &'static str) -> Result<f32, PreviewError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| PreviewError::Argument {
            name,
            value: value.to_string(),
        })
}

/// Requests raised by shot hooks, applied on the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    StartWalk,
}

type CommandQueue = Arc<Mutex<Vec<Command>>>;

#[derive(Debug, Default)]
struct Summary {
    started: usize,
    skipped: usize,
    triggered: usize,
}

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["ordoplay_cinematics=debug", "ordoplay_cinematics_preview=info"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting OrdoPlay cinematics preview v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = Options::from_args(std::env::args().skip(1)).and_then(run) {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<(), PreviewError> {
    let mut config = match &options.sequence {
        Some(path) => SequenceConfig::load(path)?,
        None => SequenceConfig::from_ron(DEMO_SEQUENCE)?,
    };
    let defects = config.report_defects();

    let commands: CommandQueue = Arc::new(Mutex::new(Vec::new()));
    if let Some(first) = config.shots.first_mut() {
        let queue = Arc::clone(&commands);
        first.on_start = Some(ShotHook::new(move || queue.lock().push(Command::StartWalk)));
    }

    let mut anchors = config.anchors();
    let hero_start = anchors.get(HERO_ANCHOR).unwrap_or(Vec3::ZERO);
    let mut player = SequencePlayer::from_config(&config);

    let mut actor = Transform::from_pose(Pose::at(hero_start));
    let mut mover = ActorMover::between(hero_start, hero_start + Vec3::new(0.0, 0.0, -6.0))
        .with_trigger(1, 0);
    mover.move_speed = 1.5;
    mover.loop_movement = true;
    mover.loop_delay = 1.0;

    let mut camera = Transform::default();
    let dt = 1.0 / options.fps as f32;
    let steps = (options.seconds * options.fps as f32).ceil() as u64;
    tracing::info!(
        "Previewing '{}' for {:.1}s at {} fps ({} shots, {} defective)",
        config.name,
        options.seconds,
        options.fps,
        config.shots.len(),
        defects
    );

    let mut summary = Summary::default();
    player.play_sequence();
    for step in 0..steps {
        for command in std::mem::take(&mut *commands.lock()) {
            match command {
                Command::StartWalk => {
                    if !mover.is_moving() {
                        mover.begin(&mut actor);
                    }
                }
            }
        }

        mover.tick(dt, &mut actor, Some(&mut player));
        anchors.set(HERO_ANCHOR, actor.position);
        player.tick(dt, &anchors, &mut camera);

        for event in mover.take_events() {
            if let MoverEvent::ShotTriggered { shot_index, accepted } = event {
                tracing::debug!("Actor requested shot {} (accepted: {})", shot_index, accepted);
                summary.triggered += usize::from(accepted);
            }
        }
        for event in player.take_events() {
            match event {
                PlayerEvent::ShotStarted { index, name } => {
                    summary.started += 1;
                    tracing::info!("[{:6.2}s] Shot {} '{}'", step as f32 * dt, index, name);
                }
                PlayerEvent::ShotSkipped { .. } => summary.skipped += 1,
                _ => {}
            }
        }

        if step % u64::from(options.fps) == 0 {
            let forward = camera.rotation * Vec3::NEG_Z;
            tracing::info!(
                "[{:6.2}s] camera {:.2} facing {:.2}, hero {:.2}",
                step as f32 * dt,
                camera.position,
                forward,
                actor.position
            );
        }

        if player.state() == PlaybackState::Stopped && mover.state() == MoverState::Idle {
            break;
        }
    }

    tracing::info!(
        "Preview complete: {} shots started, {} skipped, {} actor triggers, {} camera writes",
        summary.started,
        summary.skipped,
        summary.triggered,
        camera.writes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_default_options() {
        let options = Options::from_args(args(&[])).unwrap();
        assert!(options.sequence.is_none());
        assert_eq!(options.seconds, 10.0);
        assert_eq!(options.fps, 60);
    }

    #[test]
    fn test_invalid_options() {
        assert!(Options::from_args(args(&["a.ron", "-3"])).is_err());
        assert!(Options::from_args(args(&["a.ron", "2", "0"])).is_err());
        let options = Options::from_args(args(&["a.ron", "2.5", "30"])).unwrap();
        assert_eq!(options.fps, 30);
    }

    #[test]
    fn test_demo_sequence_is_playable() {
        let config = SequenceConfig::from_ron(DEMO_SEQUENCE).unwrap();
        assert_eq!(config.shots.len(), 5);
        assert_eq!(config.report_defects(), 0);
    }
}
