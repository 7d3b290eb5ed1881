//! Deterministic re-simulation of a recorded run.
//!
//! A client records the seed it played with, the fixed frame duration and the
//! frame indices at which the player flapped. Replaying the log through
//! [`World`] reproduces the run exactly, which lets the backend confirm a
//! reported score.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{
    physics::Physics,
    world::{Canvas, DeathCause, SpriteSize, StepOutcome, World},
};

/// One hour of play at 60 frames per second.
pub const MAX_FRAMES: u32 = 216_000;
/// Frame duration assumed when the log does not specify one.
pub const DEFAULT_FRAME_MS: u32 = 16;
/// Longest frame a log may declare, matching the per-step clamp.
pub const MAX_FRAME_MS: u32 = 50;
/// Largest canvas edge (pixels) a log may declare.
pub const MAX_CANVAS_EDGE: f64 = 4096.0;

fn default_frame_ms() -> u32 {
    DEFAULT_FRAME_MS
}

/// Recorded input of a single run.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReplayLog {
    /// Seed of the pipe layout PRNG.
    pub seed: u64,
    /// Canvas the run was played on.
    pub canvas: Canvas,
    /// Natural size of the player sprite, when it was known.
    #[serde(default)]
    pub sprite: Option<SpriteSize>,
    /// Fixed duration of every frame in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,
    /// Number of frames to simulate.
    pub frames: u32,
    /// Strictly increasing frame indices at which the player flapped.
    #[serde(default)]
    pub flaps: Vec<u32>,
}

/// Frame and reason of the death that ended a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Death {
    /// Zero-based index of the fatal frame.
    pub frame: u32,
    /// What ended the run.
    pub cause: DeathCause,
}

/// Result of replaying a [`ReplayLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReplayOutcome {
    /// Pipe pairs passed.
    pub score: u32,
    /// True when the player survived every frame of the log.
    pub alive: bool,
    /// Frames stepped, including the fatal one.
    pub frames_simulated: u32,
    /// Set when the run ended before the last frame.
    pub death: Option<Death>,
}

/// Reasons a log is rejected before simulation.
#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error("frame count must be between 1 and {MAX_FRAMES} (got {0})")]
    FrameCount(u32),
    #[error("frame duration must be between 1 and {MAX_FRAME_MS} ms (got {0})")]
    FrameDuration(u32),
    #[error("canvas edges must be between 1 and {MAX_CANVAS_EDGE} px (got {width}x{height})")]
    Canvas { width: f64, height: f64 },
    #[error("flaps must be strictly increasing (index {index})")]
    UnorderedFlaps { index: usize },
    #[error("flap at frame {frame} is beyond the last frame {last}")]
    FlapOutOfRange { frame: u32, last: u32 },
}

impl ReplayLog {
    /// Check the log is well formed and bounded.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.frames == 0 || self.frames > MAX_FRAMES {
            return Err(ReplayError::FrameCount(self.frames));
        }
        if self.frame_ms == 0 || self.frame_ms > MAX_FRAME_MS {
            return Err(ReplayError::FrameDuration(self.frame_ms));
        }
        let Canvas { width, height } = self.canvas;
        let edge = 1.0..=MAX_CANVAS_EDGE;
        if !edge.contains(&width) || !edge.contains(&height) {
            return Err(ReplayError::Canvas { width, height });
        }
        if let Some(index) = self
            .flaps
            .windows(2)
            .position(|pair| pair[0] >= pair[1])
        {
            return Err(ReplayError::UnorderedFlaps { index: index + 1 });
        }
        if let Some(&frame) = self.flaps.last() {
            if frame >= self.frames {
                return Err(ReplayError::FlapOutOfRange {
                    frame,
                    last: self.frames - 1,
                });
            }
        }
        Ok(())
    }
}

/// Validate and re-simulate `log`. The run stops at the first death; flaps
/// recorded afterwards are ignored.
pub fn replay(log: &ReplayLog, physics: &Physics) -> Result<ReplayOutcome, ReplayError> {
    log.validate()?;

    let mut world = World::new(log.canvas, *physics, log.sprite, log.seed);
    let dt = f64::from(log.frame_ms) / 1000.0;
    let mut flaps = log.flaps.iter().copied().peekable();

    for frame in 0..log.frames {
        if flaps.next_if_eq(&frame).is_some() {
            world.flap();
        }
        if let StepOutcome::Died(cause) = world.step(dt) {
            return Ok(ReplayOutcome {
                score: world.score(),
                alive: false,
                frames_simulated: frame + 1,
                death: Some(Death { frame, cause }),
            });
        }
    }

    Ok(ReplayOutcome {
        score: world.score(),
        alive: true,
        frames_simulated: log.frames,
        death: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(frames: u32, flaps: Vec<u32>) -> ReplayLog {
        ReplayLog {
            seed: 9,
            canvas: Canvas::new(400.0, 600.0),
            sprite: None,
            frame_ms: DEFAULT_FRAME_MS,
            frames,
            flaps,
        }
    }

    /// Play a live session that flaps whenever the player sinks below the
    /// middle of the canvas, recording the flap frames.
    fn hover_session(frames: u32) -> (Vec<u32>, World) {
        let physics = Physics::default();
        let canvas = Canvas::new(400.0, 600.0);
        let mut world = World::new(canvas, physics, None, 9);
        let mut flaps = Vec::new();
        for frame in 0..frames {
            if world.is_dead() {
                break;
            }
            if world.player().body.y > canvas.height / 2.0 {
                flaps.push(frame);
                world.flap();
            }
            world.step(f64::from(DEFAULT_FRAME_MS) / 1000.0);
        }
        (flaps, world)
    }

    #[test]
    fn rejects_malformed_logs() {
        assert_eq!(log(0, vec![]).validate(), Err(ReplayError::FrameCount(0)));
        assert_eq!(
            log(MAX_FRAMES + 1, vec![]).validate(),
            Err(ReplayError::FrameCount(MAX_FRAMES + 1))
        );
        assert_eq!(
            log(10, vec![1, 1]).validate(),
            Err(ReplayError::UnorderedFlaps { index: 1 })
        );
        assert_eq!(
            log(10, vec![3, 2]).validate(),
            Err(ReplayError::UnorderedFlaps { index: 1 })
        );
        assert_eq!(
            log(10, vec![2, 10]).validate(),
            Err(ReplayError::FlapOutOfRange { frame: 10, last: 9 })
        );

        let mut slow = log(10, vec![]);
        slow.frame_ms = 51;
        assert_eq!(slow.validate(), Err(ReplayError::FrameDuration(51)));

        let mut flat = log(10, vec![]);
        flat.canvas = Canvas::new(400.0, 0.0);
        assert!(matches!(flat.validate(), Err(ReplayError::Canvas { .. })));

        let mut huge = log(10, vec![]);
        huge.canvas = Canvas::new(1e9, 1e9);
        assert!(matches!(huge.validate(), Err(ReplayError::Canvas { .. })));

        let mut tall = log(10, vec![]);
        tall.canvas = Canvas::new(400.0, MAX_CANVAS_EDGE + 1.0);
        assert!(matches!(tall.validate(), Err(ReplayError::Canvas { .. })));

        let mut widest = log(10, vec![]);
        widest.canvas = Canvas::new(MAX_CANVAS_EDGE, MAX_CANVAS_EDGE);
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn no_input_falls_to_the_floor() {
        let outcome = replay(&log(600, vec![]), &Physics::default()).unwrap();
        assert!(!outcome.alive);
        assert_eq!(outcome.score, 0);
        let death = outcome.death.unwrap();
        assert_eq!(death.cause, DeathCause::Floor);
        assert_eq!(outcome.frames_simulated, death.frame + 1);
        assert!(death.frame < 100);
    }

    #[test]
    fn hovering_survives_short_log() {
        let (flaps, world) = hover_session(100);
        assert!(!world.is_dead());
        assert!(!flaps.is_empty());

        let outcome = replay(&log(100, flaps), &Physics::default()).unwrap();
        assert!(outcome.alive);
        assert_eq!(outcome.frames_simulated, 100);
        assert_eq!(outcome.death, None);
    }

    #[test]
    fn replay_matches_live_session() {
        let (flaps, world) = hover_session(2_000);
        let outcome = replay(&log(2_000, flaps), &Physics::default()).unwrap();
        assert_eq!(outcome.score, world.score());
        assert_eq!(outcome.alive, !world.is_dead());
    }

    #[test]
    fn flaps_after_death_are_ignored() {
        let baseline = replay(&log(600, vec![]), &Physics::default()).unwrap();
        let death = baseline.death.unwrap();
        let late = replay(&log(600, vec![death.frame + 1, 599]), &Physics::default()).unwrap();
        assert_eq!(late, baseline);
    }
}
