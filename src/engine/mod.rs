//! Headless, deterministic simulation of the side-scrolling dodge game.

/// Axis-aligned rectangles and overlap tests.
pub mod geometry;
/// Physics and difficulty tuning.
pub mod physics;
/// Re-simulation of recorded runs.
pub mod replay;
/// World state and per-frame update rules.
pub mod world;

pub use self::physics::Physics;
pub use self::replay::{ReplayError, ReplayLog, ReplayOutcome, replay};
pub use self::world::{Canvas, DeathCause, SpriteSize, StepOutcome, World};
