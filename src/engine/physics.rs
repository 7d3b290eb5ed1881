//! Tuning constants for the side-scroller simulation.

use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Smallest edge (pixels) a player box may have.
pub const MIN_PLAYER_SIZE: f64 = 28.0;
/// Smallest width (pixels) of a pipe column.
pub const MIN_PIPE_WIDTH: f64 = 40.0;
/// Smallest height (pixels) of the top pipe of a pair.
pub const MIN_TOP_HEIGHT: f64 = 40.0;
/// Lower bound for the highest top pipe of a pair.
pub const MIN_MAX_TOP: f64 = 80.0;
/// Space kept free under the bottom of a gap when choosing its position.
pub const FLOOR_MARGIN: f64 = 120.0;
/// Distance past the right edge where new pipes appear.
pub const SPAWN_OFFSET: f64 = 20.0;
/// Pipes whose right edge moves beyond this x coordinate are discarded.
pub const DESPAWN_X: f64 = -60.0;

/// Physics and difficulty tuning applied on every simulation step.
///
/// All distances are in canvas pixels and all durations in seconds. Every
/// field can be overridden from the configuration file; missing fields keep
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct Physics {
    /// Downward acceleration (px/s²).
    pub gravity: f64,
    /// Vertical velocity set by a flap (px/s, negative is up).
    pub flap_velocity: f64,
    /// Terminal falling speed (px/s).
    pub max_fall_speed: f64,
    /// Horizontal pipe speed at the start of a run (px/s).
    pub pipe_speed_base: f64,
    /// Increase of the pipe speed per second (px/s²).
    pub pipe_acceleration: f64,
    /// Vertical opening between a pipe pair at the start of a run (px).
    pub gap: f64,
    /// The opening never shrinks below this value (px).
    pub min_gap: f64,
    /// Shrink rate of the opening (px/s).
    pub gap_shrink: f64,
    /// Delay between two pipe pairs (s).
    pub spawn_interval: f64,
    /// Fixed horizontal position of the player (px).
    pub player_x: f64,
    /// Player width relative to the canvas width.
    pub player_width_ratio: f64,
    /// Pipe width relative to the canvas width.
    pub pipe_width_ratio: f64,
    /// Longest step a single frame may simulate (s).
    pub max_frame_step: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            flap_velocity: -320.0,
            max_fall_speed: 900.0,
            pipe_speed_base: 140.0,
            pipe_acceleration: 0.02,
            gap: 180.0,
            min_gap: 110.0,
            gap_shrink: 0.01,
            spawn_interval: 1.6,
            player_x: 90.0,
            player_width_ratio: 0.14,
            pipe_width_ratio: 0.16,
            max_frame_step: 0.05,
        }
    }
}

/// A tuning value that would stall or break the simulation.
#[derive(Debug, Error, PartialEq)]
#[error("invalid physics tuning: {0}")]
pub struct InvalidPhysics(&'static str);

impl Physics {
    /// Reject tunings the world cannot run with.
    pub fn validate(&self) -> Result<(), InvalidPhysics> {
        let values = [
            self.gravity,
            self.flap_velocity,
            self.max_fall_speed,
            self.pipe_speed_base,
            self.pipe_acceleration,
            self.gap,
            self.min_gap,
            self.gap_shrink,
            self.spawn_interval,
            self.player_x,
            self.player_width_ratio,
            self.pipe_width_ratio,
            self.max_frame_step,
        ];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(InvalidPhysics("every value must be finite"));
        }
        if self.max_frame_step <= 0.0 {
            return Err(InvalidPhysics("max_frame_step must be positive"));
        }
        if self.spawn_interval <= 0.0 {
            return Err(InvalidPhysics("spawn_interval must be positive"));
        }
        if self.min_gap < 0.0 || self.min_gap > self.gap {
            return Err(InvalidPhysics("min_gap must be between 0 and gap"));
        }
        if self.player_width_ratio <= 0.0 || self.pipe_width_ratio <= 0.0 {
            return Err(InvalidPhysics("size ratios must be positive"));
        }
        Ok(())
    }

    /// Clamp a raw frame delta to the range a single step may cover.
    pub fn clamp_step(&self, dt: f64) -> f64 {
        if dt.is_nan() {
            return 0.0;
        }
        dt.min(self.max_frame_step).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let physics: Physics = serde_json::from_str(r#"{"gravity": 1200.0}"#).unwrap();
        assert_eq!(physics.gravity, 1200.0);
        assert_eq!(physics.flap_velocity, Physics::default().flap_velocity);
        assert_eq!(physics.spawn_interval, 1.6);
    }

    #[test]
    fn clamp_step_bounds_large_and_negative_deltas() {
        let physics = Physics::default();
        assert_eq!(physics.clamp_step(0.5), 0.05);
        assert_eq!(physics.clamp_step(-1.0), 0.0);
        assert_eq!(physics.clamp_step(f64::NAN), 0.0);
        assert_eq!(physics.clamp_step(0.016), 0.016);
    }

    #[test]
    fn clamp_step_survives_a_non_positive_maximum() {
        let physics = Physics {
            max_frame_step: -0.01,
            ..Physics::default()
        };
        assert_eq!(physics.clamp_step(0.016), 0.0);
    }

    #[test]
    fn validate_rejects_unusable_tunings() {
        assert!(Physics::default().validate().is_ok());
        let broken = [
            Physics {
                max_frame_step: -0.01,
                ..Physics::default()
            },
            Physics {
                spawn_interval: 0.0,
                ..Physics::default()
            },
            Physics {
                min_gap: 300.0,
                ..Physics::default()
            },
            Physics {
                pipe_width_ratio: 0.0,
                ..Physics::default()
            },
            Physics {
                gravity: f64::INFINITY,
                ..Physics::default()
            },
        ];
        for physics in broken {
            assert!(physics.validate().is_err(), "{physics:?}");
        }
    }
}
