use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::{ReplayOutcome, replay::Death};

/// Verdict of `POST /api/game/{id}/replay`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReplayResponse {
    /// Always `true`.
    pub success: bool,
    /// Game the run was played on.
    pub id: String,
    /// Pipe pairs passed before the run ended.
    pub score: u32,
    /// `true` when the player survived every recorded frame.
    pub alive: bool,
    /// Frames actually simulated.
    pub frames: u32,
    /// How the run ended, if it did.
    pub death: Option<Death>,
    /// Text the player page shows on the game-over screen for this skin.
    pub game_over_text: String,
}

impl ReplayResponse {
    /// Combine a replay outcome with the skin's game-over text.
    pub fn new(id: String, outcome: ReplayOutcome, game_over_text: String) -> Self {
        Self {
            success: true,
            id,
            score: outcome.score,
            alive: outcome.alive,
            frames: outcome.frames_simulated,
            death: outcome.death,
            game_over_text,
        }
    }
}
