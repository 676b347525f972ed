use serde::{Deserialize, Serialize};

use crate::domain::{HoleIndex, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameCommand {
    StartGame,
    RestartGame,
    WhackMole,
    HitHole { hole: HoleIndex },
}

impl GameCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GameCommand::StartGame => "start_game",
            GameCommand::RestartGame => "restart_game",
            GameCommand::WhackMole => "whack_mole",
            GameCommand::HitHole { .. } => "hit_hole",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitOutcome {
    Hit,
    Miss,
    Inactive,
}

/// Read-only projection of a game session handed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub score: u32,
    pub mole_position: HoleIndex,
    pub time_left: u32,
    pub active: bool,
    pub high_scores: Vec<u32>,
}

impl SessionSnapshot {
    pub fn top_scores(&self, limit: usize) -> &[u32] {
        &self.high_scores[..self.high_scores.len().min(limit)]
    }

    pub fn has_mole(&self, hole: HoleIndex) -> bool {
        self.mole_position == hole
    }
}
