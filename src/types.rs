// Move service API types
//
// Boards travel as 72-character strings, one character per edge,
// '0' for a free edge and anything else for a taken one.

use serde::{Deserialize, Serialize};

use crate::board::Edge;

/// Body of POST /start and POST /end
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GameRequest {
    #[serde(default)]
    pub game_id: Option<String>,
}

/// Body of POST /move
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MoveRequest {
    #[serde(default)]
    pub game_id: Option<String>,
    /// Move number within the game, used only for logging
    #[serde(default)]
    pub turn: u32,
    pub board: String,
    /// Time budget for this move; the configured turn time when absent
    #[serde(default)]
    pub turn_time_ms: Option<u64>,
}

/// Reply to POST /move
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub edge: Edge,
}
