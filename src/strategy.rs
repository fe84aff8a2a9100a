// Move strategies and the dispatcher that picks between them
//
// The scripted strategies are cheap and need no search. DeepBox switches
// engines on the number of free edges: a scripted opening, MCTS through
// the middle game and exhaustive alpha-beta once the endgame is small.

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::alphabeta::alpha_beta_move;
use crate::board::{Board, Edge, BOX_EDGES, EDGE_BOXES, NUM_BOXES};
use crate::config::Config;
use crate::mcts::Mcts;

/// Every strategy the player can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Random,
    FirstBoxCompleting,
    #[serde(rename = "always4_never3")]
    Always4Never3,
    MonteCarlo,
    AlphaBeta,
    DeepBox,
}

impl Strategy {
    pub fn all() -> [Strategy; 6] {
        [
            Strategy::Random,
            Strategy::FirstBoxCompleting,
            Strategy::Always4Never3,
            Strategy::MonteCarlo,
            Strategy::AlphaBeta,
            Strategy::DeepBox,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::FirstBoxCompleting => "first_box_completing",
            Strategy::Always4Never3 => "always4_never3",
            Strategy::MonteCarlo => "monte_carlo",
            Strategy::AlphaBeta => "alpha_beta",
            Strategy::DeepBox => "deep_box",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::all()
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| format!("Unknown strategy '{}'", s))
    }
}

/// A uniformly random free edge
///
/// # Panics
/// If the board has no free edge.
pub fn random_move<R: Rng>(board: &Board, rng: &mut R) -> Edge {
    let free = board.free_edges();
    assert!(!free.is_empty(), "random_move called on a full board");
    free[rng.random_range(0..free.len())]
}

/// Free side of the first box (by index) that already has three taken sides
pub fn first_box_completing_move(board: &Board) -> Option<Edge> {
    (0..NUM_BOXES)
        .filter(|&bx| board.box_taken_edges(bx) == 3)
        .find_map(|bx| {
            BOX_EDGES[bx]
                .iter()
                .copied()
                .find(|&e| !board.is_edge_taken(e))
        })
}

/// Takes a box when one is on offer, otherwise avoids giving any box its
/// third side, otherwise plays at random.
pub fn always4_never3_move<R: Rng>(board: &Board, rng: &mut R) -> Edge {
    if let Some(edge) = first_box_completing_move(board) {
        return edge;
    }

    let safe = board.free_edges().into_iter().find(|&e| {
        EDGE_BOXES[e]
            .iter()
            .flatten()
            .all(|&bx| board.box_taken_edges(bx) <= 1)
    });

    match safe {
        Some(edge) => edge,
        None => random_move(board, rng),
    }
}

/// Engine switch on the number of free edges
pub fn deep_box_move<R: Rng>(
    board: &Board,
    config: &Config,
    turn_time: Duration,
    rng: &mut R,
) -> Edge {
    let free = board.num_free_edges();

    if free <= config.strategy.alpha_beta_max_free_edges {
        info!("{} free edges: using alpha-beta", free);
        alpha_beta_move(
            board,
            config.strategy.alpha_beta_depth,
            config.timing.alpha_beta_deadline(),
        )
    } else if free <= config.strategy.mcts_max_free_edges {
        info!("{} free edges: using MCTS", free);
        monte_carlo_move(board, config, turn_time)
    } else {
        info!("{} free edges: using always4never3", free);
        always4_never3_move(board, rng)
    }
}

fn monte_carlo_move(board: &Board, config: &Config, turn_time: Duration) -> Edge {
    let outcome = Mcts::from_config(&config.mcts).search(board, turn_time);
    crate::simple_profiler::merge_thread_local();
    outcome.best_move
}

/// Picks a move for `board` with the given strategy.
///
/// # Panics
/// If `turn_time` is zero or the board has no free edge.
pub fn choose_move(strategy: Strategy, board: &Board, config: &Config, turn_time: Duration) -> Edge {
    assert!(turn_time > Duration::ZERO, "turn time must be positive");
    assert!(!board.is_terminal(), "no move left on a full board");

    let mut rng = rand::rng();
    match strategy {
        Strategy::Random => random_move(board, &mut rng),
        Strategy::FirstBoxCompleting => {
            first_box_completing_move(board).unwrap_or_else(|| random_move(board, &mut rng))
        }
        Strategy::Always4Never3 => always4_never3_move(board, &mut rng),
        Strategy::MonteCarlo => monte_carlo_move(board, config, turn_time),
        Strategy::AlphaBeta => alpha_beta_move(
            board,
            config.alpha_beta.max_depth,
            config.timing.alpha_beta_deadline(),
        ),
        Strategy::DeepBox => deep_box_move(board, config, turn_time, &mut rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in Strategy::all() {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
        }
        assert!("greedy".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_deserializes_from_snake_case() {
        let parsed: Strategy = serde_json::from_str("\"always4_never3\"").unwrap();
        assert_eq!(parsed, Strategy::Always4Never3);
        let parsed: Strategy = serde_json::from_str("\"deep_box\"").unwrap();
        assert_eq!(parsed, Strategy::DeepBox);
    }
}
