// Monte Carlo tree search with UCT selection and random playouts
//
// The tree lives in an arena owned by one search call: nodes refer to
// their parent and children by index and the whole arena is dropped when
// the move is chosen. A node's score is the share of boxes its mover won
// from the position it moved in, so UCT at every level compares children
// from the point of view of the player choosing between them.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::board::{Board, Edge};
use crate::config::MctsConfig;
use crate::simple_profiler::{self, ProfileGuard};

/// Exploration weight used by `mcts_move`
pub const DEFAULT_EXPLORATION: f64 = 0.7;

type NodeId = usize;

const ROOT: NodeId = 0;

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

#[derive(Debug)]
struct Node {
    /// Edge played to reach this node; `None` at the root
    edge: Option<Edge>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Board after `edge` was played
    board: Board,
    player_just_moved: Option<Player>,
    next_to_move: Player,
    /// Boxes completed by `edge`
    boxes_captured: usize,
    untried_moves: Vec<Edge>,
    visits: u64,
    /// Sum of rewards for `player_just_moved`
    score: f64,
}

impl Node {
    fn new(
        edge: Option<Edge>,
        parent: Option<NodeId>,
        board: Board,
        player_just_moved: Option<Player>,
        next_to_move: Player,
        boxes_captured: usize,
    ) -> Self {
        Node {
            edge,
            parent,
            children: Vec::new(),
            board,
            player_just_moved,
            next_to_move,
            boxes_captured,
            untried_moves: board.free_edges(),
            visits: 0,
            score: 0.0,
        }
    }

    fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }
}

/// Visit statistics for one root child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub edge: Edge,
    pub visits: u64,
    pub average_score: f64,
}

/// Result of one search
#[derive(Debug, Clone, PartialEq)]
pub struct MctsOutcome {
    pub best_move: Edge,
    pub iterations: u64,
    pub root_visits: u64,
    /// Root children in creation order
    pub children: Vec<ChildStats>,
}

/// UCT searcher. Holds its random source so seeded searches repeat exactly.
pub struct Mcts {
    exploration: f64,
    max_iterations: Option<u64>,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl Mcts {
    /// Creates a searcher seeded from the operating system
    pub fn new(exploration: f64) -> Self {
        Mcts {
            exploration,
            max_iterations: None,
            rng: StdRng::from_os_rng(),
            nodes: Vec::new(),
        }
    }

    /// Creates a searcher from the `[mcts]` configuration section
    pub fn from_config(config: &MctsConfig) -> Self {
        let mut mcts = Mcts::new(config.exploration_constant);
        if let Some(seed) = config.seed {
            mcts = mcts.with_seed(seed);
        }
        mcts.max_iterations = config.max_iterations;
        mcts
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Stops after `max_iterations` even when time remains
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Runs UCT iterations on a copy of `board` until `runtime` elapses.
    /// At least one iteration always runs.
    ///
    /// # Panics
    /// If `runtime` is zero or the board has no free edge.
    pub fn search(&mut self, board: &Board, runtime: Duration) -> MctsOutcome {
        assert!(runtime > Duration::ZERO, "MCTS runtime must be positive");
        assert!(!board.is_terminal(), "MCTS called on a full board");

        let start = Instant::now();
        self.nodes.clear();
        self.nodes
            .push(Node::new(None, None, *board, None, Player::One, 0));

        let mut iterations = 0u64;
        loop {
            self.iterate();
            iterations += 1;

            if start.elapsed() >= runtime {
                break;
            }
            if self.max_iterations.map_or(false, |max| iterations >= max) {
                break;
            }
        }

        let children = self.root_children();
        let best_move = self.most_visited_child();

        info!(
            "MCTS chose edge {} ({} iterations, {} root children, time: {}ms)",
            best_move,
            iterations,
            children.len(),
            start.elapsed().as_millis()
        );

        MctsOutcome {
            best_move,
            iterations,
            root_visits: self.nodes[ROOT].visits,
            children,
        }
    }

    /// One select, expand, simulate and backpropagate pass
    fn iterate(&mut self) {
        let mut node = ROOT;
        while self.nodes[node].is_fully_expanded() && !self.nodes[node].children.is_empty() {
            node = self.select_child(node);
        }

        if !self.nodes[node].is_fully_expanded() {
            node = self.expand(node);
        }

        let captures = self.rollout(node);
        self.backpropagate(node, captures);
    }

    /// Child with the highest UCB1 value
    fn select_child(&self, parent: NodeId) -> NodeId {
        let parent_node = &self.nodes[parent];
        let log_parent_visits = (parent_node.visits as f64).ln();

        let mut best = parent_node.children[0];
        let mut best_value = f64::NEG_INFINITY;
        for &child in &parent_node.children {
            let c = &self.nodes[child];
            let visits = c.visits as f64;
            let ucb = c.score / visits
                + self.exploration * (2.0 * log_parent_visits / visits).sqrt();
            if ucb > best_value {
                best_value = ucb;
                best = child;
            }
        }
        best
    }

    /// Adds a child for one untried move picked at random
    fn expand(&mut self, parent: NodeId) -> NodeId {
        let untried = &mut self.nodes[parent].untried_moves;
        let pick = self.rng.random_range(0..untried.len());
        let edge = untried.swap_remove(pick);

        let parent_node = &self.nodes[parent];
        let mover = parent_node.next_to_move;
        let mut board = parent_node.board;
        let captured = board.play(edge);
        let next = if captured > 0 { mover } else { mover.other() };

        let id = self.nodes.len();
        self.nodes
            .push(Node::new(Some(edge), Some(parent), board, Some(mover), next, captured));
        self.nodes[parent].children.push(id);
        id
    }

    /// Plays random edges to the end of the game and returns the boxes
    /// each player captured on the way
    fn rollout(&mut self, from: NodeId) -> [usize; 2] {
        let _guard = ProfileGuard::new("rollout");

        let mut board = self.nodes[from].board;
        let mut player = self.nodes[from].next_to_move;
        let mut free = board.free_edges();
        let mut captures = [0usize; 2];

        while !free.is_empty() {
            let pick = self.rng.random_range(0..free.len());
            let edge = free.swap_remove(pick);
            let captured = board.play(edge);
            if captured > 0 {
                captures[player.index()] += captured;
            } else {
                player = player.other();
            }
        }

        captures
    }

    /// Walks back to the root. Each node is credited with the share of
    /// boxes its mover took from the position before its move onward.
    fn backpropagate(&mut self, leaf: NodeId, mut captures: [usize; 2]) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = &mut self.nodes[id];
            node.visits += 1;

            if let Some(mover) = node.player_just_moved {
                captures[mover.index()] += node.boxes_captured;
                let total = captures[0] + captures[1];
                let reward = if total == 0 {
                    0.5
                } else {
                    captures[mover.index()] as f64 / total as f64
                };
                node.score += reward;
            }

            current = node.parent;
        }
    }

    fn root_children(&self) -> Vec<ChildStats> {
        self.nodes[ROOT]
            .children
            .iter()
            .filter_map(|&child| {
                let c = &self.nodes[child];
                c.edge.map(|edge| ChildStats {
                    edge,
                    visits: c.visits,
                    average_score: if c.visits > 0 {
                        c.score / c.visits as f64
                    } else {
                        0.0
                    },
                })
            })
            .collect()
    }

    /// Most visited root child; the earliest created wins ties
    fn most_visited_child(&self) -> Edge {
        let mut best: Option<(Edge, u64)> = None;
        for &child in &self.nodes[ROOT].children {
            let c = &self.nodes[child];
            debug!("Root child edge {:?}: {} visits", c.edge, c.visits);
            if let Some(edge) = c.edge {
                if best.map_or(true, |(_, visits)| c.visits > visits) {
                    best = Some((edge, c.visits));
                }
            }
        }

        match best {
            Some((edge, _)) => edge,
            // At least one iteration ran on a non-terminal board, so the
            // root has a child; this only guards the arithmetic above.
            None => self.nodes[ROOT].board.free_edges()[0],
        }
    }
}

/// Chooses an edge with MCTS running for `runtime`.
///
/// # Panics
/// If `runtime` is zero or the board has no free edge.
pub fn mcts_move(board: &Board, runtime: Duration) -> Edge {
    let outcome = Mcts::new(DEFAULT_EXPLORATION).search(board, runtime);
    simple_profiler::merge_thread_local();
    outcome.best_move
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_alternation() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other().other(), Player::Two);
    }

    #[test]
    fn test_rollout_captures_every_remaining_box() {
        let mut mcts = Mcts::new(DEFAULT_EXPLORATION).with_seed(7);
        mcts.nodes
            .push(Node::new(None, None, Board::new(), None, Player::One, 0));
        let captures = mcts.rollout(ROOT);
        assert_eq!(captures[0] + captures[1], 28);
    }

    #[test]
    fn test_backpropagation_credits_mover() {
        let mut mcts = Mcts::new(DEFAULT_EXPLORATION).with_seed(1);
        let mut board = Board::full();
        board.set_edge_free(1);
        mcts.nodes.push(Node::new(None, None, board, None, Player::One, 0));
        let child = mcts.expand(ROOT);

        // Edge 1 completes box 1 for player one, nothing left to roll out
        mcts.backpropagate(child, [0, 0]);
        assert_eq!(mcts.nodes[child].visits, 1);
        assert_eq!(mcts.nodes[child].score, 1.0);
        assert_eq!(mcts.nodes[ROOT].visits, 1);
    }
}
