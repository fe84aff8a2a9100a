// Depth-limited alpha-beta search over board edges
//
// Candidates come from the endgame classifier (urgent moves, or one move
// per isomorphism class of the resulting region graph). Capturing keeps
// the turn, so whether a node maximizes is tracked per node rather than
// derived from depth parity. Only the root loop watches the clock.

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::board::{Board, Edge};
use crate::endgame::{potential_moves, resolve_forced_sequence};
use crate::graph::{RegionGraph, OUTSIDE};
use crate::simple_profiler::{self, ProfileGuard};

/// Stands in for minus infinity; no real score gets near it
pub const ALPHA_MIN: i32 = -100;
/// Stands in for plus infinity
pub const BETA_MAX: i32 = 100;

/// Counters collected during one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub branches_pruned: u64,
}

/// Result of a root search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Edge,
    /// Root value, or `None` when the deadline hit before any candidate improved it
    pub score: Option<i32>,
    /// Candidates searched before the loop ended
    pub candidates_searched: usize,
    pub timed_out: bool,
    pub stats: SearchStats,
}

/// Per-node search window and bookkeeping
#[derive(Debug, Clone, Copy)]
struct NodeState {
    depth: u32,
    alpha: i32,
    beta: i32,
    /// Boxes captured by the maximizer on the path to this node
    boxes_taken: i32,
    is_maximizer: bool,
}

/// Alpha-beta searcher for a single decision
pub struct AlphaBeta {
    max_depth: u32,
    deadline: Duration,
    stats: SearchStats,
}

impl AlphaBeta {
    /// Creates a searcher bounded by `max_depth` plies and a root deadline
    pub fn new(max_depth: u32, deadline: Duration) -> Self {
        AlphaBeta {
            max_depth,
            deadline,
            stats: SearchStats::default(),
        }
    }

    /// Searches `board` and returns the chosen move with its statistics.
    /// The caller's board is copied, never modified.
    ///
    /// # Panics
    /// If the board has no free edge.
    pub fn search(&mut self, board: &Board) -> SearchOutcome {
        assert!(!board.is_terminal(), "alpha-beta called on a full board");

        let _guard = ProfileGuard::new("alpha_beta");
        self.stats = SearchStats::default();
        let start = Instant::now();

        let mut state = *board;
        let graph = RegionGraph::from_board(&state);
        let candidates = ordered_candidates(&state, &graph);
        assert!(!candidates.is_empty(), "no candidate moves on a non-terminal board");

        self.stats.nodes_visited += 1;

        let root = NodeState {
            depth: self.max_depth,
            alpha: ALPHA_MIN,
            beta: BETA_MAX,
            boxes_taken: 0,
            is_maximizer: true,
        };

        let mut value = ALPHA_MIN;
        let mut best_move = None;
        let mut alpha = root.alpha;
        let mut candidates_searched = 0;
        let mut timed_out = false;

        for &edge in &candidates {
            let v = self.search_child(&mut state, root, alpha, root.beta, edge, candidates.len());
            candidates_searched += 1;
            debug!("Checked candidate edge {}, score {}", edge, v);

            if v > value {
                value = v;
                best_move = Some(edge);
            }
            alpha = alpha.max(v);
            if root.beta <= alpha {
                self.stats.branches_pruned += 1;
                simple_profiler::record_alpha_beta_cutoff();
                break;
            }

            if start.elapsed() > self.deadline {
                info!(
                    "Alpha-beta deadline of {}ms reached after {} of {} candidates",
                    self.deadline.as_millis(),
                    candidates_searched,
                    candidates.len()
                );
                timed_out = true;
                break;
            }
        }

        let score = best_move.map(|_| value);
        let best_move = best_move.unwrap_or(candidates[0]);

        info!(
            "Alpha-beta chose edge {} (score: {:?}, nodes: {}, pruned: {}, time: {}ms)",
            best_move,
            score,
            self.stats.nodes_visited,
            self.stats.branches_pruned,
            start.elapsed().as_millis()
        );

        SearchOutcome {
            best_move,
            score,
            candidates_searched,
            timed_out,
            stats: self.stats,
        }
    }

    /// Plays `edge` from a node, searches the child and undoes the move
    fn search_child(
        &mut self,
        state: &mut Board,
        parent: NodeState,
        alpha: i32,
        beta: i32,
        edge: Edge,
        num_candidates: usize,
    ) -> i32 {
        debug_assert!(!state.is_edge_taken(edge), "candidate edge {} already taken", edge);

        let captured = state.play(edge) as i32;
        let captured_any = captured > 0;

        let child = NodeState {
            // A lone candidate continues a forced line, so it costs no depth
            depth: if num_candidates == 1 {
                parent.depth
            } else {
                parent.depth.saturating_sub(1)
            },
            alpha,
            beta,
            boxes_taken: if parent.is_maximizer {
                parent.boxes_taken + captured
            } else {
                parent.boxes_taken
            },
            is_maximizer: parent.is_maximizer == captured_any,
        };

        let v = self.search_node(state, child);
        state.set_edge_free(edge);
        v
    }

    fn search_node(&mut self, state: &mut Board, node: NodeState) -> i32 {
        self.stats.nodes_visited += 1;

        if state.is_terminal() {
            return node.boxes_taken;
        }
        if node.depth == 0 {
            return evaluate_leaf(state, node.boxes_taken, node.is_maximizer);
        }

        let graph = RegionGraph::from_board(state);
        let candidates = ordered_candidates(state, &graph);

        let mut value = if node.is_maximizer { ALPHA_MIN } else { BETA_MAX };
        let mut alpha = node.alpha;
        let mut beta = node.beta;

        for &edge in &candidates {
            let v = self.search_child(state, node, alpha, beta, edge, candidates.len());

            if node.is_maximizer {
                value = value.max(v);
                alpha = alpha.max(v);
            } else {
                value = value.min(v);
                beta = beta.min(v);
            }

            if beta <= alpha {
                self.stats.branches_pruned += 1;
                simple_profiler::record_alpha_beta_cutoff();
                break;
            }
        }

        debug_assert!(
            (ALPHA_MIN..=BETA_MAX).contains(&value),
            "node value {} outside score bounds",
            value
        );
        value
    }
}

/// Leaf estimate: plays out the single forced moves, credits them to the
/// maximizer when it is the one moving, then splits the rest evenly.
fn evaluate_leaf(state: &Board, boxes_taken: i32, is_maximizer: bool) -> i32 {
    let _guard = ProfileGuard::new("leaf_eval");

    let graph = RegionGraph::from_board(state);
    let (resolved, remaining) = resolve_forced_sequence(&graph);

    let mut score = boxes_taken;
    if is_maximizer {
        score += resolved as i32;
    }
    score + (remaining / 2) as i32
}

/// Candidate edges for a node, ordered good, bad, then terrible.
/// A move is worse for each endpoint it leaves with a third taken side.
fn ordered_candidates(state: &Board, graph: &RegionGraph) -> Vec<Edge> {
    let mut tiers: [Vec<Edge>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for connection in potential_moves(graph) {
        let edge = match state.edge_for(connection) {
            Some(e) if !state.is_edge_taken(e) => e,
            _ => continue,
        };

        let badness = [connection.a, connection.b]
            .iter()
            .map(|&region| graph.node_of(region).unwrap_or(OUTSIDE))
            .filter(|&node| graph.degree(node) == 2)
            .count();
        tiers[badness].push(edge);
    }

    let [good, bad, terrible] = tiers;
    good.into_iter().chain(bad).chain(terrible).collect()
}

/// Chooses an edge with alpha-beta search.
///
/// # Arguments
/// * `board` - Current board; must have at least one free edge
/// * `max_depth` - Plies searched before the leaf estimate takes over
/// * `deadline` - Wall-clock budget for the root loop
///
/// # Returns
/// A free edge (after corner substitution)
pub fn alpha_beta_move(board: &Board, max_depth: u32, deadline: Duration) -> Edge {
    let outcome = AlphaBeta::new(max_depth, deadline).search(board);
    simple_profiler::merge_thread_local();
    outcome.best_move
}
