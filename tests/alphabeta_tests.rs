// Integration tests for the alpha-beta engine
//
// Small endgames are checked against an exhaustive solver that plays every
// free edge, so the engine's choice can be compared with the true optimum.

use std::time::Duration;

use deep_box::alphabeta::{alpha_beta_move, AlphaBeta, ALPHA_MIN, BETA_MAX};
use deep_box::board::{Board, Edge};

const ONLY_EDGE_ONE_FREE: &str =
    "101111111111111111111111111111111111111111111111111111111111111111111111";

fn board_with_free(edges: &[Edge]) -> Board {
    let mut board = Board::full();
    for &e in edges {
        board.set_edge_free(e);
    }
    board
}

/// Best achievable (own boxes - opponent boxes) for the player to move
fn exhaustive_net(board: &mut Board) -> i32 {
    let mut best: Option<i32> = None;
    for edge in board.free_edges() {
        let captured = board.play(edge) as i32;
        let value = if captured > 0 {
            captured + exhaustive_net(board)
        } else {
            -exhaustive_net(board)
        };
        board.set_edge_free(edge);
        best = Some(best.map_or(value, |b| b.max(value)));
    }
    best.unwrap_or(0)
}

/// Net result for the mover of playing `edge` and continuing optimally
fn move_value(board: &Board, edge: Edge) -> i32 {
    let mut board = *board;
    let captured = board.play(edge) as i32;
    if captured > 0 {
        captured + exhaustive_net(&mut board)
    } else {
        -exhaustive_net(&mut board)
    }
}

fn assert_optimal(free: &[Edge]) {
    let board = board_with_free(free);
    let chosen = alpha_beta_move(&board, 20, Duration::from_secs(30));
    assert!(!board.is_edge_taken(chosen), "edge {} is taken", chosen);

    let optimum = exhaustive_net(&mut board.clone());
    assert_eq!(
        move_value(&board, chosen),
        optimum,
        "edge {} is not optimal for free edges {:?}",
        chosen,
        free
    );
}

#[test]
fn test_single_free_edge() {
    let board: Board = ONLY_EDGE_ONE_FREE.parse().unwrap();
    assert_eq!(alpha_beta_move(&board, 14, Duration::from_secs(10)), 1);
}

#[test]
fn test_single_corner_edge_resolves_to_free_partner() {
    // Edge 0 is taken; the outside connection of box 0 must use edge 8
    let board = board_with_free(&[8]);
    assert_eq!(alpha_beta_move(&board, 14, Duration::from_secs(10)), 8);
}

#[test]
fn test_takes_both_boxes_of_a_two_chain() {
    let board = board_with_free(&[9, 1]);
    let outcome = AlphaBeta::new(20, Duration::from_secs(10)).search(&board);

    assert_eq!(outcome.best_move, 9);
    assert_eq!(outcome.score, Some(2));
    assert!(!outcome.timed_out);
    assert!(outcome.stats.nodes_visited > 1);
}

#[test]
fn test_forced_capture_is_only_candidate() {
    let board = board_with_free(&[1, 9, 10, 2]);
    let outcome = AlphaBeta::new(20, Duration::from_secs(10)).search(&board);

    assert_eq!(outcome.best_move, 9);
    assert_eq!(outcome.candidates_searched, 1);
    assert_eq!(outcome.score, Some(1));
}

#[test]
fn test_open_four_chain_is_taken_whole() {
    let board = board_with_free(&[3, 9, 10, 11]);
    let outcome = AlphaBeta::new(20, Duration::from_secs(10)).search(&board);
    assert_eq!(outcome.best_move, 9);
    assert_eq!(outcome.score, Some(4));
}

#[test]
fn test_small_endgames_are_solved_optimally() {
    let positions: [&[Edge]; 8] = [
        &[9, 1],
        &[1, 9, 10, 2],
        &[3, 9, 10, 11],
        &[0, 1, 8, 9],
        &[58, 62, 63, 68],
        &[17, 25, 26, 34],
        &[12, 20, 21, 29],
        &[35, 42, 43, 48],
    ];
    for free in positions.iter() {
        assert_optimal(free);
    }
}

#[test]
fn test_score_stays_within_bounds() {
    let board = board_with_free(&[0, 1, 8, 9]);
    let outcome = AlphaBeta::new(20, Duration::from_secs(10)).search(&board);
    let score = outcome.score.expect("a candidate was searched");
    assert!(score > ALPHA_MIN && score < BETA_MAX);
}

#[test]
fn test_shallow_search_still_returns_free_edge() {
    // Depth 1 leans on the leaf estimate
    let board: Board = "111111111010001011111110001000010111011111111101010011111100001111010011"
        .parse()
        .unwrap();
    let chosen = alpha_beta_move(&board, 1, Duration::from_secs(10));
    assert!(!board.is_edge_taken(chosen));
}

#[test]
fn test_expired_deadline_returns_a_candidate() {
    let board: Board = "111111111010001011111110001000010111011111111101010011111100001111010011"
        .parse()
        .unwrap();
    let outcome = AlphaBeta::new(3, Duration::from_nanos(1)).search(&board);

    assert!(!board.is_edge_taken(outcome.best_move));
    assert_eq!(outcome.candidates_searched, 1);
}
