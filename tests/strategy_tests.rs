// Integration tests for the scripted strategies and the dispatcher

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use deep_box::board::{Board, Edge};
use deep_box::config::Config;
use deep_box::strategy::{
    always4_never3_move, choose_move, deep_box_move, first_box_completing_move, random_move,
    Strategy,
};

const THREE_SIDED_BOX_ONE: &str =
    "010100000101000000101000000000000000000000000000000000000000000000000000";

const ONLY_EDGE_FOUR_FREE: &str =
    "111101111111111111111111111111111111111111111111111111111111111111111111";

const EDGES_ONE_AND_TWO_FREE: &str =
    "100111111111111111111111111111111111111111111111111111111111111111111111";

const SCATTERED_BOARD: &str =
    "111111111010001011111110001000010111011111111101010011111100001111010011";

const LOOP_BOARD: &str =
    "111111111111011111110011111110111111111111111111111111111111111111111111";

fn board_with_free(edges: &[Edge]) -> Board {
    let mut board = Board::full();
    for &e in edges {
        board.set_edge_free(e);
    }
    board
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
}

#[test]
fn test_random_move_single_option() {
    let board: Board = ONLY_EDGE_FOUR_FREE.parse().unwrap();
    assert_eq!(random_move(&board, &mut rng()), 4);
}

#[test]
fn test_random_move_stays_on_free_edges() {
    let board: Board = EDGES_ONE_AND_TWO_FREE.parse().unwrap();
    let mut rng = rng();
    for _ in 0..50 {
        let edge = random_move(&board, &mut rng);
        assert!(edge == 1 || edge == 2, "unexpected edge {}", edge);
    }
}

#[test]
#[should_panic]
fn test_random_move_rejects_full_board() {
    random_move(&Board::full(), &mut rng());
}

#[test]
fn test_first_box_completing_finds_missing_side() {
    let board: Board = THREE_SIDED_BOX_ONE.parse().unwrap();
    assert_eq!(first_box_completing_move(&board), Some(10));
}

#[test]
fn test_first_box_completing_without_candidate() {
    assert_eq!(first_box_completing_move(&Board::new()), None);
}

#[test]
fn test_always4_never3_prefers_capture() {
    let board: Board = THREE_SIDED_BOX_ONE.parse().unwrap();
    assert_eq!(always4_never3_move(&board, &mut rng()), 10);
}

#[test]
fn test_always4_never3_opens_with_first_safe_edge() {
    assert_eq!(always4_never3_move(&Board::new(), &mut rng()), 0);
}

#[test]
fn test_always4_never3_falls_back_to_random() {
    // Every free edge of the loop gives two boxes a third side
    let board: Board = LOOP_BOARD.parse().unwrap();
    let mut rng = rng();
    for _ in 0..20 {
        let edge = always4_never3_move(&board, &mut rng);
        assert!([12, 20, 21, 29].contains(&edge), "unexpected edge {}", edge);
    }
}

#[test]
fn test_deep_box_opening_uses_scripted_play() {
    let config = Config::default_hardcoded();
    let edge = deep_box_move(&Board::new(), &config, Duration::from_millis(100), &mut rng());
    assert_eq!(edge, 0);
}

#[test]
fn test_deep_box_endgame_uses_alpha_beta() {
    let config = Config::default_hardcoded();
    let board = board_with_free(&[9, 1]);
    let edge = deep_box_move(&board, &config, Duration::from_millis(100), &mut rng());
    assert_eq!(edge, 9);
}

#[test]
fn test_deep_box_middle_game_uses_mcts() {
    let mut config = Config::default_hardcoded();
    config.mcts.max_iterations = Some(500);
    config.mcts.seed = Some(3);

    let board: Board = SCATTERED_BOARD.parse().unwrap();
    assert!(board.num_free_edges() > config.strategy.alpha_beta_max_free_edges);
    assert!(board.num_free_edges() <= config.strategy.mcts_max_free_edges);

    let edge = deep_box_move(&board, &config, Duration::from_secs(30), &mut rng());
    assert!(!board.is_edge_taken(edge));
}

#[test]
fn test_choose_move_every_strategy_returns_free_edge() {
    let mut config = Config::default_hardcoded();
    config.mcts.max_iterations = Some(200);

    let board = board_with_free(&[9, 1]);
    for strategy in Strategy::all().iter().copied() {
        let edge = choose_move(strategy, &board, &config, Duration::from_millis(200));
        assert!(
            edge == 9 || edge == 1,
            "{} chose taken edge {}",
            strategy,
            edge
        );
    }
}

#[test]
fn test_choose_move_first_box_completing_falls_back() {
    let config = Config::default_hardcoded();
    let board: Board = ONLY_EDGE_FOUR_FREE.parse().unwrap();
    let edge = choose_move(
        Strategy::FirstBoxCompleting,
        &board,
        &config,
        Duration::from_millis(10),
    );
    assert_eq!(edge, 4);

    let board: Board = EDGES_ONE_AND_TWO_FREE.parse().unwrap();
    let edge = choose_move(
        Strategy::FirstBoxCompleting,
        &board,
        &config,
        Duration::from_millis(10),
    );
    assert!(edge == 1 || edge == 2);
}

#[test]
#[should_panic]
fn test_choose_move_rejects_zero_turn_time() {
    let config = Config::default_hardcoded();
    choose_move(Strategy::Random, &Board::new(), &config, Duration::ZERO);
}

#[test]
#[should_panic]
fn test_choose_move_rejects_full_board() {
    let config = Config::default_hardcoded();
    choose_move(Strategy::DeepBox, &Board::full(), &config, Duration::from_millis(10));
}
