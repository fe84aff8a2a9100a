// Integration tests for the board model
//
// Covers edge bookkeeping, box completion counts, corner pairing and the
// translation of dual-graph moves back onto physical edges.

use deep_box::board::{Board, Connection, Region, CORNER_EDGE_PAIRS, NUM_BOXES, NUM_EDGES};

fn board_with_free(edges: &[usize]) -> Board {
    let mut board = Board::full();
    for &e in edges {
        board.set_edge_free(e);
    }
    board
}

#[test]
fn test_new_board_is_empty() {
    let board = Board::new();
    assert_eq!(board.num_free_edges(), NUM_EDGES);
    assert_eq!(board.num_boxes_left(), NUM_BOXES);
    assert_eq!(board.free_edges(), (0..NUM_EDGES).collect::<Vec<_>>());
    assert!(!board.is_terminal());
}

#[test]
fn test_full_board_is_terminal() {
    let board = Board::full();
    assert!(board.is_terminal());
    assert_eq!(board.num_boxes_left(), 0);
    assert!(board.free_edges().is_empty());
}

#[test]
fn test_set_edge_taken_and_free() {
    let mut board = Board::new();
    board.set_edge_taken(40);
    assert!(board.is_edge_taken(40));
    assert_eq!(board.num_free_edges(), NUM_EDGES - 1);

    board.set_edge_free(40);
    assert!(!board.is_edge_taken(40));
    assert_eq!(board, Board::new());
}

#[test]
fn test_boxes_completed_by_counts_three_sided_boxes() {
    // Boxes 0 and 1 each have three taken sides and share edge 9
    let board = board_with_free(&[9, 1]);
    assert_eq!(board.boxes_completed_by(9), 1);
    assert_eq!(board.boxes_completed_by(1), 0);

    let board = board_with_free(&[9]);
    assert_eq!(board.boxes_completed_by(9), 2);

    assert_eq!(Board::new().boxes_completed_by(30), 0);
}

#[test]
#[should_panic]
fn test_boxes_completed_by_rejects_taken_edge() {
    Board::full().boxes_completed_by(3);
}

#[test]
fn test_play_reports_completed_boxes() {
    let mut board = board_with_free(&[9, 1]);
    assert_eq!(board.play(9), 1);
    assert!(board.is_box_taken(0));
    assert_eq!(board.play(1), 1);
    assert!(board.is_terminal());
}

#[test]
fn test_corner_pairing_is_involutive() {
    for &(e1, e2) in CORNER_EDGE_PAIRS.iter() {
        assert_eq!(Board::corresponding_corner_edge(e1), Some(e2));
        assert_eq!(Board::corresponding_corner_edge(e2), Some(e1));
    }

    let paired: Vec<usize> = CORNER_EDGE_PAIRS
        .iter()
        .flat_map(|&(a, b)| vec![a, b])
        .collect();
    for edge in 0..NUM_EDGES {
        if let Some(partner) = Board::corresponding_corner_edge(edge) {
            assert_eq!(Board::corresponding_corner_edge(partner), Some(edge));
        } else {
            assert!(!paired.contains(&edge), "edge {} should have a partner", edge);
        }
    }
}

#[test]
fn test_corner_edges_share_the_same_box_and_outside() {
    for &(e1, e2) in CORNER_EDGE_PAIRS.iter() {
        assert_eq!(Connection::of_edge(e1), Connection::of_edge(e2));
        assert_eq!(Connection::of_edge(e1).a, Region::Outside);
    }
}

#[test]
fn test_edge_between_regions() {
    assert_eq!(Board::edge_between(Region::Box(0), Region::Box(1)), Some(9));
    assert_eq!(Board::edge_between(Region::Box(1), Region::Box(0)), Some(9));
    assert_eq!(Board::edge_between(Region::Outside, Region::Box(0)), Some(0));
    assert_eq!(Board::edge_between(Region::Box(0), Region::Box(5)), None);
}

#[test]
fn test_resolve_edge_substitutes_corner_partner() {
    let board = board_with_free(&[8]);
    assert_eq!(board.resolve_edge(0), 8);

    let connection = Connection::new(Region::Box(0), Region::Outside);
    assert_eq!(board.edge_for(connection), Some(8));

    // A free first choice is kept as is
    assert_eq!(Board::new().resolve_edge(0), 0);
}

#[test]
fn test_board_string_marks_non_zero_as_taken() {
    let board: Board = "1011111111111111111111111111111111111111111111111111111111111111111111x1"
        .parse()
        .unwrap();
    assert_eq!(board.free_edges(), vec![1]);
}

#[test]
fn test_board_string_rejects_wrong_length() {
    let too_long = "0".repeat(NUM_EDGES + 1);
    assert!(too_long.parse::<Board>().is_err());
    assert!("".parse::<Board>().is_err());
}
