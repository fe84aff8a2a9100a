// Integration tests for the region graph and its component split

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use deep_box::board::{Board, Region, NUM_BOXES, NUM_EDGES};
use deep_box::graph::{RegionGraph, OUTSIDE};

/// Mixed endgame with eight separate groups of boxes
const SCATTERED_BOARD: &str =
    "111111111010001011111110001000010111011111111101010011111100001111010011";

/// Only the 2x2 block of boxes 3, 4, 11 and 12 is left, as a closed loop
const LOOP_BOARD: &str =
    "111111111111011111110011111110111111111111111111111111111111111111111111";

fn random_board(rng: &mut StdRng, taken_probability: f64) -> Board {
    let mut board = Board::new();
    for edge in 0..NUM_EDGES {
        if rng.random_bool(taken_probability) {
            board.set_edge_taken(edge);
        }
    }
    board
}

#[test]
fn test_empty_board_graph() {
    let graph = RegionGraph::from_board(&Board::new());
    assert_eq!(graph.num_nodes(), NUM_BOXES + 1);
    assert_eq!(graph.num_arcs(), NUM_EDGES);
    assert_eq!(graph.degree(OUTSIDE), 32);
    assert_eq!(graph.nodes_with_degree(4).len(), NUM_BOXES);
}

#[test]
fn test_full_board_graph_has_only_outside() {
    let graph = RegionGraph::from_board(&Board::full());
    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(graph.num_arcs(), 0);
    assert!(graph.connected_components().is_empty());
}

#[test]
fn test_counts_match_board_on_random_positions() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let board = random_board(&mut rng, 0.6);
        let graph = RegionGraph::from_board(&board);

        assert_eq!(graph.num_nodes(), 1 + board.num_boxes_left());
        assert_eq!(graph.num_arcs(), board.num_free_edges());

        let degree_sum: usize = (0..graph.num_nodes()).map(|n| graph.degree(n)).sum();
        assert_eq!(degree_sum, 2 * graph.num_arcs());
    }
}

#[test]
fn test_corner_box_has_parallel_outside_arcs() {
    let graph = RegionGraph::from_board(&Board::new());
    let corner = graph.node_of(Region::Box(0)).unwrap();
    let to_outside = graph
        .neighbours(corner)
        .iter()
        .filter(|&&n| n == OUTSIDE)
        .count();
    assert_eq!(to_outside, 2);
}

#[test]
fn test_scattered_board_components() {
    let board: Board = SCATTERED_BOARD.parse().unwrap();
    let graph = RegionGraph::from_board(&board);

    assert_eq!(graph.num_nodes(), 29);
    assert_eq!(graph.num_arcs(), 25);

    let components = graph.connected_components();
    assert_eq!(components.len(), 8);

    let box_sets: Vec<Vec<Region>> = components
        .iter()
        .map(|c| (1..c.num_nodes()).map(|n| c.region(n)).collect())
        .collect();
    assert_eq!(box_sets[0], vec![Region::Box(0), Region::Box(1)]);
    assert_eq!(
        box_sets[1],
        vec![Region::Box(2), Region::Box(3), Region::Box(4), Region::Box(5)]
    );
    assert_eq!(box_sets[3], vec![Region::Box(8)]);

    // Every arc lands in exactly one component
    let total_arcs: usize = components.iter().map(|c| c.num_arcs()).sum();
    assert_eq!(total_arcs, graph.num_arcs());
}

#[test]
fn test_component_keeps_outside_arcs() {
    let board: Board = SCATTERED_BOARD.parse().unwrap();
    let components = RegionGraph::from_board(&board).connected_components();

    // Box 8 hangs off the outside alone
    let lone = &components[3];
    assert_eq!(lone.num_nodes(), 2);
    assert_eq!(lone.degree(OUTSIDE), 1);
}

#[test]
fn test_loop_board_graph() {
    let board: Board = LOOP_BOARD.parse().unwrap();
    let graph = RegionGraph::from_board(&board);

    assert_eq!(graph.num_nodes(), 5);
    assert_eq!(graph.num_arcs(), 4);
    assert_eq!(graph.degree(OUTSIDE), 0);
    assert_eq!(graph.nodes_with_degree(2).len(), 4);
    assert_eq!(graph.connected_components().len(), 1);
}

#[test]
fn test_remove_connection_and_capture_count() {
    let board: Board = LOOP_BOARD.parse().unwrap();
    let mut graph = RegionGraph::from_board(&board);
    assert_eq!(graph.num_nodes_left_to_capture(), 4);

    for (n1, n2) in graph.arcs() {
        let connection = graph.connection(n1, n2);
        assert!(graph.remove_connection(connection));
    }
    assert_eq!(graph.num_arcs(), 0);
    assert_eq!(graph.num_nodes_left_to_capture(), 0);
}
