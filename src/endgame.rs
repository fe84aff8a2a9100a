// Endgame classifier
//
// Recognises the shapes of one region-graph component that force play:
// boxes ready to capture next to the outside or a joint, closed chains and
// open chains hanging off a joint. The classifier only reads its input;
// callers that simulate the forced sequence work on their own copy.

use std::collections::{BTreeSet, HashSet};

use crate::board::Connection;
use crate::canonical::canonical_form;
use crate::graph::{NodeId, RegionGraph, OUTSIDE};

/// Shape of a component as far as forced play is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A capturable box next to the outside or a joint
    Capturable,
    /// Path of boxes with both ends capturable, away from the outside
    ClosedChain(usize),
    /// Chain from a joint (or the outside) ending in a capturable box
    OpenChain(usize),
    /// Nothing forced
    Unforced,
}

/// Result of classifying a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub shape: Shape,
    pub urgent_moves: Vec<Connection>,
}

impl Classification {
    fn unforced() -> Self {
        Classification {
            shape: Shape::Unforced,
            urgent_moves: Vec::new(),
        }
    }
}

/// True for a component shaped `end - 2 - ... - 2 - end` with no arc to the outside
pub fn is_closed_chain(graph: &RegionGraph) -> bool {
    if graph.num_nodes() < 3
        || graph.num_arcs() + 2 != graph.num_nodes()
        || graph.degree(OUTSIDE) > 0
    {
        return false;
    }

    let mut ends = 0;
    for node in 1..graph.num_nodes() {
        match graph.degree(node) {
            1 => ends += 1,
            2 => {}
            _ => return false,
        }
    }
    ends == 2
}

/// Classifies one connected component and lists its urgent moves
pub fn classify(graph: &RegionGraph) -> Classification {
    if let Some(capture) = capturable_next_to_joint(graph) {
        return Classification {
            shape: Shape::Capturable,
            urgent_moves: vec![capture],
        };
    }

    if is_closed_chain(graph) {
        return classify_closed_chain(graph);
    }

    classify_open_chains(graph)
}

/// Urgent moves of a single component
pub fn urgent_moves(graph: &RegionGraph) -> Vec<Connection> {
    classify(graph).urgent_moves
}

/// A degree-1 box whose only neighbour is the outside or a joint
fn capturable_next_to_joint(graph: &RegionGraph) -> Option<Connection> {
    graph.nodes_with_degree(1).into_iter().find_map(|node| {
        let neighbour = graph.neighbours(node)[0];
        if neighbour == OUTSIDE || graph.degree(neighbour) >= 3 {
            Some(graph.connection(node, neighbour))
        } else {
            None
        }
    })
}

fn classify_closed_chain(graph: &RegionGraph) -> Classification {
    let length = graph.num_nodes() - 1;
    let ends = graph.nodes_with_degree(1);
    assert_eq!(ends.len(), 2, "closed chain must have two ends");

    let end = ends[0];
    let next_to_end = graph.neighbours(end)[0];
    let take_end = graph.connection(end, next_to_end);

    let urgent_moves = match length {
        // Every arc of a 2- or 3-chain touches the middle, so any arc will do
        2 | 3 => vec![take_end],
        4 => {
            // Either take a box and leave a 3-chain, or sacrifice down the middle
            let middle = graph.nodes_with_degree(2);
            assert_eq!(middle.len(), 2, "4-chain must have two middle boxes");
            let down_the_middle = graph.connection(middle[0], middle[1]);
            vec![take_end, down_the_middle]
        }
        _ => vec![take_end],
    };

    Classification {
        shape: Shape::ClosedChain(length),
        urgent_moves,
    }
}

/// Walks outward from every joint along degree-2 boxes. The first walk that
/// ends in a capturable box is an open chain.
fn classify_open_chains(graph: &RegionGraph) -> Classification {
    let mut joints = vec![OUTSIDE];
    joints.extend((1..graph.num_nodes()).filter(|&n| graph.degree(n) >= 3));

    let mut visited: BTreeSet<NodeId> = joints.iter().copied().collect();

    for &joint in &joints {
        for &first in graph.neighbours(joint) {
            if !visited.insert(first) || graph.degree(first) != 2 {
                continue;
            }

            let mut length = 1;
            let mut prev = joint;
            let mut current = first;
            while graph.degree(current) == 2 && current != OUTSIDE && length <= graph.num_nodes() {
                let around = graph.neighbours(current);
                let next = if around[0] == prev { around[1] } else { around[0] };
                prev = current;
                current = next;
                visited.insert(current);
                length += 1;

                if joints.contains(&current) {
                    break;
                }
            }

            if current != OUTSIDE && graph.degree(current) == 1 {
                let capture = graph.connection(prev, current);
                let urgent_moves = if length == 2 {
                    // Take the box, or hand both boxes over with a hard-hearted handout
                    vec![capture, graph.connection(joint, first)]
                } else {
                    vec![capture]
                };
                return Classification {
                    shape: Shape::OpenChain(length),
                    urgent_moves,
                };
            }
        }
    }

    Classification::unforced()
}

/// Urgent moves of the first component (in node order) that has any
pub fn super_graph_urgent_moves(graph: &RegionGraph) -> Vec<Connection> {
    let _guard = crate::simple_profiler::ProfileGuard::new("classify");

    graph
        .connected_components()
        .iter()
        .map(urgent_moves)
        .find(|moves| !moves.is_empty())
        .unwrap_or_default()
}

/// Moves worth searching from this graph: the urgent moves when any exist,
/// otherwise one arc per isomorphism class of the resulting graph.
pub fn potential_moves(graph: &RegionGraph) -> Vec<Connection> {
    let urgent = super_graph_urgent_moves(graph);
    if !urgent.is_empty() {
        return urgent;
    }

    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut moves = Vec::new();
    for (n1, n2) in graph.arcs() {
        let mut child = graph.clone();
        child.remove_arc(n1, n2);
        if seen.insert(canonical_form(&child)) {
            moves.push(graph.connection(n1, n2));
        }
    }
    moves
}

/// Plays forced single moves on a copy of the graph until none remain.
/// Returns the number of boxes resolved and the boxes still open.
pub fn resolve_forced_sequence(graph: &RegionGraph) -> (usize, usize) {
    let mut graph = graph.clone();
    let initial = graph.num_nodes_left_to_capture();

    loop {
        let urgent = super_graph_urgent_moves(&graph);
        if urgent.len() != 1 || !graph.remove_connection(urgent[0]) {
            break;
        }
    }

    let remaining = graph.num_nodes_left_to_capture();
    (initial - remaining, remaining)
}
