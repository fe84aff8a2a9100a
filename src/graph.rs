// Region graph: the dual of the remaining board
//
// Node 0 is always the outside of the board. Every other node is an
// uncaptured box. Each free edge becomes one arc, so a corner box with two
// free boundary edges is joined to the outside by two parallel arcs.

use crate::board::{Board, BoxId, Connection, Region, EDGE_BOXES, NUM_BOXES, NUM_EDGES};

pub type NodeId = usize;

/// Node index of the outside region in every graph
pub const OUTSIDE: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGraph {
    /// Region each node stands for; index 0 is `Region::Outside`
    node_regions: Vec<Region>,
    box_to_node: [Option<NodeId>; NUM_BOXES],
    /// Neighbour lists; parallel arcs appear once per arc
    adjacency: Vec<Vec<NodeId>>,
    num_arcs: usize,
}

impl RegionGraph {
    /// Creates a graph holding only the outside node
    pub fn empty() -> Self {
        RegionGraph {
            node_regions: vec![Region::Outside],
            box_to_node: [None; NUM_BOXES],
            adjacency: vec![Vec::new()],
            num_arcs: 0,
        }
    }

    /// Builds the dual graph of every free edge on the board
    pub fn from_board(board: &Board) -> Self {
        let _guard = crate::simple_profiler::ProfileGuard::new("graph_build");

        let mut graph = RegionGraph::empty();
        for bx in board.remaining_boxes() {
            graph.add_node(Region::Box(bx));
        }

        for edge in 0..NUM_EDGES {
            if board.is_edge_taken(edge) {
                continue;
            }
            let [b0, b1] = EDGE_BOXES[edge];
            let n0 = graph.node_for_box(b0);
            let n1 = graph.node_for_box(b1);
            graph.add_arc(n0, n1);
        }

        graph
    }

    fn node_for_box(&self, bx: Option<BoxId>) -> NodeId {
        match bx {
            // A free edge means none of its boxes are captured
            Some(id) => self.box_to_node[id].unwrap_or(OUTSIDE),
            None => OUTSIDE,
        }
    }

    /// Adds a node for `region` and returns its index
    pub fn add_node(&mut self, region: Region) -> NodeId {
        match region {
            Region::Outside => OUTSIDE,
            Region::Box(bx) => {
                if let Some(existing) = self.box_to_node[bx] {
                    return existing;
                }
                let id = self.node_regions.len();
                self.node_regions.push(region);
                self.adjacency.push(Vec::new());
                self.box_to_node[bx] = Some(id);
                id
            }
        }
    }

    /// Adds one arc; parallel arcs are allowed
    pub fn add_arc(&mut self, n1: NodeId, n2: NodeId) {
        self.adjacency[n1].push(n2);
        self.adjacency[n2].push(n1);
        self.num_arcs += 1;
    }

    /// Removes a single arc between the two nodes. Returns false when none exists.
    pub fn remove_arc(&mut self, n1: NodeId, n2: NodeId) -> bool {
        let pos1 = match self.adjacency[n1].iter().position(|&n| n == n2) {
            Some(p) => p,
            None => return false,
        };
        self.adjacency[n1].swap_remove(pos1);
        let pos2 = self.adjacency[n2]
            .iter()
            .position(|&n| n == n1)
            .expect("adjacency lists out of sync");
        self.adjacency[n2].swap_remove(pos2);
        self.num_arcs -= 1;
        true
    }

    /// Removes one arc addressed by regions
    pub fn remove_connection(&mut self, connection: Connection) -> bool {
        match (self.node_of(connection.a), self.node_of(connection.b)) {
            (Some(n1), Some(n2)) => self.remove_arc(n1, n2),
            _ => false,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_regions.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node].len()
    }

    pub fn neighbours(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node]
    }

    pub fn region(&self, node: NodeId) -> Region {
        self.node_regions[node]
    }

    pub fn node_of(&self, region: Region) -> Option<NodeId> {
        match region {
            Region::Outside => Some(OUTSIDE),
            Region::Box(bx) => self.box_to_node.get(bx).copied().flatten(),
        }
    }

    pub fn connection(&self, n1: NodeId, n2: NodeId) -> Connection {
        Connection::new(self.region(n1), self.region(n2))
    }

    /// Box nodes (never the outside) with exactly `degree` open sides
    pub fn nodes_with_degree(&self, degree: usize) -> Vec<NodeId> {
        (1..self.num_nodes())
            .filter(|&n| self.degree(n) == degree)
            .collect()
    }

    /// Every arc once, as `(low, high)` node pairs; parallel arcs repeat
    pub fn arcs(&self) -> Vec<(NodeId, NodeId)> {
        let mut arcs = Vec::with_capacity(self.num_arcs);
        for (n, neighbours) in self.adjacency.iter().enumerate() {
            for &m in neighbours {
                if n < m {
                    arcs.push((n, m));
                }
            }
        }
        arcs
    }

    /// Boxes still holding at least one free side
    pub fn num_nodes_left_to_capture(&self) -> usize {
        (1..self.num_nodes()).filter(|&n| self.degree(n) > 0).count()
    }

    /// Splits the graph into the groups of boxes connected without passing
    /// through the outside. Each component is a fresh graph that keeps the
    /// outside node and its arcs into the component. Boxes with no free
    /// side form no component.
    pub fn connected_components(&self) -> Vec<RegionGraph> {
        let n = self.num_nodes();
        let mut labels: Vec<Option<usize>> = vec![None; n];
        let mut num_labels = 0;

        for start in 1..n {
            if labels[start].is_some() || self.degree(start) == 0 {
                continue;
            }
            let label = num_labels;
            num_labels += 1;
            labels[start] = Some(label);

            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                for &next in self.neighbours(node) {
                    if next != OUTSIDE && labels[next].is_none() {
                        labels[next] = Some(label);
                        stack.push(next);
                    }
                }
            }
        }

        let mut components = vec![RegionGraph::empty(); num_labels];
        for node in 1..n {
            if let Some(label) = labels[node] {
                components[label].add_node(self.region(node));
            }
        }

        for (n1, n2) in self.arcs() {
            let label = match (labels[n1], labels[n2]) {
                (Some(l), _) | (None, Some(l)) => l,
                (None, None) => continue,
            };
            let component = &mut components[label];
            let c1 = component.node_of(self.region(n1)).unwrap_or(OUTSIDE);
            let c2 = component.node_of(self.region(n2)).unwrap_or(OUTSIDE);
            component.add_arc(c1, c2);
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_arc_keeps_parallel_twin() {
        let mut graph = RegionGraph::empty();
        let n = graph.add_node(Region::Box(0));
        graph.add_arc(n, OUTSIDE);
        graph.add_arc(n, OUTSIDE);

        assert!(graph.remove_arc(OUTSIDE, n));
        assert_eq!(graph.degree(n), 1);
        assert_eq!(graph.degree(OUTSIDE), 1);
        assert_eq!(graph.num_arcs(), 1);
    }

    #[test]
    fn test_remove_missing_arc_is_noop() {
        let mut graph = RegionGraph::empty();
        let n1 = graph.add_node(Region::Box(3));
        let n2 = graph.add_node(Region::Box(4));
        assert!(!graph.remove_arc(n1, n2));
        assert_eq!(graph.num_arcs(), 0);
    }
}
