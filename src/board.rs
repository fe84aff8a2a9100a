// Board model for the 28-box "pi" shaped Dots and Boxes board
//
// Edges are numbered 0..72 row by row (horizontal runs then vertical runs),
// boxes 0..28 the same way. The incidence tables below are fixed for this
// board; every query is a pure function of the edge bitset.

use std::fmt;
use std::str::FromStr;

pub const NUM_BOXES: usize = 28;
pub const NUM_EDGES: usize = 72;

pub type Edge = usize;
pub type BoxId = usize;

/// The four edges bounding each box
pub const BOX_EDGES: [[Edge; 4]; NUM_BOXES] = [
    [0, 8, 9, 17],    [1, 9, 10, 18],   [2, 10, 11, 19],
    [3, 11, 12, 20],  [4, 12, 13, 21],  [5, 13, 14, 22],
    [6, 14, 15, 23],  [7, 15, 16, 24],  [17, 25, 26, 34],
    [18, 26, 27, 35], [19, 27, 28, 36], [20, 28, 29, 37],
    [21, 29, 30, 38], [22, 30, 31, 39], [23, 31, 32, 40],
    [24, 32, 33, 41], [35, 42, 43, 48], [36, 43, 44, 49],
    [39, 45, 46, 50], [40, 46, 47, 51], [48, 52, 53, 58],
    [49, 53, 54, 59], [50, 55, 56, 60], [51, 56, 57, 61],
    [58, 62, 63, 68], [59, 63, 64, 69], [60, 65, 66, 70],
    [61, 66, 67, 71],
];

const NO_BOX: Option<BoxId> = None;

const fn b(id: BoxId) -> Option<BoxId> {
    Some(id)
}

/// The one or two boxes each edge borders
pub const EDGE_BOXES: [[Option<BoxId>; 2]; NUM_EDGES] = [
    [b(0), NO_BOX], [b(1), NO_BOX], [b(2), NO_BOX], [b(3), NO_BOX],
    [b(4), NO_BOX], [b(5), NO_BOX], [b(6), NO_BOX], [b(7), NO_BOX],
    [b(0), NO_BOX], [b(0), b(1)], [b(1), b(2)], [b(2), b(3)], [b(3), b(4)],
    [b(4), b(5)], [b(5), b(6)], [b(6), b(7)], [b(7), NO_BOX],
    [b(0), b(8)], [b(1), b(9)], [b(2), b(10)], [b(3), b(11)],
    [b(4), b(12)], [b(5), b(13)], [b(6), b(14)], [b(7), b(15)],
    [b(8), NO_BOX], [b(8), b(9)], [b(9), b(10)], [b(10), b(11)], [b(11), b(12)],
    [b(12), b(13)], [b(13), b(14)], [b(14), b(15)], [b(15), NO_BOX],
    [b(8), NO_BOX], [b(9), b(16)], [b(10), b(17)], [b(11), NO_BOX],
    [b(12), NO_BOX], [b(13), b(18)], [b(14), b(19)], [b(15), NO_BOX],
    [b(16), NO_BOX], [b(16), b(17)], [b(17), NO_BOX], [b(18), NO_BOX],
    [b(18), b(19)], [b(19), NO_BOX],
    [b(16), b(20)], [b(17), b(21)], [b(18), b(22)], [b(19), b(23)],
    [b(20), NO_BOX], [b(20), b(21)], [b(21), NO_BOX], [b(22), NO_BOX],
    [b(22), b(23)], [b(23), NO_BOX],
    [b(20), b(24)], [b(21), b(25)], [b(22), b(26)], [b(23), b(27)],
    [b(24), NO_BOX], [b(24), b(25)], [b(25), NO_BOX], [b(26), NO_BOX],
    [b(26), b(27)], [b(27), NO_BOX],
    [b(24), NO_BOX], [b(25), NO_BOX], [b(26), NO_BOX], [b(27), NO_BOX],
];

/// Pairs of boundary edges meeting at a physical corner of the board.
/// Both connect the same corner box to the outside.
pub const CORNER_EDGE_PAIRS: [(Edge, Edge); 8] = [
    (0, 8),
    (7, 16),
    (25, 34),
    (33, 41),
    (62, 68),
    (64, 69),
    (65, 70),
    (67, 71),
];

/// A node of the dual graph: either a box or the area outside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Outside,
    Box(BoxId),
}

impl From<Option<BoxId>> for Region {
    fn from(b: Option<BoxId>) -> Self {
        match b {
            Some(id) => Region::Box(id),
            None => Region::Outside,
        }
    }
}

/// An unordered pair of regions joined by at least one free edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub a: Region,
    pub b: Region,
}

impl Connection {
    pub fn new(a: Region, b: Region) -> Self {
        if a <= b {
            Connection { a, b }
        } else {
            Connection { a: b, b: a }
        }
    }

    pub fn of_edge(edge: Edge) -> Self {
        let [b0, b1] = EDGE_BOXES[edge];
        Connection::new(b0.into(), b1.into())
    }
}

/// Edge state of a board: one bit per edge, set when taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    taken: u128,
}

impl Board {
    /// Creates a board with every edge free
    pub fn new() -> Self {
        Board { taken: 0 }
    }

    /// Creates a board with every edge taken
    pub fn full() -> Self {
        Board {
            taken: (1u128 << NUM_EDGES) - 1,
        }
    }

    pub fn is_edge_taken(&self, edge: Edge) -> bool {
        debug_assert!(edge < NUM_EDGES, "edge {} out of range", edge);
        self.taken & (1u128 << edge) != 0
    }

    pub fn set_edge_taken(&mut self, edge: Edge) {
        debug_assert!(edge < NUM_EDGES, "edge {} out of range", edge);
        self.taken |= 1u128 << edge;
    }

    pub fn set_edge_free(&mut self, edge: Edge) {
        debug_assert!(edge < NUM_EDGES, "edge {} out of range", edge);
        self.taken &= !(1u128 << edge);
    }

    /// Untaken edges in ascending order
    pub fn free_edges(&self) -> Vec<Edge> {
        (0..NUM_EDGES).filter(|&e| !self.is_edge_taken(e)).collect()
    }

    pub fn num_free_edges(&self) -> usize {
        NUM_EDGES - self.taken.count_ones() as usize
    }

    pub fn is_terminal(&self) -> bool {
        self.num_free_edges() == 0
    }

    pub fn box_taken_edges(&self, box_id: BoxId) -> usize {
        BOX_EDGES[box_id]
            .iter()
            .filter(|&&e| self.is_edge_taken(e))
            .count()
    }

    pub fn is_box_taken(&self, box_id: BoxId) -> bool {
        self.box_taken_edges(box_id) == 4
    }

    /// Boxes not yet captured, ascending
    pub fn remaining_boxes(&self) -> Vec<BoxId> {
        (0..NUM_BOXES).filter(|&bx| !self.is_box_taken(bx)).collect()
    }

    pub fn num_boxes_left(&self) -> usize {
        (0..NUM_BOXES).filter(|&bx| !self.is_box_taken(bx)).count()
    }

    /// How many boxes taking `edge` would complete (0, 1 or 2).
    /// Must be asked before the edge is marked taken.
    pub fn boxes_completed_by(&self, edge: Edge) -> usize {
        assert!(
            !self.is_edge_taken(edge),
            "boxes_completed_by({}) called on a taken edge",
            edge
        );

        EDGE_BOXES[edge]
            .iter()
            .flatten()
            .filter(|&&bx| self.box_taken_edges(bx) == 3)
            .count()
    }

    /// The edge sharing a board corner with `edge`, if it has one
    pub fn corresponding_corner_edge(edge: Edge) -> Option<Edge> {
        CORNER_EDGE_PAIRS.iter().find_map(|&(e1, e2)| {
            if e1 == edge {
                Some(e2)
            } else if e2 == edge {
                Some(e1)
            } else {
                None
            }
        })
    }

    /// First edge (by index) joining the two regions, regardless of state
    pub fn edge_between(a: Region, b: Region) -> Option<Edge> {
        let wanted = Connection::new(a, b);
        (0..NUM_EDGES).find(|&e| Connection::of_edge(e) == wanted)
    }

    /// Translates an edge chosen in dual-graph space back onto the board,
    /// substituting the corner partner when the first choice is taken.
    pub fn resolve_edge(&self, edge: Edge) -> Edge {
        if self.is_edge_taken(edge) {
            if let Some(partner) = Self::corresponding_corner_edge(edge) {
                return partner;
            }
        }
        edge
    }

    /// Physical edge for a dual-graph connection on this board
    pub fn edge_for(&self, connection: Connection) -> Option<Edge> {
        Self::edge_between(connection.a, connection.b).map(|e| self.resolve_edge(e))
    }

    /// Marks `edge` taken and reports how many boxes it completed
    pub fn play(&mut self, edge: Edge) -> usize {
        let completed = self.boxes_completed_by(edge);
        self.set_edge_taken(edge);
        completed
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != NUM_EDGES {
            return Err(format!(
                "Board string must have {} characters, got {}",
                NUM_EDGES,
                s.len()
            ));
        }

        let mut board = Board::new();
        for (edge, c) in s.chars().enumerate() {
            if c != '0' {
                board.set_edge_taken(edge);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in 0..NUM_EDGES {
            f.write_str(if self.is_edge_taken(edge) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
