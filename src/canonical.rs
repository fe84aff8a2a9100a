// Canonical encoding of region graphs up to isomorphism
//
// The outside node is fixed, so the graph is cut into blocks: groups of box
// nodes connected without passing through the outside. Each block is
// labelled canonically by colour refinement with individualisation, keeping
// each node's count of arcs to the outside as part of its initial colour.
// The whole-graph encoding is the sorted list of block encodings, so two
// graphs get equal encodings only if they are isomorphic.

use crate::graph::{NodeId, RegionGraph, OUTSIDE};

/// Search leaves explored per block before settling for the best so far.
/// Past the cap the encoding is still a faithful description of the graph,
/// it just may not be the minimal one.
const MAX_LEAVES: usize = 2048;

/// A block: local adjacency between boxes plus arcs to the outside per box
struct Block {
    adjacency: Vec<Vec<usize>>,
    outside_arcs: Vec<u8>,
}

/// Returns an encoding equal for two graphs whenever they are isomorphic
/// with the outside node mapped to itself.
pub fn canonical_form(graph: &RegionGraph) -> Vec<u8> {
    let _guard = crate::simple_profiler::ProfileGuard::new("canonical");

    let mut encodings: Vec<Vec<u8>> = split_blocks(graph)
        .iter()
        .map(canonical_block)
        .collect();
    encodings.sort();

    let mut form = Vec::new();
    for encoding in encodings {
        form.push(encoding.len() as u8);
        form.extend(encoding);
    }
    form
}

fn split_blocks(graph: &RegionGraph) -> Vec<Block> {
    let n = graph.num_nodes();
    let mut block_of: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut blocks: Vec<Block> = Vec::new();

    for start in 1..n {
        if block_of[start].is_some() {
            continue;
        }
        let block_id = blocks.len();
        let mut members = vec![start];
        block_of[start] = Some((block_id, 0));

        let mut i = 0;
        while i < members.len() {
            let node = members[i];
            for &next in graph.neighbours(node) {
                if next != OUTSIDE && block_of[next].is_none() {
                    block_of[next] = Some((block_id, members.len()));
                    members.push(next);
                }
            }
            i += 1;
        }

        let adjacency = members
            .iter()
            .map(|&node| {
                graph
                    .neighbours(node)
                    .iter()
                    .filter(|&&m| m != OUTSIDE)
                    .filter_map(|&m| block_of[m].map(|(_, local)| local))
                    .collect()
            })
            .collect();
        let outside_arcs = members
            .iter()
            .map(|&node| outside_count(graph, node))
            .collect();

        blocks.push(Block {
            adjacency,
            outside_arcs,
        });
    }

    blocks
}

fn outside_count(graph: &RegionGraph, node: NodeId) -> u8 {
    graph
        .neighbours(node)
        .iter()
        .filter(|&&m| m == OUTSIDE)
        .count() as u8
}

fn canonical_block(block: &Block) -> Vec<u8> {
    let initial: Vec<(u8, usize)> = (0..block.adjacency.len())
        .map(|v| (block.outside_arcs[v], block.adjacency[v].len()))
        .collect();
    let colours = rank(&initial);
    let colours = refine(block, colours);

    let mut best: Option<Vec<u8>> = None;
    let mut leaves = 0;
    search(block, colours, &mut best, &mut leaves);
    best.unwrap_or_default()
}

/// Replaces arbitrary sortable keys by dense ranks
fn rank<K: Ord + Clone>(keys: &[K]) -> Vec<usize> {
    let mut sorted: Vec<K> = keys.to_vec();
    sorted.sort();
    sorted.dedup();
    keys.iter()
        .map(|k| sorted.binary_search(k).unwrap_or(0))
        .collect()
}

/// Splits colour classes by the multiset of neighbour colours until stable
fn refine(block: &Block, mut colours: Vec<usize>) -> Vec<usize> {
    loop {
        let keys: Vec<(usize, Vec<usize>)> = (0..colours.len())
            .map(|v| {
                let mut around: Vec<usize> =
                    block.adjacency[v].iter().map(|&m| colours[m]).collect();
                around.sort_unstable();
                (colours[v], around)
            })
            .collect();
        let next = rank(&keys);
        if num_classes(&next) == num_classes(&colours) {
            return next;
        }
        colours = next;
    }
}

fn num_classes(colours: &[usize]) -> usize {
    colours.iter().max().map_or(0, |&m| m + 1)
}

fn search(block: &Block, colours: Vec<usize>, best: &mut Option<Vec<u8>>, leaves: &mut usize) {
    if *leaves >= MAX_LEAVES {
        return;
    }

    let n = colours.len();
    if num_classes(&colours) == n {
        *leaves += 1;
        let encoding = encode(block, &colours);
        if best.as_ref().map_or(true, |b| encoding < *b) {
            *best = Some(encoding);
        }
        return;
    }

    // Smallest colour shared by more than one node
    let mut counts = vec![0usize; n];
    for &c in &colours {
        counts[c] += 1;
    }
    let target = match counts.iter().position(|&c| c > 1) {
        Some(c) => c,
        None => return,
    };

    for v in (0..n).filter(|&v| colours[v] == target) {
        let split: Vec<(usize, bool)> = (0..n)
            .map(|u| (colours[u], u != v))
            .collect();
        let individualised = refine(block, rank(&split));
        search(block, individualised, best, leaves);
    }
}

/// Encodes the block with node `v` placed at position `colours[v]`
fn encode(block: &Block, colours: &[usize]) -> Vec<u8> {
    let n = colours.len();
    let mut order = vec![0usize; n];
    for (v, &c) in colours.iter().enumerate() {
        order[c] = v;
    }

    let mut encoding = vec![n as u8];
    for &v in &order {
        let mut around: Vec<u8> = block.adjacency[v]
            .iter()
            .map(|&m| colours[m] as u8)
            .collect();
        around.sort_unstable();
        encoding.push(block.outside_arcs[v]);
        encoding.push(around.len() as u8);
        encoding.extend(around);
    }
    encoding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Region;

    fn path(boxes: &[usize], open_end: bool) -> RegionGraph {
        let mut graph = RegionGraph::empty();
        let nodes: Vec<NodeId> = boxes
            .iter()
            .map(|&b| graph.add_node(Region::Box(b)))
            .collect();
        for pair in nodes.windows(2) {
            graph.add_arc(pair[0], pair[1]);
        }
        if open_end {
            graph.add_arc(nodes[nodes.len() - 1], OUTSIDE);
        }
        graph
    }

    #[test]
    fn test_relabelled_paths_match() {
        let g1 = path(&[1, 2, 3], true);
        let g2 = path(&[9, 4, 7], true);
        assert_eq!(canonical_form(&g1), canonical_form(&g2));
    }

    #[test]
    fn test_open_end_position_matters() {
        let g1 = path(&[1, 2, 3], true);
        let mut g2 = path(&[1, 2, 3], false);
        let middle = g2.node_of(Region::Box(2)).unwrap();
        g2.add_arc(middle, OUTSIDE);
        assert_ne!(canonical_form(&g1), canonical_form(&g2));
    }

    #[test]
    fn test_cycle_and_path_differ() {
        let g1 = path(&[1, 2, 3, 4], false);
        let mut g2 = path(&[1, 2, 3, 4], false);
        let first = g2.node_of(Region::Box(1)).unwrap();
        let last = g2.node_of(Region::Box(4)).unwrap();
        g2.add_arc(first, last);
        assert_ne!(canonical_form(&g1), canonical_form(&g2));
    }
}
