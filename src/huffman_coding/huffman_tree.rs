//! Builds the Huffman tree from a frequency table.
//!
//! Nodes wait in a vec kept sorted so the two lightest nodes sit at the end and can be popped.
//! Equal weights are ordered by rank: leaves take their position in the frequency table
//! (first-occurrence order), and each merged node takes the next free rank. Every node has a
//! unique rank, so the same frequency table always produces the same tree.

use log::debug;
use std::cmp::Ordering;

use crate::tools::freq_count::FreqTable;

/// A node of the encoder's tree. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        sym: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// Longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Join two nodes. `left` should be the lighter one.
    pub fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A node waiting to be merged, with its tie-break rank.
#[derive(Debug)]
struct Pending {
    weight: u64,
    rank: usize,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    /// Sort by decreasing weight and decreasing rank, so the lightest node is last.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

/// Build the tree for a frequency table. Returns None when the table is empty.
/// A table with a single symbol gives a lone leaf as the root.
pub fn build_tree(freqs: &FreqTable) -> Option<Node> {
    let mut queue: Vec<Pending> = freqs
        .entries()
        .iter()
        .enumerate()
        .map(|(rank, &(sym, weight))| Pending {
            weight,
            rank,
            node: Node::Leaf { sym, weight },
        })
        .collect();
    queue.sort_unstable();

    let mut next_rank = queue.len();

    // Pull off the two lightest nodes and put their parent back in sorted position.
    loop {
        let left = queue.pop()?;
        let right = match queue.pop() {
            Some(right) => right,
            None => {
                debug!(
                    "Built tree with {} leaves, depth {}",
                    left.node.leaf_count(),
                    left.node.depth()
                );
                return Some(left.node);
            }
        };
        let merged = Pending {
            weight: left.weight + right.weight,
            rank: next_rank,
            node: Node::merge(left.node, right.node),
        };
        next_rank += 1;
        let pos = queue.binary_search(&merged).unwrap_or_else(|pos| pos);
        queue.insert(pos, merged);
    }
}
