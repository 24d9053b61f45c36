//! Huffman tree construction.
//!
//! The tree is built bottom-up from archive-wide symbol frequencies by
//! repeatedly merging the two least frequent nodes. In memory it is an owned
//! recursive structure; [`HuffmanTree::to_node_table`] flattens it into the
//! breadth-first index table that is stored in the archive.
//!
//! # Tie-breaking
//!
//! Nodes with equal frequency are ordered by creation sequence: leaves are
//! numbered in ascending byte order, merged nodes continue the sequence. The
//! archive format does not depend on this choice (the decoder reads the tree
//! as stored), but it makes archives reproducible for identical inputs.
//!
//! # Special cases
//! - No symbols (every input empty): the tree is empty and has zero nodes
//! - One symbol: a synthetic root of frequency 0 gets the lone leaf as its
//!   left child and no right child, so the symbol has the 1-bit code `0`

use tracing::debug;

use crate::error::Result;
use crate::format::{NodeTable, SerializedNode};
use crate::frequency::FrequencyTable;
use crate::heap::PriorityQueue;
use crate::queue::Queue;

/// A node of the in-memory code tree.
///
/// A node is a leaf iff both children are absent. `symbol` is only
/// meaningful on leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub frequency: u64,
    pub symbol: u8,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    /// Create a leaf for `symbol`.
    pub fn leaf(symbol: u8, frequency: u64) -> Self {
        Self {
            frequency,
            symbol,
            left: None,
            right: None,
        }
    }

    /// Create an internal node over two subtrees.
    pub fn merge(left: Box<TreeNode>, right: Box<TreeNode>) -> Self {
        Self {
            frequency: left.frequency + right.frequency,
            symbol: 0,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Heap entry: a subtree plus its creation sequence for tie-breaking.
struct Pending {
    sequence: u32,
    node: Box<TreeNode>,
}

/// Huffman code tree for one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<Box<TreeNode>>,
    node_count: usize,
}

impl HuffmanTree {
    /// Build the tree for the symbols present in `frequencies`.
    ///
    /// # Errors
    /// Only `HeapError::EmptyQueue`, which would indicate a bug in the merge
    /// loop rather than a problem with the input.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut queue = PriorityQueue::new(|a: &Pending, b: &Pending| {
            a.node
                .frequency
                .cmp(&b.node.frequency)
                .then(a.sequence.cmp(&b.sequence))
        });

        let mut sequence = 0u32;
        for (symbol, count) in frequencies.present_symbols() {
            queue.insert(Pending {
                sequence,
                node: Box::new(TreeNode::leaf(symbol, count)),
            });
            sequence += 1;
        }

        let mut node_count = queue.len();

        let root = match node_count {
            0 => None,
            1 => {
                let lone = queue.extract_min()?;
                node_count += 1;
                Some(Box::new(TreeNode {
                    frequency: 0,
                    symbol: 0,
                    left: Some(lone.node),
                    right: None,
                }))
            }
            _ => {
                while queue.has_more_than_one() {
                    let first = queue.extract_min()?;
                    let second = queue.extract_min()?;
                    queue.insert(Pending {
                        sequence,
                        node: Box::new(TreeNode::merge(first.node, second.node)),
                    });
                    sequence += 1;
                    node_count += 1;
                }
                Some(queue.extract_min()?.node)
            }
        };

        debug!(
            symbols = frequencies.distinct_symbols(),
            nodes = node_count,
            "built huffman tree"
        );

        Ok(Self { root, node_count })
    }

    /// Root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Total number of nodes, including a synthetic single-symbol root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Flatten the tree into breadth-first order.
    ///
    /// The root lands at index 0 and every child index points at a later
    /// position, with -1 for an absent child. Internal nodes store value 0.
    pub fn to_node_table(&self) -> NodeTable {
        let mut nodes = Vec::with_capacity(self.node_count);

        if let Some(root) = self.root.as_deref() {
            let mut queue = Queue::new();
            queue.enqueue(root);

            while let Some(node) = queue.dequeue() {
                // Everything still queued sits right after this node, so a
                // freshly enqueued child lands at `position + queue.len()`
                let position = nodes.len();

                let left = match node.left.as_deref() {
                    Some(child) => {
                        queue.enqueue(child);
                        (position + queue.len()) as i16
                    }
                    None => -1,
                };
                let right = match node.right.as_deref() {
                    Some(child) => {
                        queue.enqueue(child);
                        (position + queue.len()) as i16
                    }
                    None => -1,
                };

                nodes.push(SerializedNode {
                    value: if node.is_leaf() { node.symbol } else { 0 },
                    left,
                    right,
                });
            }
        }

        NodeTable::from_tree_order(nodes)
    }
}
