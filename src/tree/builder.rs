//! Bottom-up suffix tree construction from the suffix array and LCP array.
//!
//! Suffixes are inserted in suffix-array order. The most recent leaf sits at
//! the bottom of the rightmost path; inserting the next suffix walks up that
//! path until the accumulated path length fits under the next LCP value,
//! then either appends a fresh leaf or splits the rightmost edge. Every
//! suffix becomes a leaf exactly once and at most `n - 1` internal nodes are
//! created, so the whole build is O(n).
//!
//! The tree is a cyclic parent/child relation while it is being built, so
//! nodes live in index-addressed arenas (one for internal nodes, one for
//! leaves) rather than behind owned pointers. The arena is released as soon
//! as the compact form has been derived from it.

use crate::bitpacked::BitPackedArray;
use crate::error::{Error, Result};
use crate::text::Corpus;

/// Reference into one of the two node arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Internal(u32),
    Leaf(u32),
}

/// Outgoing edge: the label is `T[start..=end]`, never empty.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub start: u32,
    pub end: u32,
    pub node: NodeId,
}

impl Edge {
    #[inline]
    fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Internal node: children in left-to-right insertion order, which is
/// suffix-array order and therefore already lexicographic by first byte.
#[derive(Debug)]
pub struct InternalNode {
    pub parent: u32,
    pub children: Vec<Edge>,
}

/// Leaf node carrying the suffix's corpus offset.
#[derive(Debug)]
pub struct LeafNode {
    pub parent: u32,
    pub offset: u32,
}

/// The constructed (pre-compaction) suffix tree. Index 0 of the internal
/// arena is the root.
#[derive(Debug)]
pub struct BuiltTree {
    pub internals: Vec<InternalNode>,
    pub leaves: Vec<LeafNode>,
}

impl BuiltTree {
    pub const ROOT: u32 = 0;
}

/// Build the suffix tree of `corpus` from its suffix array and the LCP
/// array in rank-order convention (`lcp[r]` pairs ranks `r - 1` and `r`).
pub fn build_suffix_tree(
    corpus: &Corpus,
    sa: &BitPackedArray,
    lcp: &BitPackedArray,
) -> Result<BuiltTree> {
    let n = corpus.len();
    if sa.len() as usize != n || lcp.len() as usize != n {
        return Err(Error::Build(format!(
            "suffix/LCP array sizes ({}, {}) do not match corpus length {}",
            sa.len(),
            lcp.len(),
            n
        )));
    }

    let last = (n - 1) as u32;
    let mut tree = BuiltTree {
        internals: vec![InternalNode {
            parent: BuiltTree::ROOT,
            children: Vec::new(),
        }],
        leaves: Vec::with_capacity(n),
    };

    // Root starts with the first suffix as its only child.
    let first = sa.at(0) as u32;
    let first_leaf = add_leaf(&mut tree, BuiltTree::ROOT, first, first, last);
    let mut last_leaf = first_leaf;
    let mut last_leaf_depth = (n - sa.at(0)) as u32;

    for i in 0..n - 1 {
        let suffix = sa.at(i + 1) as u32;
        let target = lcp.at(i + 1) as u32;

        // Walk up the rightmost path until the path above the current node
        // is no longer than the LCP with the incoming suffix.
        let mut current = tree.leaves[last_leaf as usize].parent;
        let mut path_length = last_leaf_depth - rightmost_edge(&tree, current).len();
        while path_length > target {
            current = tree.internals[current as usize].parent;
            path_length -= rightmost_edge(&tree, current).len();
        }

        if path_length == target {
            // The shared prefix ends exactly at this node; the rest of the
            // suffix becomes a fresh rightmost leaf.
            last_leaf = add_leaf(&mut tree, current, suffix, suffix + target, last);
        } else {
            // The shared prefix ends inside the rightmost edge: split it.
            // The previous suffix runs through this edge, so its text can
            // relabel both halves.
            let prev_suffix = sa.at(i) as u32;
            let old = *rightmost_edge(&tree, current);
            let old_path_length = path_length + old.len();
            if target <= path_length || old_path_length <= target {
                return Err(Error::Build(format!(
                    "edge split out of range at rank {}: path {}, lcp {}, edge end {}",
                    i + 1,
                    path_length,
                    target,
                    old_path_length
                )));
            }

            let split = tree.internals.len() as u32;
            tree.internals.push(InternalNode {
                parent: current,
                children: Vec::with_capacity(2),
            });

            // Replace the old edge with the shared-prefix stub leading to
            // the new internal node.
            let node = &mut tree.internals[current as usize];
            let slot = node.children.len() - 1;
            node.children[slot] = Edge {
                start: prev_suffix + path_length,
                end: prev_suffix + target - 1,
                node: NodeId::Internal(split),
            };

            // First child: the former subtree, edge shortened from the
            // front. Second child: the fresh leaf.
            tree.internals[split as usize].children.push(Edge {
                start: prev_suffix + target,
                end: prev_suffix + old_path_length - 1,
                node: old.node,
            });
            set_parent(&mut tree, old.node, split);
            last_leaf = add_leaf(&mut tree, split, suffix, suffix + target, last);
        }
        last_leaf_depth = n as u32 - suffix;
    }

    debug_assert_eq!(tree.leaves.len(), n);
    debug_assert!(tree.internals.len() <= n);
    Ok(tree)
}

fn add_leaf(tree: &mut BuiltTree, parent: u32, offset: u32, edge_start: u32, edge_end: u32) -> u32 {
    let id = tree.leaves.len() as u32;
    tree.leaves.push(LeafNode { parent, offset });
    tree.internals[parent as usize].children.push(Edge {
        start: edge_start,
        end: edge_end,
        node: NodeId::Leaf(id),
    });
    id
}

fn rightmost_edge(tree: &BuiltTree, internal: u32) -> &Edge {
    tree.internals[internal as usize]
        .children
        .last()
        .expect("rightmost-path node has no children")
}

fn set_parent(tree: &mut BuiltTree, node: NodeId, parent: u32) {
    match node {
        NodeId::Internal(i) => tree.internals[i as usize].parent = parent,
        NodeId::Leaf(l) => tree.leaves[l as usize].parent = parent,
    }
}
