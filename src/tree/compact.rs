//! The immutable, branch-sorted suffix tree used at query time.
//!
//! Restructures a [`BuiltTree`](super::builder::BuiltTree): children of each
//! internal node are sorted ascending by the first byte of their edge label
//! and stored as parallel `start`/`end`/`child` arrays, so descent can
//! binary-search the branching byte. Leaves collapse to their corpus
//! offsets. The construction arena is consumed and dropped; the compact form
//! is never mutated afterwards and is safe for concurrent readers.
//!
//! # Persisted layout
//!
//! `u32 n, bytes T[n]`, then the tree pre-order:
//! `u8 is_leaf; if leaf { u32 offset } else { u8 k; u32 start[k]; u32 end[k]; node[k] }`.

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::text::Corpus;
use crate::tree::builder::{BuiltTree, NodeId};
use crate::wire;

/// Reference into the compact arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Internal(u32),
    Leaf(u32),
}

#[derive(Debug)]
struct CompactInternal {
    starts: Vec<u32>,
    ends: Vec<u32>,
    children: Vec<NodeRef>,
}

impl CompactInternal {
    #[inline]
    fn arity(&self) -> usize {
        self.children.len()
    }
}

/// Arena-backed compact suffix tree. Internal node 0 is the root.
#[derive(Debug)]
pub struct CompactSuffixTree {
    corpus: Arc<Corpus>,
    internals: Vec<CompactInternal>,
    leaf_offsets: Vec<u32>,
}

impl CompactSuffixTree {
    const ROOT: u32 = 0;

    /// Restructure a built tree, consuming its arena.
    pub fn from_built(corpus: Arc<Corpus>, built: BuiltTree) -> Result<Self> {
        let mut compact = CompactSuffixTree {
            corpus,
            internals: Vec::with_capacity(built.internals.len()),
            leaf_offsets: Vec::with_capacity(built.leaves.len()),
        };

        compact.internals.push(CompactInternal {
            starts: Vec::new(),
            ends: Vec::new(),
            children: Vec::new(),
        });
        let mut pending: Vec<(u32, u32)> = vec![(BuiltTree::ROOT, Self::ROOT)];

        while let Some((built_idx, compact_idx)) = pending.pop() {
            let node = &built.internals[built_idx as usize];
            if node.children.len() > u8::MAX as usize {
                return Err(Error::Build(format!(
                    "internal node fan-out {} exceeds 255",
                    node.children.len()
                )));
            }

            let mut edges: Vec<_> = node.children.iter().collect();
            edges.sort_by_key(|e| compact.corpus.char_at(e.start as usize));

            let mut starts = Vec::with_capacity(edges.len());
            let mut ends = Vec::with_capacity(edges.len());
            let mut children = Vec::with_capacity(edges.len());
            for edge in edges {
                starts.push(edge.start);
                ends.push(edge.end);
                children.push(match edge.node {
                    NodeId::Leaf(l) => {
                        let id = compact.leaf_offsets.len() as u32;
                        compact.leaf_offsets.push(built.leaves[l as usize].offset);
                        NodeRef::Leaf(id)
                    }
                    NodeId::Internal(i) => {
                        let id = compact.internals.len() as u32;
                        compact.internals.push(CompactInternal {
                            starts: Vec::new(),
                            ends: Vec::new(),
                            children: Vec::new(),
                        });
                        pending.push((i, id));
                        NodeRef::Internal(id)
                    }
                });
            }

            let slot = &mut compact.internals[compact_idx as usize];
            slot.starts = starts;
            slot.ends = ends;
            slot.children = children;
        }

        Ok(compact)
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    #[inline]
    pub fn root(&self) -> NodeRef {
        NodeRef::Internal(Self::ROOT)
    }

    /// Descend from the root matching `query` byte-by-byte. Returns the root
    /// of the subtree whose path label has `query` as a prefix, or `None`.
    pub fn walk(&self, query: &[u8]) -> Option<NodeRef> {
        let mut node = self.root();
        let mut pos = 0;
        while pos < query.len() {
            let internal = match node {
                NodeRef::Internal(i) => &self.internals[i as usize],
                // A leaf's edge ran out while query bytes remain.
                NodeRef::Leaf(_) => return None,
            };

            let child = self.find_child(internal, query[pos])?;
            let (start, end) = (internal.starts[child], internal.ends[child]);

            // Verify the whole edge label against the query
            let mut i = start as usize;
            while i <= end as usize && pos < query.len() {
                if self.corpus.char_at(i) != query[pos] {
                    return None;
                }
                i += 1;
                pos += 1;
            }
            node = internal.children[child];
        }
        Some(node)
    }

    /// Binary search for the child whose edge starts with byte `b`.
    fn find_child(&self, node: &CompactInternal, b: u8) -> Option<usize> {
        node.starts
            .binary_search_by_key(&b, |&s| self.corpus.char_at(s as usize))
            .ok()
    }

    /// Depth-first enumeration of the leaf offsets under `node`, in tree
    /// (lexicographic) order.
    pub fn collect_offsets(&self, node: NodeRef) -> Vec<usize> {
        let mut offsets = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match current {
                NodeRef::Leaf(l) => offsets.push(self.leaf_offsets[l as usize] as usize),
                NodeRef::Internal(i) => {
                    stack.extend(self.internals[i as usize].children.iter().rev());
                }
            }
        }
        offsets
    }

    /// Number of leaves in the subtree under `node`.
    pub fn count_leaves(&self, node: NodeRef) -> usize {
        let mut count = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match current {
                NodeRef::Leaf(_) => count += 1,
                NodeRef::Internal(i) => {
                    stack.extend(self.internals[i as usize].children.iter());
                }
            }
        }
        count
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.leaf_offsets.len()
    }

    /// Write `(n, T, tree)` with the tree in pre-order.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let n = self.corpus.len();
        wire::write_u32(out, n as u32)?;
        wire::write_bytes(out, self.corpus.bytes())?;
        let mut written = 4 + n;

        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Leaf(l) => {
                    wire::write_u8(out, 1)?;
                    wire::write_u32(out, self.leaf_offsets[l as usize])?;
                    written += 1 + 4;
                }
                NodeRef::Internal(i) => {
                    let internal = &self.internals[i as usize];
                    wire::write_u8(out, 0)?;
                    wire::write_u8(out, internal.arity() as u8)?;
                    for &start in &internal.starts {
                        wire::write_u32(out, start)?;
                    }
                    for &end in &internal.ends {
                        wire::write_u32(out, end)?;
                    }
                    written += 2 + 8 * internal.arity();
                    // Reversed push so the leftmost child is written next
                    stack.extend(internal.children.iter().rev());
                }
            }
        }
        Ok(written)
    }

    /// Read back what [`CompactSuffixTree::serialize`] wrote.
    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        let n = wire::read_u32(input)? as usize;
        if n == 0 {
            return Err(invalid("suffix tree corpus is empty"));
        }
        let bytes = wire::read_bytes(input, n)?;
        let corpus =
            Arc::new(Corpus::from_stored(bytes).map_err(|e| invalid(&e.to_string()))?);

        let mut tree = CompactSuffixTree {
            corpus,
            internals: Vec::new(),
            leaf_offsets: Vec::new(),
        };

        // Pre-order reconstruction: each frame is an internal node waiting
        // for its remaining children.
        let root = tree.read_node(input, n)?;
        let mut frames: Vec<(u32, usize)> = Vec::new();
        match root {
            NodeRef::Internal(i) => frames.push((i, tree.internals[i as usize].arity())),
            NodeRef::Leaf(_) => return Err(invalid("suffix tree root is a leaf")),
        }

        while let Some((parent, remaining)) = frames.pop() {
            if remaining == 0 {
                continue;
            }
            let child = tree.read_node(input, n)?;
            let slot = tree.internals[parent as usize].arity()
                - remaining;
            tree.internals[parent as usize].children[slot] = child;
            frames.push((parent, remaining - 1));
            if let NodeRef::Internal(i) = child {
                frames.push((i, tree.internals[i as usize].arity()));
            }
        }

        if tree.leaf_offsets.len() > n {
            return Err(invalid("suffix tree has more leaves than suffixes"));
        }
        Ok(tree)
    }

    /// Read one pre-order node header. Internal children are placeholders
    /// until their own nodes arrive.
    fn read_node<R: Read>(&mut self, input: &mut R, n: usize) -> io::Result<NodeRef> {
        let is_leaf = wire::read_u8(input)?;
        if is_leaf == 1 {
            let offset = wire::read_u32(input)?;
            if offset as usize >= n {
                return Err(invalid("leaf offset out of range"));
            }
            if self.leaf_offsets.len() >= n {
                return Err(invalid("suffix tree has more leaves than suffixes"));
            }
            let id = self.leaf_offsets.len() as u32;
            self.leaf_offsets.push(offset);
            return Ok(NodeRef::Leaf(id));
        }
        if is_leaf != 0 {
            return Err(invalid("bad node tag"));
        }

        let k = wire::read_u8(input)? as usize;
        if k == 0 {
            return Err(invalid("internal node with no children"));
        }
        let mut starts = Vec::with_capacity(k);
        for _ in 0..k {
            starts.push(wire::read_u32(input)?);
        }
        let mut ends = Vec::with_capacity(k);
        for _ in 0..k {
            ends.push(wire::read_u32(input)?);
        }
        for i in 0..k {
            if starts[i] > ends[i] || ends[i] as usize >= n {
                return Err(invalid("edge label out of range"));
            }
        }
        for i in 1..k {
            let prev = self.corpus.char_at(starts[i - 1] as usize);
            let cur = self.corpus.char_at(starts[i] as usize);
            if prev >= cur {
                return Err(invalid("children are not sorted by edge byte"));
            }
        }

        if self.internals.len() > n {
            return Err(invalid("suffix tree has more internal nodes than suffixes"));
        }
        let id = self.internals.len() as u32;
        self.internals.push(CompactInternal {
            starts,
            ends,
            children: vec![NodeRef::Leaf(u32::MAX); k],
        });
        Ok(NodeRef::Internal(id))
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitpacked::{width_for, BitPackedArray};
    use crate::lcp::lcp_tree;
    use crate::sais::suffix_array;
    use crate::tree::builder::build_suffix_tree;
    use std::io::Cursor;

    fn compact_for(input: &[u8]) -> CompactSuffixTree {
        let corpus = Arc::new(Corpus::from_bytes(input).unwrap());
        let sa = suffix_array(&corpus);
        let lcp = lcp_tree(&corpus, &sa);
        let max_lcp = lcp.iter().copied().max().unwrap_or(0) as u64;
        let sa_packed = BitPackedArray::from_values(
            &sa.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(corpus.len() as u64),
        );
        let lcp_packed = BitPackedArray::from_values(
            &lcp.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(max_lcp),
        );
        let built = build_suffix_tree(&corpus, &sa_packed, &lcp_packed).unwrap();
        CompactSuffixTree::from_built(corpus, built).unwrap()
    }

    fn search(tree: &CompactSuffixTree, query: &[u8]) -> Vec<usize> {
        let mut offsets = match tree.walk(query) {
            Some(node) => tree.collect_offsets(node),
            None => Vec::new(),
        };
        offsets.sort_unstable();
        offsets
    }

    #[test]
    fn walk_finds_all_occurrences() {
        let tree = compact_for(b"abracadabra");
        assert_eq!(search(&tree, b"abra"), vec![0, 7]);
        assert_eq!(search(&tree, b"a"), vec![0, 3, 5, 7, 10]);
        assert_eq!(search(&tree, b"bra"), vec![1, 8]);
        assert_eq!(search(&tree, b"abracadabra"), vec![0]);
        assert!(search(&tree, b"abracadabrax").is_empty());
        assert!(search(&tree, b"z").is_empty());
    }

    #[test]
    fn count_matches_collect() {
        let tree = compact_for(b"mississippi");
        for query in [b"s".as_slice(), b"ss", b"issi", b"p", b"mississippi"] {
            let collected = search(&tree, query).len();
            let counted = tree
                .walk(query)
                .map(|node| tree.count_leaves(node))
                .unwrap_or(0);
            assert_eq!(collected, counted, "query {:?}", query);
        }
    }

    #[test]
    fn children_are_sorted_for_binary_descent() {
        let tree = compact_for(b"abracadabra");
        for node in &tree.internals {
            for i in 1..node.starts.len() {
                let prev = tree.corpus.char_at(node.starts[i - 1] as usize);
                let cur = tree.corpus.char_at(node.starts[i] as usize);
                assert!(prev < cur);
            }
        }
    }

    #[test]
    fn one_leaf_per_suffix() {
        let tree = compact_for(b"banana");
        assert_eq!(tree.num_leaves(), 7);
        let mut all = tree.collect_offsets(tree.root());
        all.sort_unstable();
        assert_eq!(all, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn serialize_round_trip() {
        let tree = compact_for(b"abracadabra");
        let mut buf = Vec::new();
        let written = tree.serialize(&mut buf).unwrap();
        assert_eq!(written, buf.len());

        let restored = CompactSuffixTree::deserialize(&mut Cursor::new(buf)).unwrap();
        for query in [b"abra".as_slice(), b"a", b"cad", b"ra", b"zzz"] {
            assert_eq!(search(&restored, query), search(&tree, query));
        }
    }

    #[test]
    fn deserialize_rejects_truncation() {
        let tree = compact_for(b"banana");
        let mut buf = Vec::new();
        tree.serialize(&mut buf).unwrap();
        buf.truncate(buf.len() - 3);
        assert!(CompactSuffixTree::deserialize(&mut Cursor::new(buf)).is_err());
    }

    #[test]
    fn sentinel_only_corpus_has_one_leaf() {
        let tree = compact_for(b"");
        assert_eq!(tree.num_leaves(), 1);
        assert!(tree.walk(b"a").is_none());
    }
}
