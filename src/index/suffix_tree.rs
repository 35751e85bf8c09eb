//! Suffix-tree backend: the compact tree behind the index operations.

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::bitpacked::{width_for, BitPackedArray};
use crate::error::Result;
use crate::lcp::lcp_tree;
use crate::sais::suffix_array;
use crate::text::Corpus;
use crate::tree::{build_suffix_tree, CompactSuffixTree};

/// Text index backed by the compact suffix tree.
#[derive(Debug)]
pub struct SuffixTreeIndex {
    tree: CompactSuffixTree,
}

impl SuffixTreeIndex {
    /// Full construction pipeline: suffix array, LCP, bottom-up tree,
    /// compact restructuring. The intermediate arrays and the construction
    /// arena are all released before this returns.
    pub fn build(corpus: Arc<Corpus>) -> Result<Self> {
        let n = corpus.len();
        let sa = suffix_array(&corpus);
        let lcp = lcp_tree(&corpus, &sa);
        let max_lcp = lcp.iter().copied().max().unwrap_or(0) as u64;

        let sa_packed = BitPackedArray::from_values(
            &sa.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(n as u64),
        );
        drop(sa);
        let lcp_packed = BitPackedArray::from_values(
            &lcp.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(max_lcp + 1),
        );
        drop(lcp);

        let built = build_suffix_tree(&corpus, &sa_packed, &lcp_packed)?;
        drop((sa_packed, lcp_packed));
        let tree = CompactSuffixTree::from_built(corpus, built)?;
        Ok(SuffixTreeIndex { tree })
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        self.tree.corpus()
    }

    /// All offsets where `query` occurs, ascending.
    pub fn search(&self, query: &[u8]) -> Result<Vec<usize>> {
        let mut offsets = match self.tree.walk(query) {
            Some(subtree) => self.tree.collect_offsets(subtree),
            None => Vec::new(),
        };
        offsets.sort_unstable();
        Ok(offsets)
    }

    pub fn count(&self, query: &[u8]) -> Result<usize> {
        Ok(self
            .tree
            .walk(query)
            .map_or(0, |subtree| self.tree.count_leaves(subtree)))
    }

    pub fn contains(&self, query: &[u8]) -> Result<bool> {
        Ok(self.tree.walk(query).is_some())
    }

    #[inline]
    pub fn char_at(&self, i: usize) -> u8 {
        self.corpus().char_at(i)
    }

    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        self.tree.serialize(out)
    }

    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        Ok(SuffixTreeIndex {
            tree: CompactSuffixTree::deserialize(input)?,
        })
    }
}
