//! The uniform text-index capability and its backends.
//!
//! One closed enum over the four index families, dispatched by match. Every
//! backend answers the same five questions — `search`, `count`, `contains`,
//! `char_at`, and (de)serialization — and every `search` returns offsets in
//! ascending order, whatever order the backend produces internally.
//!
//! Queries are validated once here: the empty query and queries containing
//! the sentinel byte are rejected before any backend runs. Queries longer
//! than the corpus are legal and simply match nothing (the sentinel
//! terminates every comparison), so a size-one corpus returns empty for
//! every query rather than erroring.

pub mod augmented;
pub mod ngram;
pub mod suffix_array;
pub mod suffix_tree;

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::text::{Corpus, SENTINEL};

pub use augmented::AugmentedSuffixArrayIndex;
pub use ngram::{NGramIndex, DEFAULT_NGRAM_SIZE};
pub use suffix_array::SuffixArrayIndex;
pub use suffix_tree::SuffixTreeIndex;

/// Which backend an index file or build request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    SuffixTree,
    SuffixArray,
    AugmentedSuffixArray,
    NGram,
}

impl IndexKind {
    /// File-name suffix convention for persisted indexes.
    pub fn file_suffix(self) -> &'static str {
        match self {
            IndexKind::SuffixTree => ".st",
            IndexKind::SuffixArray => ".sa",
            IndexKind::AugmentedSuffixArray => ".asa",
            IndexKind::NGram => ".ngm",
        }
    }
}

/// A text index over an immutable corpus, in one of the four backends.
#[derive(Debug)]
pub enum TextIndex {
    SuffixTree(SuffixTreeIndex),
    SuffixArray(SuffixArrayIndex),
    AugmentedSuffixArray(AugmentedSuffixArrayIndex),
    NGram(NGramIndex),
}

impl TextIndex {
    /// Build the requested backend over `corpus`. The n-gram backend uses
    /// the default window width; see [`TextIndex::build_ngram`].
    pub fn build(corpus: Arc<Corpus>, kind: IndexKind) -> Result<Self> {
        Ok(match kind {
            IndexKind::SuffixTree => TextIndex::SuffixTree(SuffixTreeIndex::build(corpus)?),
            IndexKind::SuffixArray => TextIndex::SuffixArray(SuffixArrayIndex::build(corpus)),
            IndexKind::AugmentedSuffixArray => {
                TextIndex::AugmentedSuffixArray(AugmentedSuffixArrayIndex::build(corpus))
            }
            IndexKind::NGram => TextIndex::NGram(NGramIndex::build(corpus, DEFAULT_NGRAM_SIZE)),
        })
    }

    /// Build an n-gram index with an explicit window width.
    pub fn build_ngram(corpus: Arc<Corpus>, ngram_size: u32) -> Result<Self> {
        if ngram_size == 0 {
            return Err(Error::Build("n-gram size must be positive".to_string()));
        }
        Ok(TextIndex::NGram(NGramIndex::build(corpus, ngram_size)))
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            TextIndex::SuffixTree(_) => IndexKind::SuffixTree,
            TextIndex::SuffixArray(_) => IndexKind::SuffixArray,
            TextIndex::AugmentedSuffixArray(_) => IndexKind::AugmentedSuffixArray,
            TextIndex::NGram(_) => IndexKind::NGram,
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        match self {
            TextIndex::SuffixTree(index) => index.corpus(),
            TextIndex::SuffixArray(index) => index.corpus(),
            TextIndex::AugmentedSuffixArray(index) => index.corpus(),
            TextIndex::NGram(index) => index.corpus(),
        }
    }

    /// All offsets where `query` occurs, in ascending order.
    pub fn search(&self, query: &[u8]) -> Result<Vec<usize>> {
        self.validate_query(query)?;
        match self {
            TextIndex::SuffixTree(index) => index.search(query),
            TextIndex::SuffixArray(index) => index.search(query),
            TextIndex::AugmentedSuffixArray(index) => index.search(query),
            TextIndex::NGram(index) => index.search(query),
        }
    }

    /// Number of occurrences of `query`.
    pub fn count(&self, query: &[u8]) -> Result<usize> {
        self.validate_query(query)?;
        match self {
            TextIndex::SuffixTree(index) => index.count(query),
            TextIndex::SuffixArray(index) => index.count(query),
            TextIndex::AugmentedSuffixArray(index) => index.count(query),
            TextIndex::NGram(index) => index.count(query),
        }
    }

    /// Does `query` occur at all?
    pub fn contains(&self, query: &[u8]) -> Result<bool> {
        self.validate_query(query)?;
        match self {
            TextIndex::SuffixTree(index) => index.contains(query),
            TextIndex::SuffixArray(index) => index.contains(query),
            TextIndex::AugmentedSuffixArray(index) => index.contains(query),
            TextIndex::NGram(index) => index.contains(query),
        }
    }

    /// Corpus byte at position `i` (sentinel included at `len - 1`).
    pub fn char_at(&self, i: usize) -> u8 {
        match self {
            TextIndex::SuffixTree(index) => index.char_at(i),
            TextIndex::SuffixArray(index) => index.char_at(i),
            TextIndex::AugmentedSuffixArray(index) => index.char_at(i),
            TextIndex::NGram(index) => index.char_at(i),
        }
    }

    /// Write the backend's persisted layout.
    pub fn serialize<W: Write>(&self, out: &mut W) -> Result<usize> {
        let written = match self {
            TextIndex::SuffixTree(index) => index.serialize(out)?,
            TextIndex::SuffixArray(index) => index.serialize(out)?,
            TextIndex::AugmentedSuffixArray(index) => index.serialize(out)?,
            TextIndex::NGram(index) => index.serialize(out)?,
        };
        Ok(written)
    }

    /// Read a persisted index of the given kind.
    pub fn deserialize<R: Read>(kind: IndexKind, input: &mut R) -> Result<Self> {
        Ok(match kind {
            IndexKind::SuffixTree => TextIndex::SuffixTree(SuffixTreeIndex::deserialize(input)?),
            IndexKind::SuffixArray => TextIndex::SuffixArray(SuffixArrayIndex::deserialize(input)?),
            IndexKind::AugmentedSuffixArray => {
                TextIndex::AugmentedSuffixArray(AugmentedSuffixArrayIndex::deserialize(input)?)
            }
            IndexKind::NGram => TextIndex::NGram(NGramIndex::deserialize(input)?),
        })
    }

    fn validate_query(&self, query: &[u8]) -> Result<()> {
        if query.is_empty() {
            return Err(Error::Query("empty query".to_string()));
        }
        if query.contains(&SENTINEL) {
            return Err(Error::Query(
                "query contains the sentinel byte 0x00".to_string(),
            ));
        }
        Ok(())
    }
}
