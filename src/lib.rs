//! Index-accelerated regular-expression search over an immutable byte
//! corpus.
//!
//! Queries are answered through full-text indexes instead of scanning. Two
//! index families coexist behind one capability — a compact suffix tree
//! built Kasai-style from the suffix and LCP arrays, and suffix-array
//! indexes (plain binary search, or augmented with LCP-interval tables for
//! O(m + log n) lookup) — plus a fixed-width n-gram map.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌──────────────┐   ┌─────────────┐
//! │ sais.rs  │──▶│ lcp.rs  │──▶│ tree/        │──▶│ index/      │
//! │ (SA-IS)  │   │ (Kasai) │   │ (build +     │   │ (TextIndex  │
//! │          │   │         │   │  compact)    │   │  facade)    │
//! └──────────┘   └─────────┘   └──────────────┘   └──────┬──────┘
//!                                                        │
//!                    ┌───────────────────────────────────┴──┐
//!                    │ regex/ (parser, black-box, partial   │
//!                    │ scan, pull executors, .* driver)     │
//!                    └──────────────────────────────────────┘
//! ```
//!
//! A regular expression is split on its top-level `.*` wildcards; each
//! sub-expression runs through either bottom-up set composition or
//! pull-based token enumeration, and the per-sub-expression results are
//! folded with a wildcard join.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use pullstar::{Corpus, IndexKind, QueryConfig, RegexQuery, TextIndex};
//!
//! let corpus = Arc::new(Corpus::from_bytes(b"abracadabra").unwrap());
//! let index = TextIndex::build(corpus, IndexKind::SuffixTree).unwrap();
//!
//! let query = RegexQuery::new(&index, "a(b|d)", QueryConfig::default()).unwrap();
//! let matches = query.execute().unwrap();
//! assert_eq!(matches.len(), 3);
//! ```

pub mod bitpacked;
pub mod cli;
pub mod error;
pub mod index;
pub mod lcp;
pub mod regex;
pub mod sais;
pub mod text;
pub mod tree;
mod wire;

pub use bitpacked::{width_for, BitPackedArray};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use index::{
    AugmentedSuffixArrayIndex, IndexKind, NGramIndex, SuffixArrayIndex, SuffixTreeIndex,
    TextIndex, DEFAULT_NGRAM_SIZE,
};
pub use regex::{ExecutorKind, OffsetLength, QueryConfig, RegexQuery, ResultSet};
pub use text::{Corpus, SENTINEL};
