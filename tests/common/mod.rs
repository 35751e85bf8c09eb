//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use pullstar::{Corpus, ExecutorKind, IndexKind, QueryConfig, RegexQuery, TextIndex};

pub const ALL_KINDS: [IndexKind; 4] = [
    IndexKind::SuffixTree,
    IndexKind::SuffixArray,
    IndexKind::AugmentedSuffixArray,
    IndexKind::NGram,
];

/// Build a shared corpus from raw input bytes.
pub fn corpus(input: &[u8]) -> Arc<Corpus> {
    Arc::new(Corpus::from_bytes(input).expect("test corpus"))
}

/// Build one backend over the input.
pub fn index(input: &[u8], kind: IndexKind) -> TextIndex {
    TextIndex::build(corpus(input), kind).expect("test index")
}

/// Build every backend over the same corpus.
pub fn all_indexes(input: &[u8]) -> Vec<TextIndex> {
    let shared = corpus(input);
    ALL_KINDS
        .iter()
        .map(|&kind| TextIndex::build(shared.clone(), kind).expect("test index"))
        .collect()
}

/// Run an expression and collect the matches as plain pairs.
pub fn run_query(
    index: &TextIndex,
    expression: &str,
    executor: ExecutorKind,
) -> Vec<(usize, usize)> {
    let config = QueryConfig {
        executor,
        ..QueryConfig::default()
    };
    RegexQuery::new(index, expression, config)
        .expect("parse")
        .execute()
        .expect("execute")
        .into_iter()
        .map(|m| (m.offset, m.length))
        .collect()
}

/// Offsets found by a naive corpus scan: the ground truth for `search`.
pub fn scan_offsets(input: &[u8], query: &[u8]) -> Vec<usize> {
    if query.is_empty() || query.len() > input.len() {
        return Vec::new();
    }
    (0..=input.len() - query.len())
        .filter(|&i| &input[i..i + query.len()] == query)
        .collect()
}
