//! Universal index invariants: every backend agrees with a naive scan and
//! with every other backend, and the underlying arrays obey their laws.

use super::common::{all_indexes, scan_offsets};
use proptest::prelude::*;
use pullstar::lcp::{inverse, lcp_tree};
use pullstar::sais::suffix_array;
use pullstar::Corpus;

fn corpus_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..80)
}

fn query_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..7)
}

proptest! {
    #[test]
    fn search_is_exact_and_sorted(text in corpus_strategy(), query in query_strategy()) {
        let expected = scan_offsets(&text, &query);
        for index in all_indexes(&text) {
            let offsets = index.search(&query).unwrap();
            prop_assert_eq!(&offsets, &expected, "kind {:?}", index.kind());
            prop_assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn count_and_contains_derive_from_search(
        text in corpus_strategy(),
        query in query_strategy(),
    ) {
        for index in all_indexes(&text) {
            let found = index.search(&query).unwrap();
            prop_assert_eq!(index.count(&query).unwrap(), found.len());
            prop_assert_eq!(index.contains(&query).unwrap(), !found.is_empty());
        }
    }

    #[test]
    fn suffix_array_is_a_sorted_permutation(text in corpus_strategy()) {
        let corpus = Corpus::from_bytes(&text).unwrap();
        let sa = suffix_array(&corpus);
        let bytes = corpus.bytes();

        let mut positions = sa.clone();
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..bytes.len()).collect::<Vec<_>>());

        for i in 1..sa.len() {
            prop_assert!(bytes[sa[i - 1]..] < bytes[sa[i]..]);
        }
    }

    #[test]
    fn lcp_matches_its_definition(text in corpus_strategy()) {
        let corpus = Corpus::from_bytes(&text).unwrap();
        let sa = suffix_array(&corpus);
        let lcp = lcp_tree(&corpus, &sa);
        let bytes = corpus.bytes();

        prop_assert_eq!(lcp[0], 0);
        for r in 1..sa.len() {
            let expected = bytes[sa[r - 1]..]
                .iter()
                .zip(bytes[sa[r]..].iter())
                .take_while(|(a, b)| a == b)
                .count();
            prop_assert_eq!(lcp[r], expected, "rank {}", r);
        }
    }

    #[test]
    fn inverse_is_the_inverse_permutation(text in corpus_strategy()) {
        let corpus = Corpus::from_bytes(&text).unwrap();
        let sa = suffix_array(&corpus);
        let isa = inverse(&sa);
        for (rank, &pos) in sa.iter().enumerate() {
            prop_assert_eq!(isa[pos], rank);
        }
    }
}

#[test]
fn char_at_exposes_the_corpus() {
    for index in all_indexes(b"abracadabra") {
        for (i, &b) in b"abracadabra\0".iter().enumerate() {
            assert_eq!(index.char_at(i), b);
        }
    }
}
