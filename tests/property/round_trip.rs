//! Round-trip laws: persisted indexes behave identically after reload, and
//! the parser's canonical form reparses to the same tree.

use super::common::{all_indexes, ALL_KINDS};
use proptest::prelude::*;
use pullstar::regex::parser::parse;
use pullstar::TextIndex;
use std::io::Cursor;

fn corpus_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..60)
}

fn query_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..6)
}

proptest! {
    #[test]
    fn every_backend_survives_a_round_trip(
        text in corpus_strategy(),
        query in query_strategy(),
    ) {
        for index in all_indexes(&text) {
            let mut buf = Vec::new();
            let written = index.serialize(&mut buf).unwrap();
            prop_assert_eq!(written, buf.len());

            let restored =
                TextIndex::deserialize(index.kind(), &mut Cursor::new(buf)).unwrap();
            prop_assert_eq!(restored.kind(), index.kind());
            prop_assert_eq!(
                restored.search(&query).unwrap(),
                index.search(&query).unwrap()
            );
            prop_assert_eq!(
                restored.count(&query).unwrap(),
                index.count(&query).unwrap()
            );
        }
    }

    #[test]
    fn truncated_files_never_load(text in corpus_strategy()) {
        for index in all_indexes(&text) {
            let mut buf = Vec::new();
            index.serialize(&mut buf).unwrap();
            buf.truncate(buf.len() / 2);
            prop_assert!(
                TextIndex::deserialize(index.kind(), &mut Cursor::new(buf)).is_err(),
                "kind {:?}",
                index.kind()
            );
        }
    }
}

#[test]
fn deserializing_the_wrong_kind_fails_or_disagrees() {
    // Layouts are not self-describing; loading under the wrong kind must
    // at minimum never panic. Most cross-reads fail on validation.
    for index in all_indexes(b"abracadabra") {
        let mut buf = Vec::new();
        index.serialize(&mut buf).unwrap();
        for kind in ALL_KINDS {
            if kind == index.kind() {
                continue;
            }
            let _ = TextIndex::deserialize(kind, &mut Cursor::new(buf.clone()));
        }
    }
}

#[test]
fn canonical_form_is_a_parser_fixpoint() {
    for expression in [
        "abracadabra",
        "a|b|c",
        "a.r",
        "ab|ra",
        "a(b|d)",
        "(ab)*c",
        "[a-f]+x",
        "a{2,4}(b|c)",
        "x(abc)",
        "a\\+b",
        "a..b",
        "((a|b)c)*",
    ] {
        let first = parse(expression).unwrap();
        let canonical = first.to_string();
        let second = parse(&canonical).unwrap();
        assert_eq!(first, second, "via {:?}", canonical);
        // and the canonical form is stable from then on
        assert_eq!(second.to_string(), canonical);
    }
}
