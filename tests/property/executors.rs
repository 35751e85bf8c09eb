//! Executor equivalence: on wildcard-free expressions, black-box
//! composition, the partial-scan fast path, and pull-based enumeration all
//! produce the same `(offset, length)` sets, over every backend.

use super::common::{all_indexes, run_query};
use proptest::prelude::*;
use pullstar::{ExecutorKind, QueryConfig, RegexQuery};

/// Expressions covering every operator the grammar admits (wildcard-free
/// and literal-anchored, so all three strategies apply).
const EXPRESSIONS: &[&str] = &[
    "a",
    "ab",
    "a.c",
    "a.r",
    "ab|ra",
    "a(b|d)",
    "a[bc]",
    "a[a-d]b",
    "ab.d",
    "a(bc)+",
    "a{1,3}",
    "b[a-r]+c",
];

fn corpus_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..50)
}

proptest! {
    #[test]
    fn black_box_equals_pull(text in corpus_strategy()) {
        for index in all_indexes(&text) {
            for expression in EXPRESSIONS {
                let blackbox = run_query(&index, expression, ExecutorKind::BlackBox);
                let pull = run_query(&index, expression, ExecutorKind::Pull);
                prop_assert_eq!(
                    &blackbox,
                    &pull,
                    "{} on {:?} over {:?}",
                    expression,
                    index.kind(),
                    text
                );
            }
        }
    }

    #[test]
    fn partial_scan_equals_black_box(text in corpus_strategy()) {
        for index in all_indexes(&text) {
            for expression in ["ab", "a.c", "a[bc]", "a[a-d]b", "b[a-r]+c", ".ab", "[ab]c"] {
                let pure = run_query(&index, expression, ExecutorKind::BlackBox);
                let config = QueryConfig {
                    executor: ExecutorKind::BlackBox,
                    partial_scan: true,
                    ..QueryConfig::default()
                };
                let scanned: Vec<_> = RegexQuery::new(&index, expression, config)
                    .unwrap()
                    .execute()
                    .unwrap()
                    .into_iter()
                    .map(|m| (m.offset, m.length))
                    .collect();
                prop_assert_eq!(&pure, &scanned, "{} on {:?}", expression, index.kind());
            }
        }
    }

    #[test]
    fn backends_agree_under_every_executor(text in corpus_strategy()) {
        let indexes = all_indexes(&text);
        for executor in [ExecutorKind::BlackBox, ExecutorKind::Pull] {
            for expression in EXPRESSIONS {
                let reference = run_query(&indexes[0], expression, executor);
                for index in &indexes[1..] {
                    prop_assert_eq!(
                        &run_query(index, expression, executor),
                        &reference,
                        "{} on {:?}",
                        expression,
                        index.kind()
                    );
                }
            }
        }
    }
}
