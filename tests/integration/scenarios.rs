//! End-to-end scenarios over `"abracadabra"`, on every backend and
//! executor combination.

use super::common::{all_indexes, run_query, ALL_KINDS};
use pullstar::{Error, ExecutorKind, QueryConfig, RegexQuery};

const CORPUS: &[u8] = b"abracadabra";

#[test]
fn substring_search() {
    for index in all_indexes(CORPUS) {
        assert_eq!(index.search(b"abra").unwrap(), vec![0, 7]);
        assert_eq!(index.search(b"a").unwrap(), vec![0, 3, 5, 7, 10]);
    }
}

#[test]
fn dot_expression() {
    for index in all_indexes(CORPUS) {
        for executor in [ExecutorKind::BlackBox, ExecutorKind::Pull] {
            assert_eq!(
                run_query(&index, "a.r", executor),
                vec![(0, 3), (7, 3)],
                "a.r on {:?} with {:?}",
                index.kind(),
                executor
            );
        }
    }
}

#[test]
fn union_expression() {
    for index in all_indexes(CORPUS) {
        for executor in [ExecutorKind::BlackBox, ExecutorKind::Pull] {
            assert_eq!(
                run_query(&index, "ab|ra", executor),
                vec![(0, 2), (2, 2), (7, 2), (9, 2)]
            );
        }
    }
}

#[test]
fn grouped_union_expression() {
    for index in all_indexes(CORPUS) {
        for executor in [ExecutorKind::BlackBox, ExecutorKind::Pull] {
            assert_eq!(
                run_query(&index, "a(b|d)", executor),
                vec![(0, 2), (5, 2), (7, 2)]
            );
        }
    }
}

#[test]
fn wildcard_join_covers_all_pairings() {
    for index in all_indexes(CORPUS) {
        for executor in [ExecutorKind::BlackBox, ExecutorKind::Pull] {
            assert_eq!(
                run_query(&index, "a.*bra", executor),
                vec![(0, 4), (0, 11), (3, 8), (5, 6), (7, 4)]
            );
        }
    }
}

#[test]
fn queries_never_cross_the_sentinel() {
    for index in all_indexes(CORPUS) {
        assert!(index.search(b"ra\0").is_err()); // sentinel byte is rejected
        assert!(index.search(b"rab").unwrap().is_empty()); // and nothing wraps
        assert!(index.search(b"abracadabraa").unwrap().is_empty());
    }
}

#[test]
fn sentinel_only_corpus_matches_nothing() {
    for index in all_indexes(b"") {
        for query in [b"a".as_slice(), b"ab", b"abc"] {
            assert!(index.search(query).unwrap().is_empty());
            assert_eq!(index.count(query).unwrap(), 0);
            assert!(!index.contains(query).unwrap());
        }
    }
}

#[test]
fn parse_failures_are_reported_not_executed() {
    for index in all_indexes(CORPUS) {
        for bad in ["a(b", "[]", "a{3,1}", "*a"] {
            match RegexQuery::new(&index, bad, QueryConfig::default()) {
                Err(Error::Parse(_)) => {}
                other => panic!("{:?} should fail to parse, got {:?}", bad, other.is_ok()),
            }
        }
    }
}

#[test]
fn unanchored_pull_queries_are_refused_cleanly() {
    for index in all_indexes(CORPUS) {
        let query = RegexQuery::new(&index, "[a-z]+", QueryConfig::default()).unwrap();
        assert!(matches!(query.execute(), Err(Error::Query(_))));
        // the same expression is fine under the black-box strategy
        let config = QueryConfig {
            executor: ExecutorKind::BlackBox,
            ..QueryConfig::default()
        };
        let query = RegexQuery::new(&index, "[a-z]+", config).unwrap();
        assert!(query.execute().is_ok());
    }
}

#[test]
fn every_kind_builds_through_the_facade() {
    // mostly a guard against a backend being wired to the wrong variant
    let indexes = all_indexes(CORPUS);
    let kinds: Vec<_> = indexes.iter().map(|i| i.kind()).collect();
    assert_eq!(kinds, ALL_KINDS);
}
