//! Oracle tests: a brute-force interpreter over the raw text is the
//! reference semantics, and both executors must reproduce it on randomly
//! generated expression trees. The generated trees also pin down the
//! canonical-form fixpoint for shapes the parser alone would never produce.

use super::common::index;
use proptest::prelude::*;
use pullstar::regex::ast::{dot_bytes, Ast, Primitive, RepeatKind};
use pullstar::regex::parser::parse;
use pullstar::{ExecutorKind, IndexKind, QueryConfig, RegexQuery};
use std::collections::BTreeSet;

type Matches = BTreeSet<(usize, usize)>;

/// Reference interpreter: match sets by definition, scanning the text.
fn oracle(ast: &Ast, text: &[u8]) -> Matches {
    match ast {
        Ast::Blank => Matches::new(),
        Ast::Primitive(Primitive::Mgram(bytes)) => occurrences(text, bytes),
        Ast::Primitive(Primitive::Dot) => byte_matches(text, &dot_bytes().collect::<Vec<_>>()),
        Ast::Primitive(Primitive::Range(bytes)) => byte_matches(text, bytes),
        Ast::Union(first, second) => {
            let mut set = oracle(first, text);
            set.extend(oracle(second, text));
            set
        }
        Ast::Concat(left, right) => pairs(&oracle(left, text), &oracle(right, text)),
        Ast::Repeat { inner, kind } => {
            let seed = oracle(inner, text);
            let (min, max) = match kind {
                RepeatKind::ZeroOrMore | RepeatKind::OneOrMore => (1, usize::MAX),
                RepeatKind::MinToMax { min, max } => ((*min).max(1) as usize, *max as usize),
            };
            let mut chain = seed.clone();
            for _ in 1..min {
                chain = pairs(&chain, &seed);
                if chain.is_empty() {
                    return Matches::new();
                }
            }
            let mut set = chain.clone();
            let mut reps = min;
            while reps < max {
                chain = pairs(&chain, &seed);
                if chain.is_empty() {
                    break;
                }
                set.extend(chain.iter().copied());
                reps += 1;
            }
            set
        }
    }
}

fn occurrences(text: &[u8], needle: &[u8]) -> Matches {
    if needle.is_empty() || needle.len() > text.len() {
        return Matches::new();
    }
    (0..=text.len() - needle.len())
        .filter(|&i| &text[i..i + needle.len()] == needle)
        .map(|i| (i, needle.len()))
        .collect()
}

fn byte_matches(text: &[u8], admitted: &[u8]) -> Matches {
    text.iter()
        .enumerate()
        .filter(|(_, b)| admitted.contains(b))
        .map(|(i, _)| (i, 1))
        .collect()
}

fn pairs(left: &Matches, right: &Matches) -> Matches {
    let mut set = Matches::new();
    for &(o, l) in left {
        for &(ro, rl) in right.range((o + l, 0)..=(o + l, usize::MAX)) {
            debug_assert_eq!(ro, o + l);
            set.insert((o, l + rl));
        }
    }
    set
}

/// Random expression trees over a tiny alphabet. `ZeroOrMore` is excluded
/// so the canonical print can never contain a top-level `.*` for the
/// driver to split on.
fn ast_strategy() -> impl Strategy<Value = Ast> {
    let leaf = prop_oneof![
        prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..3)
            .prop_map(|bytes| Ast::Primitive(Primitive::Mgram(bytes))),
        Just(Ast::Primitive(Primitive::Dot)),
        prop::collection::btree_set(prop::sample::select(b"abcdr".to_vec()), 1..4)
            .prop_map(|set| Ast::Primitive(Primitive::Range(set.into_iter().collect()))),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Ast::Concat(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Ast::Union(Box::new(a), Box::new(b))),
            inner.clone().prop_map(|a| Ast::Repeat {
                inner: Box::new(a),
                kind: RepeatKind::OneOrMore,
            }),
            (inner, 1u32..3, 0u32..3).prop_map(|(a, min, extra)| Ast::Repeat {
                inner: Box::new(a),
                kind: RepeatKind::MinToMax {
                    min,
                    max: min + extra,
                },
            }),
        ]
    })
}

fn corpus_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcdr".to_vec()), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn black_box_matches_the_oracle(text in corpus_strategy(), ast in ast_strategy()) {
        let expected = oracle(&ast, &text);
        let index = index(&text, IndexKind::SuffixArray);
        let config = QueryConfig {
            executor: ExecutorKind::BlackBox,
            ..QueryConfig::default()
        };
        let got: Matches = RegexQuery::new(&index, &ast.to_string(), config)
            .unwrap()
            .execute()
            .unwrap()
            .into_iter()
            .map(|m| (m.offset, m.length))
            .collect();
        prop_assert_eq!(got, expected, "expression {}", ast);
    }

    #[test]
    fn pull_matches_the_oracle_when_anchored(
        text in corpus_strategy(),
        ast in ast_strategy(),
    ) {
        prop_assume!(ast.is_prefixed() || ast.is_suffixed());
        let expected = oracle(&ast, &text);
        let index = index(&text, IndexKind::SuffixTree);
        let got: Matches = RegexQuery::new(&index, &ast.to_string(), QueryConfig::default())
            .unwrap()
            .execute()
            .unwrap()
            .into_iter()
            .map(|m| (m.offset, m.length))
            .collect();
        prop_assert_eq!(got, expected, "expression {}", ast);
    }

    #[test]
    fn generated_trees_round_trip_through_the_canonical_form(ast in ast_strategy()) {
        let canonical = ast.to_string();
        let reparsed = parse(&canonical).unwrap();
        prop_assert_eq!(&reparsed, &ast, "canonical {:?}", canonical);
        prop_assert_eq!(reparsed.to_string(), canonical);
    }
}
