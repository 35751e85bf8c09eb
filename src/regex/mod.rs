//! Regular-expression evaluation over a text index.
//!
//! The driver splits an expression on its top-level `.*` wildcards, hands
//! each sub-expression to an evaluation strategy, and folds the
//! per-sub-expression match sets left to right with a wildcard join. Three
//! strategies share the one expression tree: pure bottom-up set composition
//! ([`blackbox`]), the literal-anchored corpus walk ([`scan`]) as an
//! optional fast path for the shapes it supports, and pull-based token
//! enumeration ([`pull`]) with a planner that picks the growth direction
//! from where the expression carries a literal anchor.

pub mod ast;
pub mod blackbox;
pub mod parser;
pub mod pull;
pub mod scan;

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::index::TextIndex;

use ast::Ast;
use blackbox::BlackBoxExecutor;
use pull::{Direction, PullExecutor};

/// One match: a start position in the corpus and the matched byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetLength {
    pub offset: usize,
    pub length: usize,
}

impl OffsetLength {
    /// First position after the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Ordered-set probe for every match starting exactly at `offset`.
    #[inline]
    pub(crate) fn at_offset(offset: usize) -> RangeInclusive<OffsetLength> {
        OffsetLength { offset, length: 0 }..=OffsetLength {
            offset,
            length: usize::MAX,
        }
    }

    /// The match grown `by` bytes to the right.
    #[inline]
    pub(crate) fn grown_right(&self, by: usize) -> OffsetLength {
        OffsetLength {
            offset: self.offset,
            length: self.length + by,
        }
    }

    /// The match grown `by` bytes to the left.
    #[inline]
    pub(crate) fn grown_left(&self, by: usize) -> OffsetLength {
        OffsetLength {
            offset: self.offset - by,
            length: self.length + by,
        }
    }
}

/// Match sets iterate in `(offset, length)` order; composition relies on it.
pub type ResultSet = BTreeSet<OffsetLength>;

/// Which evaluation strategy the driver dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutorKind {
    /// Bottom-up set composition.
    BlackBox,
    /// Token enumeration resolved through the index.
    #[default]
    Pull,
}

/// Driver configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryConfig {
    pub executor: ExecutorKind,
    /// Route scannable sub-expressions through the partial-scan walker
    /// instead of full set composition (black-box only).
    pub partial_scan: bool,
    /// Upper bound on the byte gap a `.*` may span; unbounded when unset.
    pub gap_bound: Option<usize>,
}

/// A compiled query: the expression split on its wildcards, ready to run
/// against one index.
pub struct RegexQuery<'a> {
    index: &'a TextIndex,
    sub_expressions: Vec<String>,
    config: QueryConfig,
}

impl<'a> RegexQuery<'a> {
    /// Split `expression` on top-level `.*` occurrences and parse each
    /// sub-expression (parse failures surface before anything executes).
    pub fn new(index: &'a TextIndex, expression: &str, config: QueryConfig) -> Result<Self> {
        let sub_expressions: Vec<String> = split_wildcards(expression)
            .into_iter()
            .filter(|sub| !sub.is_empty())
            .collect();
        if sub_expressions.is_empty() {
            return Err(Error::Query(
                "expression is nothing but wildcards".to_string(),
            ));
        }
        for sub in &sub_expressions {
            parser::parse(sub)?;
        }
        Ok(RegexQuery {
            index,
            sub_expressions,
            config,
        })
    }

    #[inline]
    pub fn sub_expressions(&self) -> &[String] {
        &self.sub_expressions
    }

    /// Evaluate every sub-expression and fold across the wildcards.
    pub fn execute(&self) -> Result<ResultSet> {
        let mut results: Vec<ResultSet> = Vec::with_capacity(self.sub_expressions.len());
        for sub in &self.sub_expressions {
            results.push(self.sub_query(sub)?);
        }

        let mut folded = results.into_iter();
        let mut accumulator = folded.next().expect("at least one sub-expression");
        for right in folded {
            accumulator = wildcard_join(&accumulator, &right, self.config.gap_bound);
        }
        Ok(accumulator)
    }

    /// Evaluate one wildcard-free sub-expression.
    fn sub_query(&self, sub_expression: &str) -> Result<ResultSet> {
        match self.config.executor {
            ExecutorKind::BlackBox => {
                if self.config.partial_scan && scan::supports(sub_expression) {
                    return scan::execute(self.index, sub_expression);
                }
                let ast = parser::parse(sub_expression)?;
                BlackBoxExecutor::new(self.index).execute(&ast)
            }
            ExecutorKind::Pull => {
                let ast = parser::parse(sub_expression)?;
                let direction = plan_direction(&ast)?;
                PullExecutor::new(self.index).execute(&ast, direction)
            }
        }
    }

    /// Render the parsed sub-expression trees, `***`-separated, for the
    /// shell's explain output.
    pub fn explain(&self) -> String {
        let mut out = String::from("***");
        for sub in &self.sub_expressions {
            if let Ok(ast) = parser::parse(sub) {
                out.push_str(&ast::explain(&ast));
            }
            out.push_str("***");
        }
        out
    }
}

/// Pick the pull direction: anchor on a literal suffix when there is one or
/// when no literal prefix exists; otherwise grow forward from the prefix.
/// With neither end anchored, enumeration cannot be pruned and the query is
/// refused.
fn plan_direction(ast: &Ast) -> Result<Direction> {
    let prefixed = ast.is_prefixed();
    let suffixed = ast.is_suffixed();
    if !prefixed && !suffixed {
        return Err(Error::Query(
            "pull execution needs a literal anchor at one end of the expression".to_string(),
        ));
    }
    if suffixed || !prefixed {
        Ok(Direction::Backward)
    } else {
        Ok(Direction::Forward)
    }
}

/// Split on `.*` outside classes, groups, and escapes. A `.*` nested in
/// parentheses stays inside its sub-expression and is evaluated there.
fn split_wildcards(expression: &str) -> Vec<String> {
    let bytes = expression.as_bytes();
    let mut parts = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' if i + 1 < bytes.len() => {
                current.push(b'\\');
                current.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            b'(' if !in_class => depth += 1,
            b')' if !in_class && depth > 0 => depth -= 1,
            b'.' if !in_class && depth == 0 && bytes.get(i + 1) == Some(&b'*') => {
                let part = std::mem::take(&mut current);
                parts.push(String::from_utf8_lossy(&part).into_owned());
                i += 2;
                continue;
            }
            _ => {}
        }
        current.push(b);
        i += 1;
    }
    parts.push(String::from_utf8_lossy(&current).into_owned());
    parts
}

/// Pair every left match with the right matches starting at or after its
/// end (bounded by `gap` when set); each pair covers from the left start to
/// the right end.
fn wildcard_join(left: &ResultSet, right: &ResultSet, gap: Option<usize>) -> ResultSet {
    let mut joined = ResultSet::new();
    for l in left {
        let from = OffsetLength {
            offset: l.end(),
            length: 0,
        };
        for r in right.range(from..) {
            if let Some(bound) = gap {
                if r.offset > l.end() + bound {
                    break;
                }
            }
            joined.insert(OffsetLength {
                offset: l.offset,
                length: r.end() - l.offset,
            });
        }
    }
    joined
}
