//! Black-box evaluation: bottom-up composition of offset-length sets.
//!
//! Each AST node materializes the full set of `(offset, length)` matches of
//! its sub-expression, composed from primitive index lookups. The sets live
//! in ordered containers keyed on `(offset, length)`, so union is a merge
//! and concatenation pairs each left entry with the right entries starting
//! exactly where it ends (an ordered range probe — the scan never revisits
//! anything an earlier left entry could not reach).

use crate::error::Result;
use crate::index::TextIndex;
use crate::regex::ast::{dot_bytes, Ast, Primitive, RepeatKind};
use crate::regex::{OffsetLength, ResultSet};

/// Bottom-up executor over a shared index.
pub struct BlackBoxExecutor<'a> {
    index: &'a TextIndex,
}

impl<'a> BlackBoxExecutor<'a> {
    pub fn new(index: &'a TextIndex) -> Self {
        BlackBoxExecutor { index }
    }

    /// Materialize the match set of `ast`.
    pub fn execute(&self, ast: &Ast) -> Result<ResultSet> {
        self.compute(ast)
    }

    fn compute(&self, ast: &Ast) -> Result<ResultSet> {
        match ast {
            Ast::Blank => Ok(ResultSet::new()),
            Ast::Primitive(Primitive::Mgram(bytes)) => self.mgram_matches(bytes),
            Ast::Primitive(Primitive::Dot) => self.byte_set_matches(dot_bytes()),
            Ast::Primitive(Primitive::Range(bytes)) => {
                self.byte_set_matches(bytes.iter().copied())
            }
            Ast::Union(first, second) => {
                let mut result = self.compute(first)?;
                result.extend(self.compute(second)?);
                Ok(result)
            }
            Ast::Concat(left, right) => {
                let left_set = self.compute(left)?;
                let right_set = self.compute(right)?;
                Ok(concat_sets(&left_set, &right_set))
            }
            Ast::Repeat { inner, kind } => {
                let inner_set = self.compute(inner)?;
                Ok(repeat_set(&inner_set, *kind))
            }
        }
    }

    /// Matches of a literal: every offset the index reports, at the
    /// literal's length.
    fn mgram_matches(&self, bytes: &[u8]) -> Result<ResultSet> {
        let mut result = ResultSet::new();
        for offset in self.index.search(bytes)? {
            result.insert(OffsetLength {
                offset,
                length: bytes.len(),
            });
        }
        Ok(result)
    }

    /// Matches of a byte class: the union of single-byte literal matches.
    fn byte_set_matches(&self, bytes: impl Iterator<Item = u8>) -> Result<ResultSet> {
        let mut result = ResultSet::new();
        for b in bytes {
            for offset in self.index.search(&[b])? {
                result.insert(OffsetLength { offset, length: 1 });
            }
        }
        Ok(result)
    }
}

/// All `(o, l_a + l_b)` with `(o, l_a)` on the left and `(o + l_a, l_b)` on
/// the right. For each left entry the right set is probed at exactly the
/// left entry's end, so every right length starting there pairs up.
pub(crate) fn concat_sets(left: &ResultSet, right: &ResultSet) -> ResultSet {
    let mut result = ResultSet::new();
    for l in left {
        for r in right.range(OffsetLength::at_offset(l.end())) {
            result.insert(OffsetLength {
                offset: l.offset,
                length: l.length + r.length,
            });
        }
    }
    result
}

/// Fixpoint repetition: union successive self-concatenations until one
/// comes back empty. Lengths grow by at least one byte per round, so the
/// corpus length bounds the iteration. Zero-length matches are never
/// emitted, which makes `*` behave as `+`.
fn repeat_set(inner: &ResultSet, kind: RepeatKind) -> ResultSet {
    match kind {
        RepeatKind::ZeroOrMore | RepeatKind::OneOrMore => {
            let mut result = inner.clone();
            let mut chain = inner.clone();
            loop {
                chain = concat_sets(&chain, inner);
                if chain.is_empty() {
                    return result;
                }
                result.extend(chain.iter().copied());
            }
        }
        RepeatKind::MinToMax { min, max } => {
            let min = min.max(1);
            let mut chain = inner.clone();
            let mut reps = 1;
            while reps < min {
                chain = concat_sets(&chain, inner);
                reps += 1;
                if chain.is_empty() {
                    return ResultSet::new();
                }
            }

            let mut result = chain.clone();
            while reps < max {
                chain = concat_sets(&chain, inner);
                if chain.is_empty() {
                    break;
                }
                result.extend(chain.iter().copied());
                reps += 1;
            }
            result
        }
    }
}
