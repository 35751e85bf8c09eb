//! Pull-based evaluation: enumerate the token language, then look it up.
//!
//! Two phases. First the executor materializes the finite set of concrete
//! byte strings the expression can match, growing tokens from the anchored
//! end and pruning every extension that does not occur in the corpus
//! (`index.contains`). Pruning is what keeps repetition finite: an extension
//! absent from the corpus can never reappear in a longer token. Then each
//! surviving token dispatches to `index.search` and the offsets are
//! collected as `(offset, length)` pairs.
//!
//! The forward variant builds tokens left to right; the backward variant
//! mirrors it, recursing into concatenations right first and prepending.
//! The driver picks the direction whose end carries a literal anchor; an
//! expression anchored at neither end is refused before this module runs.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::index::TextIndex;
use crate::regex::ast::{dot_bytes, Ast, Primitive, RepeatKind};
use crate::regex::{OffsetLength, ResultSet};

/// Token set produced by the enumeration phase.
type TokenSet = BTreeSet<Vec<u8>>;

/// Growth direction for the enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Two-phase executor over a shared index.
pub struct PullExecutor<'a> {
    index: &'a TextIndex,
}

impl<'a> PullExecutor<'a> {
    pub fn new(index: &'a TextIndex) -> Self {
        PullExecutor { index }
    }

    /// Enumerate the expression's tokens in the given direction and resolve
    /// each one through the index.
    pub fn execute(&self, ast: &Ast, direction: Direction) -> Result<ResultSet> {
        let tokens = self.compute(ast, direction)?;
        let mut result = ResultSet::new();
        for token in tokens {
            for offset in self.index.search(&token)? {
                result.insert(OffsetLength {
                    offset,
                    length: token.len(),
                });
            }
        }
        Ok(result)
    }

    /// The token language of `ast`.
    fn compute(&self, ast: &Ast, direction: Direction) -> Result<TokenSet> {
        match ast {
            Ast::Blank => Ok(TokenSet::new()),
            Ast::Primitive(Primitive::Mgram(bytes)) => {
                Ok(TokenSet::from([bytes.clone()]))
            }
            Ast::Primitive(Primitive::Dot) => self.surviving_bytes(dot_bytes()),
            Ast::Primitive(Primitive::Range(bytes)) => {
                self.surviving_bytes(bytes.iter().copied())
            }
            Ast::Union(first, second) => {
                let mut tokens = self.compute(first, direction)?;
                tokens.extend(self.compute(second, direction)?);
                Ok(tokens)
            }
            Ast::Concat(left, right) => {
                let (anchor, extension) = match direction {
                    Direction::Forward => (left, right),
                    Direction::Backward => (right, left),
                };
                let mut tokens = TokenSet::new();
                for token in self.compute(anchor, direction)? {
                    tokens.extend(self.extend(extension, &token, direction)?);
                }
                Ok(tokens)
            }
            Ast::Repeat { inner, kind } => {
                let seed = self.compute(inner, direction)?;
                self.repeat_tokens(inner, &seed, *kind, direction)
            }
        }
    }

    /// Single bytes admitted by a class that actually occur in the corpus.
    fn surviving_bytes(&self, bytes: impl Iterator<Item = u8>) -> Result<TokenSet> {
        let mut tokens = TokenSet::new();
        for b in bytes {
            if self.index.contains(&[b])? {
                tokens.insert(vec![b]);
            }
        }
        Ok(tokens)
    }

    /// Tokens `base · u` (forward) or `u · base` (backward) where `u` is
    /// consistent with `ast`, pruned to those occurring in the corpus.
    fn extend(&self, ast: &Ast, base: &[u8], direction: Direction) -> Result<TokenSet> {
        match ast {
            // Extending by the empty language yields nothing
            Ast::Blank => Ok(TokenSet::new()),
            Ast::Primitive(Primitive::Mgram(bytes)) => {
                let token = join(base, bytes, direction);
                if self.index.contains(&token)? {
                    Ok(TokenSet::from([token]))
                } else {
                    Ok(TokenSet::new())
                }
            }
            Ast::Primitive(Primitive::Dot) => self.extend_by_bytes(base, dot_bytes(), direction),
            Ast::Primitive(Primitive::Range(bytes)) => {
                self.extend_by_bytes(base, bytes.iter().copied(), direction)
            }
            Ast::Union(first, second) => {
                let mut tokens = self.extend(first, base, direction)?;
                tokens.extend(self.extend(second, base, direction)?);
                Ok(tokens)
            }
            Ast::Concat(left, right) => {
                let (near, far) = match direction {
                    Direction::Forward => (left, right),
                    Direction::Backward => (right, left),
                };
                let mut tokens = TokenSet::new();
                for token in self.extend(near, base, direction)? {
                    tokens.extend(self.extend(far, &token, direction)?);
                }
                Ok(tokens)
            }
            Ast::Repeat { inner, kind } => {
                let seed = self.extend(inner, base, direction)?;
                self.repeat_tokens(inner, &seed, *kind, direction)
            }
        }
    }

    fn extend_by_bytes(
        &self,
        base: &[u8],
        bytes: impl Iterator<Item = u8>,
        direction: Direction,
    ) -> Result<TokenSet> {
        let mut tokens = TokenSet::new();
        for b in bytes {
            let token = join(base, &[b], direction);
            if self.index.contains(&token)? {
                tokens.insert(token);
            }
        }
        Ok(tokens)
    }

    /// Iterate one-step extensions of the accumulated tokens until nothing
    /// new survives pruning. `seed` is the one-repetition token set; both
    /// `*` and `+` start there (no zero-length matches), and bounded
    /// repetition counts its rounds.
    fn repeat_tokens(
        &self,
        inner: &Ast,
        seed: &TokenSet,
        kind: RepeatKind,
        direction: Direction,
    ) -> Result<TokenSet> {
        match kind {
            RepeatKind::ZeroOrMore | RepeatKind::OneOrMore => {
                let mut tokens = seed.clone();
                let mut frontier = seed.clone();
                while !frontier.is_empty() {
                    let mut next = TokenSet::new();
                    for token in &frontier {
                        for extended in self.extend(inner, token, direction)? {
                            if !tokens.contains(&extended) {
                                next.insert(extended);
                            }
                        }
                    }
                    tokens.extend(next.iter().cloned());
                    frontier = next;
                }
                Ok(tokens)
            }
            RepeatKind::MinToMax { min, max } => {
                let min = min.max(1);
                let mut frontier = seed.clone();
                for _ in 1..min {
                    let mut next = TokenSet::new();
                    for token in &frontier {
                        next.extend(self.extend(inner, token, direction)?);
                    }
                    frontier = next;
                    if frontier.is_empty() {
                        return Ok(TokenSet::new());
                    }
                }

                let mut tokens = frontier.clone();
                for _ in min..max {
                    let mut next = TokenSet::new();
                    for token in &frontier {
                        next.extend(self.extend(inner, token, direction)?);
                    }
                    if next.is_empty() {
                        break;
                    }
                    tokens.extend(next.iter().cloned());
                    frontier = next;
                }
                Ok(tokens)
            }
        }
    }
}

#[inline]
fn join(base: &[u8], addition: &[u8], direction: Direction) -> Vec<u8> {
    let mut token = Vec::with_capacity(base.len() + addition.len());
    match direction {
        Direction::Forward => {
            token.extend_from_slice(base);
            token.extend_from_slice(addition);
        }
        Direction::Backward => {
            token.extend_from_slice(addition);
            token.extend_from_slice(base);
        }
    }
    token
}
