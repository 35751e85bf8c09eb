//! Partial-scan evaluation: anchor on literals, walk the corpus outward.
//!
//! A sub-expression shaped as an alternating sequence of literal runs and
//! single-byte operators (`.`, `[class]`, `[class]+`, `[class]*`) does not
//! need full set composition. Each literal anchors via the index; operators
//! between anchors are satisfied by reading corpus bytes directly through
//! `char_at`, extending matches to the right as tokens arrive and
//! backtracking to the left for operators that preceded the first literal.
//! The extension rules are symmetric in both directions:
//!
//! - `.`        — one byte, any printable non-newline
//! - `[class]`  — one byte, must be in the class
//! - `[class]+` — at least one byte in the class, every run length kept
//! - `[class]*` — the unextended match plus every `+` extension
//!
//! Expressions outside this shape (groups, unions, repetition on literals,
//! quantified dots, no literal at all) are not scanned; the driver falls
//! back to the pure bottom-up executor, which this variant must agree with.

use crate::error::Result;
use crate::index::TextIndex;
use crate::regex::ast::{DOT_MAX, DOT_MIN};
use crate::regex::blackbox::concat_sets;
use crate::regex::{OffsetLength, ResultSet};

/// How many bytes an operator may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quant {
    One,
    Plus,
    Star,
}

/// One token of the scannable shape.
#[derive(Debug, PartialEq, Eq)]
enum ScanToken {
    Literal(Vec<u8>),
    Dot,
    Class { bytes: Vec<u8>, quant: Quant },
}

/// Tokenize a sub-expression into the scannable shape, or `None` when it
/// uses anything the scanner cannot anchor.
fn tokenize(expression: &str) -> Option<Vec<ScanToken>> {
    let input = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut literal = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        match input[pos] {
            b'[' => {
                if !literal.is_empty() {
                    tokens.push(ScanToken::Literal(std::mem::take(&mut literal)));
                }
                let (bytes, next) = scan_class(input, pos + 1)?;
                pos = next;
                let quant = match input.get(pos) {
                    Some(b'+') => {
                        pos += 1;
                        Quant::Plus
                    }
                    Some(b'*') => {
                        pos += 1;
                        Quant::Star
                    }
                    _ => Quant::One,
                };
                tokens.push(ScanToken::Class { bytes, quant });
            }
            b'.' => {
                if !literal.is_empty() {
                    tokens.push(ScanToken::Literal(std::mem::take(&mut literal)));
                }
                pos += 1;
                // A quantified dot is not scannable
                if matches!(input.get(pos), Some(b'+') | Some(b'*')) {
                    return None;
                }
                tokens.push(ScanToken::Dot);
            }
            b'\\' => {
                literal.push(*input.get(pos + 1)?);
                pos += 2;
            }
            // Any other operator takes the expression out of scan shape
            b'(' | b')' | b'|' | b'{' | b'}' | b']' | b'*' | b'+' => return None,
            b => {
                literal.push(b);
                pos += 1;
            }
        }
    }
    if !literal.is_empty() {
        tokens.push(ScanToken::Literal(literal));
    }

    // Without a literal there is nothing to anchor on
    if tokens.iter().any(|t| matches!(t, ScanToken::Literal(_))) {
        Some(tokens)
    } else {
        None
    }
}

/// Expand a `[...]` body starting at `pos`; returns the admitted bytes and
/// the position after the closing bracket.
fn scan_class(input: &[u8], mut pos: usize) -> Option<(Vec<u8>, usize)> {
    let mut bytes = Vec::new();
    loop {
        match input.get(pos)? {
            b']' => {
                pos += 1;
                break;
            }
            _ => {
                let lo = read_member(input, &mut pos)?;
                if input.get(pos) == Some(&b'-') && input.get(pos + 1) != Some(&b']') {
                    pos += 1;
                    let hi = read_member(input, &mut pos)?;
                    if lo > hi {
                        return None;
                    }
                    bytes.extend(lo..=hi);
                } else {
                    bytes.push(lo);
                }
            }
        }
    }
    if bytes.is_empty() {
        None
    } else {
        Some((bytes, pos))
    }
}

fn read_member(input: &[u8], pos: &mut usize) -> Option<u8> {
    let b = *input.get(*pos)?;
    if b == b'\\' {
        let escaped = *input.get(*pos + 1)?;
        *pos += 2;
        Some(escaped)
    } else {
        *pos += 1;
        Some(b)
    }
}

/// Can this sub-expression run through the scanner at all?
pub fn supports(expression: &str) -> bool {
    tokenize(expression).is_some()
}

/// Execute a scannable sub-expression. Callers must have checked
/// [`supports`]; unscannable input returns an empty set.
pub fn execute(index: &TextIndex, expression: &str) -> Result<ResultSet> {
    let Some(tokens) = tokenize(expression) else {
        return Ok(ResultSet::new());
    };

    let mut anchored: Option<ResultSet> = None;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            ScanToken::Literal(bytes) => {
                let mut current = ResultSet::new();
                for offset in index.search(bytes)? {
                    current.insert(OffsetLength {
                        offset,
                        length: bytes.len(),
                    });
                }

                match anchored.take() {
                    None => {
                        // First anchor: satisfy everything before it by
                        // walking left
                        let mut results = current;
                        for earlier in tokens[..i].iter().rev() {
                            results = extend_left(index, &results, earlier);
                        }
                        anchored = Some(results);
                    }
                    Some(previous) => {
                        anchored = Some(concat_sets(&previous, &current));
                    }
                }
            }
            operator => {
                // Operators before the first literal wait for backtracking
                if let Some(current) = anchored.take() {
                    anchored = Some(extend_right(index, &current, operator));
                }
            }
        }
    }

    Ok(anchored.unwrap_or_default())
}

fn is_dot_byte(b: u8) -> bool {
    (DOT_MIN..=DOT_MAX).contains(&b)
}

/// Grow every match one operator to the right, reading corpus bytes.
fn extend_right(index: &TextIndex, results: &ResultSet, token: &ScanToken) -> ResultSet {
    let text_len = index.corpus().text_len();
    let admit = |pos: usize, bytes: Option<&[u8]>| -> bool {
        if pos >= text_len {
            return false;
        }
        let b = index.char_at(pos);
        match bytes {
            Some(set) => set.contains(&b),
            None => is_dot_byte(b),
        }
    };

    let mut extended = ResultSet::new();
    match token {
        ScanToken::Literal(_) => unreachable!("literals are anchored, not walked"),
        ScanToken::Dot => {
            for m in results {
                if admit(m.end(), None) {
                    extended.insert(m.grown_right(1));
                }
            }
        }
        ScanToken::Class { bytes, quant } => {
            if *quant == Quant::Star {
                extended.extend(results.iter().copied());
            }
            for m in results {
                match quant {
                    Quant::One => {
                        if admit(m.end(), Some(bytes)) {
                            extended.insert(m.grown_right(1));
                        }
                    }
                    Quant::Plus | Quant::Star => {
                        let mut grow = 0;
                        while admit(m.end() + grow, Some(bytes)) {
                            grow += 1;
                            extended.insert(m.grown_right(grow));
                        }
                    }
                }
            }
        }
    }
    extended
}

/// Mirror of [`extend_right`]: grow every match one operator to the left.
fn extend_left(index: &TextIndex, results: &ResultSet, token: &ScanToken) -> ResultSet {
    let admit = |m: &OffsetLength, back: usize, bytes: Option<&[u8]>| -> bool {
        if m.offset < back {
            return false;
        }
        let b = index.char_at(m.offset - back);
        match bytes {
            Some(set) => set.contains(&b),
            None => is_dot_byte(b),
        }
    };

    let mut extended = ResultSet::new();
    match token {
        ScanToken::Literal(_) => unreachable!("literals are anchored, not walked"),
        ScanToken::Dot => {
            for m in results {
                if admit(m, 1, None) {
                    extended.insert(m.grown_left(1));
                }
            }
        }
        ScanToken::Class { bytes, quant } => {
            if *quant == Quant::Star {
                extended.extend(results.iter().copied());
            }
            for m in results {
                match quant {
                    Quant::One => {
                        if admit(m, 1, Some(bytes)) {
                            extended.insert(m.grown_left(1));
                        }
                    }
                    Quant::Plus | Quant::Star => {
                        let mut grow = 1;
                        while admit(m, grow, Some(bytes)) {
                            extended.insert(m.grown_left(grow));
                            grow += 1;
                        }
                    }
                }
            }
        }
    }
    extended
}
