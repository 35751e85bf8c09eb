//! The expression tree shared by every evaluation strategy.
//!
//! A tagged tree with boxed children; expressions are never cyclic, so
//! unique ownership is all the structure needs. `Display` renders the
//! canonical form: parsing a string, printing the tree, and parsing the
//! output yields the same tree again. The printer inserts parentheses
//! exactly where reparsing would otherwise merge adjacent literal runs into
//! one m-gram or rebind a repetition.

use std::fmt;

/// Bytes matched by `.`: printable ASCII, newline excluded.
pub const DOT_MIN: u8 = 0x20;
pub const DOT_MAX: u8 = 0x7E;

/// Iterate the bytes `.` admits.
pub fn dot_bytes() -> impl Iterator<Item = u8> {
    DOT_MIN..=DOT_MAX
}

/// Leaf alternatives of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Literal byte string.
    Mgram(Vec<u8>),
    /// Any printable non-newline byte.
    Dot,
    /// Expanded enumeration of the bytes a `[...]` class admits.
    Range(Vec<u8>),
}

/// Repetition shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    ZeroOrMore,
    OneOrMore,
    MinToMax { min: u32, max: u32 },
}

/// Regular-expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string; produced by empty terms.
    Blank,
    Primitive(Primitive),
    Concat(Box<Ast>, Box<Ast>),
    Union(Box<Ast>, Box<Ast>),
    Repeat { inner: Box<Ast>, kind: RepeatKind },
}

impl Ast {
    /// Is the leftmost primitive reachable through concatenations a literal
    /// m-gram? The pull planner can only anchor a forward enumeration on
    /// such an expression.
    pub fn is_prefixed(&self) -> bool {
        match self {
            Ast::Blank => false,
            Ast::Primitive(p) => matches!(p, Primitive::Mgram(_)),
            Ast::Repeat { inner, .. } => inner.is_prefixed(),
            Ast::Concat(left, _) => left.is_prefixed(),
            Ast::Union(first, second) => first.is_prefixed() && second.is_prefixed(),
        }
    }

    /// Mirror of [`Ast::is_prefixed`] for the rightmost primitive; anchors
    /// the backward enumeration.
    pub fn is_suffixed(&self) -> bool {
        match self {
            Ast::Blank => false,
            Ast::Primitive(p) => matches!(p, Primitive::Mgram(_)),
            Ast::Repeat { inner, .. } => inner.is_suffixed(),
            Ast::Concat(_, right) => right.is_suffixed(),
            Ast::Union(first, second) => first.is_suffixed() && second.is_suffixed(),
        }
    }

    /// Does the canonical print of this node end in a bare literal byte?
    /// Used to decide whether a following literal must be parenthesized to
    /// survive reparsing.
    fn ends_in_literal(&self) -> bool {
        match self {
            Ast::Primitive(Primitive::Mgram(_)) => true,
            Ast::Concat(_, right) => right.ends_in_literal(),
            _ => false,
        }
    }

    /// Does the canonical print of this node start with a bare literal
    /// byte? Only meaningful for nodes the printer leaves unparenthesized.
    fn starts_with_literal(&self) -> bool {
        match self {
            Ast::Primitive(Primitive::Mgram(_)) => true,
            Ast::Repeat { inner, .. } => matches!(**inner, Ast::Primitive(Primitive::Mgram(_))),
            _ => false,
        }
    }
}

/// Metacharacters that need escaping inside a literal run.
fn is_meta(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'|' | b'*' | b'+' | b'.'
    )
}

fn push_mgram(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        if is_meta(b) {
            out.push(b'\\');
        }
        out.push(b);
    }
}

fn push_class(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'[');
    for &b in bytes {
        if matches!(b, b']' | b'\\' | b'-') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b']');
}

fn push_primitive(out: &mut Vec<u8>, primitive: &Primitive) {
    match primitive {
        Primitive::Mgram(bytes) => push_mgram(out, bytes),
        Primitive::Dot => out.push(b'.'),
        Primitive::Range(bytes) => push_class(out, bytes),
    }
}

fn push_paren(out: &mut Vec<u8>, ast: &Ast) {
    out.push(b'(');
    push_union(out, ast);
    out.push(b')');
}

/// Union level: `|` is right-associative, so a first operand that is itself
/// a union keeps its parentheses.
fn push_union(out: &mut Vec<u8>, ast: &Ast) {
    match ast {
        Ast::Union(first, second) => {
            if matches!(**first, Ast::Union(..)) {
                push_paren(out, first);
            } else {
                push_term(out, first);
            }
            out.push(b'|');
            push_union(out, second);
        }
        _ => push_term(out, ast),
    }
}

/// Term level: concatenation is left-associative; a right operand that is a
/// concat or union needs parentheses, as does a literal that would merge
/// with the bytes printed just before it.
fn push_term(out: &mut Vec<u8>, ast: &Ast) {
    match ast {
        Ast::Concat(left, right) => {
            if matches!(**left, Ast::Union(..)) {
                push_paren(out, left);
            } else {
                push_term(out, left);
            }
            let needs_paren = matches!(**right, Ast::Union(..) | Ast::Concat(..))
                || (left.ends_in_literal() && right.starts_with_literal());
            if needs_paren {
                push_paren(out, right);
            } else {
                push_factor(out, right);
            }
        }
        Ast::Union(..) => push_paren(out, ast),
        _ => push_factor(out, ast),
    }
}

/// Factor level: repetition binds the whole preceding m-gram run, so a
/// primitive operand prints bare and anything structured gets parentheses.
fn push_factor(out: &mut Vec<u8>, ast: &Ast) {
    match ast {
        Ast::Blank => out.extend_from_slice(b"()"),
        Ast::Primitive(p) => push_primitive(out, p),
        Ast::Repeat { inner, kind } => {
            match &**inner {
                Ast::Primitive(p) => push_primitive(out, p),
                other => push_paren(out, other),
            }
            match kind {
                RepeatKind::ZeroOrMore => out.push(b'*'),
                RepeatKind::OneOrMore => out.push(b'+'),
                RepeatKind::MinToMax { min, max } => {
                    out.extend_from_slice(format!("{{{},{}}}", min, max).as_bytes());
                }
            }
        }
        Ast::Concat(..) | Ast::Union(..) => push_paren(out, ast),
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        match self {
            // A lone blank is the canonical empty expression
            Ast::Blank => {}
            other => push_union(&mut out, other),
        }
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

/// One-line structural rendering used by the shell's explain output.
pub fn explain(ast: &Ast) -> String {
    match ast {
        Ast::Blank => "<blank>".to_string(),
        Ast::Primitive(p) => {
            let mut out = Vec::new();
            push_primitive(&mut out, p);
            format!("\"{}\"", String::from_utf8_lossy(&out))
        }
        Ast::Repeat { inner, .. } => format!("REPEAT({})", explain(inner)),
        Ast::Concat(left, right) => format!("({} CONCAT {})", explain(left), explain(right)),
        Ast::Union(first, second) => format!("({} OR {})", explain(first), explain(second)),
    }
}
