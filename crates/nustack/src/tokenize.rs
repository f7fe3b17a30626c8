//! Tokenizer for nustack source text.
//!
//! Produces a single flat token stream in which nested code blocks have
//! already been materialized: a `}` pops the emit buffer back to its
//! matching `{` and replaces the run with one [`Token::Code`]. List
//! brackets survive as marker tokens for the evaluator, which materializes
//! lists at runtime so that list elements are evaluated expressions.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use tracing::trace;

use crate::exception::{Failure, RunResult};
use crate::value::{big_to_f64, write_bytes_repr, write_code, write_float, write_str_repr};

/// One lexeme of a nustack program.
#[derive(Debug, Clone)]
pub enum Token {
    Int(BigInt),
    Float(f64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    /// Backtick-quoted identifier.
    Symbol(String),
    /// A fully-nested quoted program fragment.
    Code(Rc<[Token]>),
    /// A word invocation, dispatched by the evaluator through the scope
    /// chain. Never becomes a stack value.
    Call(String),
    /// `[` marker, resolved by the evaluator.
    ListStart,
    /// `]` marker, resolved by the evaluator.
    ListEnd,
}

/// Token equality follows value equality: int/float pairs compare by
/// numeric value regardless of tag.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => big_to_f64(a) == *b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            (Self::Call(a), Self::Call(b)) => a == b,
            (Self::ListStart, Self::ListStart) | (Self::ListEnd, Self::ListEnd) => true,
            _ => false,
        }
    }
}

/// Renders a token the way it is written in source, so that a
/// pretty-printed stream re-tokenizes to an equal stream.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write_float(f, *x),
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Str(s) => write_str_repr(f, s),
            Self::Bytes(bytes) => write_bytes_repr(f, bytes),
            Self::Symbol(name) => write!(f, "`{name}"),
            Self::Code(body) => write_code(f, body),
            Self::Call(name) => f.write_str(name),
            Self::ListStart => f.write_str("["),
            Self::ListEnd => f.write_str("]"),
        }
    }
}

/// Ordering between two tokens, used when code blocks are compared.
/// Numeric pairs order numerically; same-kind payloads order by payload;
/// everything else is unordered.
pub(crate) fn token_cmp(a: &Token, b: &Token) -> Option<Ordering> {
    match (a, b) {
        (Token::Int(x), Token::Int(y)) => Some(x.cmp(y)),
        (Token::Float(x), Token::Float(y)) => x.partial_cmp(y),
        (Token::Int(x), Token::Float(y)) => big_to_f64(x).partial_cmp(y),
        (Token::Float(x), Token::Int(y)) => x.partial_cmp(&big_to_f64(y)),
        (Token::Bool(x), Token::Bool(y)) => Some(x.cmp(y)),
        (Token::Str(x), Token::Str(y)) => Some(x.cmp(y)),
        (Token::Bytes(x), Token::Bytes(y)) => Some(x.cmp(y)),
        (Token::Symbol(x), Token::Symbol(y)) | (Token::Call(x), Token::Call(y)) => Some(x.cmp(y)),
        (Token::Code(x), Token::Code(y)) => token_seq_cmp(x, y),
        (Token::ListStart, Token::ListStart) | (Token::ListEnd, Token::ListEnd) => {
            Some(Ordering::Equal)
        }
        _ => None,
    }
}

/// Lexicographic ordering over token sequences; unordered as soon as any
/// element pair is.
pub(crate) fn token_seq_cmp(a: &[Token], b: &[Token]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b.iter()) {
        match token_cmp(x, y)? {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Identifier characters: ASCII letters, digits, and this punctuation set.
const IDENT_PUNCT: &str = r"!#$%&()*+,-./:;<=>?@\^_|~";

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || IDENT_PUNCT.contains(c)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{b}' | '\u{c}')
}

/// Entry in the emit buffer: a finished token, or the still-open `{`
/// marker that a later `}` pops back to. Code-start markers never survive
/// into the output.
enum Emit {
    Token(Token),
    CodeStart,
}

/// Tokenizes a complete source string.
///
/// Alternatives are tried at the head of the remaining input in a fixed
/// order; order matters (float before int so `12.5` is one float, bool
/// before call so `#t` never lexes as an identifier). An unrecognized
/// leading character fails with `TokenizeError` carrying the remaining
/// input.
pub fn tokenize(source: &str) -> RunResult<Vec<Token>> {
    let mut rest = source;
    let mut emitted: Vec<Emit> = Vec::new();

    while let Some(c) = rest.chars().next() {
        // comment / whitespace
        if is_space(c) {
            let end = rest.find(|ch| !is_space(ch)).unwrap_or(rest.len());
            rest = &rest[end..];
            continue;
        }
        if let Some(after) = rest.strip_prefix("//") {
            rest = match after.find('\n') {
                Some(nl) => &after[nl + 1..],
                None => "",
            };
            continue;
        }
        if let Some(after) = rest.strip_prefix("/*") {
            let Some(end) = after.find("*/") else {
                return Err(Failure::tokenize_error(format!(
                    "unterminated block comment: {rest}"
                )));
            };
            rest = &after[end + 2..];
            continue;
        }

        // float, then int: `12.5` must lex as one float, while `1.`
        // (digits followed by a bare dot) falls through to a call token
        if let Some((value, len)) = scan_float(rest) {
            trace!(value, "float literal");
            emitted.push(Emit::Token(Token::Float(value)));
            rest = &rest[len..];
            continue;
        }
        if let Some((value, len)) = scan_int(rest) {
            trace!(value = %value, "int literal");
            emitted.push(Emit::Token(Token::Int(value)));
            rest = &rest[len..];
            continue;
        }

        if let Some(after) = rest.strip_prefix("#t") {
            emitted.push(Emit::Token(Token::Bool(true)));
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix("#f") {
            emitted.push(Emit::Token(Token::Bool(false)));
            rest = after;
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, len) = scan_string(rest)?;
            trace!(text = %text, "string literal");
            emitted.push(Emit::Token(Token::Str(text)));
            rest = &rest[len..];
            continue;
        }
        if c == 'b' && matches!(rest[1..].chars().next(), Some('\'' | '"')) {
            let (text, len) = scan_string(&rest[1..])?;
            trace!(text = %text, "bytes literal");
            emitted.push(Emit::Token(Token::Bytes(text.into_bytes())));
            rest = &rest[1 + len..];
            continue;
        }

        match c {
            '[' => {
                emitted.push(Emit::Token(Token::ListStart));
                rest = &rest[1..];
                continue;
            }
            ']' => {
                emitted.push(Emit::Token(Token::ListEnd));
                rest = &rest[1..];
                continue;
            }
            '{' => {
                emitted.push(Emit::CodeStart);
                rest = &rest[1..];
                continue;
            }
            '}' => {
                let mut body = Vec::new();
                loop {
                    match emitted.pop() {
                        Some(Emit::CodeStart) => break,
                        Some(Emit::Token(token)) => body.push(token),
                        None => {
                            return Err(Failure::tokenize_error("unmatched } in source"));
                        }
                    }
                }
                body.reverse();
                trace!(len = body.len(), "code block");
                emitted.push(Emit::Token(Token::Code(body.into())));
                rest = &rest[1..];
                continue;
            }
            _ => {}
        }

        if c == '`' {
            let after = &rest[1..];
            let end = after.find(|ch| !is_ident_char(ch)).unwrap_or(after.len());
            if end > 0 {
                let name = &after[..end];
                trace!(name, "symbol");
                emitted.push(Emit::Token(Token::Symbol(name.to_string())));
                rest = &after[end..];
                continue;
            }
        } else if is_ident_char(c) {
            let end = rest.find(|ch| !is_ident_char(ch)).unwrap_or(rest.len());
            let name = &rest[..end];
            trace!(name, "call");
            emitted.push(Emit::Token(Token::Call(name.to_string())));
            rest = &rest[end..];
            continue;
        }

        return Err(Failure::tokenize_error(format!(
            "no token matches remaining input: {rest}"
        )));
    }

    let mut tokens = Vec::with_capacity(emitted.len());
    for entry in emitted {
        match entry {
            Emit::Token(token) => tokens.push(token),
            Emit::CodeStart => {
                return Err(Failure::tokenize_error("unclosed { in source"));
            }
        }
    }
    Ok(tokens)
}

/// `-? digits* '.' digits+`, so `.5` and `-.5` are floats.
fn scan_float(input: &str) -> Option<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;
    let frac_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == frac_start {
        return None;
    }
    input[..i].parse::<f64>().ok().map(|value| (value, i))
}

/// `-? digits+` not followed by a dot (a trailing dot makes the whole run
/// an identifier instead, e.g. `1.`).
fn scan_int(input: &str) -> Option<(BigInt, usize)> {
    let bytes = input.as_bytes();
    let start = usize::from(bytes.first() == Some(&b'-'));
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == start || bytes.get(i) == Some(&b'.') {
        return None;
    }
    input[..i].parse::<BigInt>().ok().map(|value| (value, i))
}

/// Scans a quoted string starting at `input[0]` (the quote character).
/// Returns the unescaped content and the consumed length including both
/// quotes. Unknown escape sequences are preserved verbatim.
fn scan_string(input: &str) -> RunResult<(String, usize)> {
    let mut chars = input.char_indices();
    let (_, quote) = chars.next().expect("scan_string called on empty input");
    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((out, i + c.len_utf8()));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            break;
        };
        match escaped {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'b' => out.push('\u{8}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{b}'),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Err(Failure::tokenize_error(format!(
        "unterminated string literal: {input}"
    )))
}
