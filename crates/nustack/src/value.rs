use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::exception::{Failure, RunResult};
use crate::module::NativeWord;
use crate::scope::ScopeRef;
use crate::tokenize::{Token, token_seq_cmp};

/// Runtime value of the language.
///
/// Every value carries exactly one tag. `call` exists only as a token kind
/// and never appears on the operand stack; `any` is the escape hatch used
/// when iteration produces something that is not already a value (bytes of a
/// byte string, characters of a string) and by `or`/`and`.
#[derive(Debug, Clone)]
pub enum Value {
    /// Arbitrary-precision signed integer.
    Int(BigInt),
    /// 64-bit float.
    Float(f64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    /// A quoted name; pushed as data, never looked up.
    Symbol(String),
    /// Heterogeneous ordered sequence.
    List(Vec<Value>),
    /// A quoted program fragment. The token sequence is immutable after
    /// capture; clones share it.
    Code(Rc<[Token]>),
    /// A host callable registered through a [`crate::Module`].
    Native(Rc<NativeWord>),
    /// A first-class handle to an evaluated module's outermost frame.
    Scope(ScopeRef),
    /// Wrapped value with the `any` tag.
    Any(Box<Value>),
}

impl Value {
    /// The tag name shown by `show.repr` / `peek.repr`.
    #[must_use]
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Symbol(_) => "symbol",
            Self::List(_) => "list",
            Self::Code(_) => "code",
            Self::Native(_) => "native",
            Self::Scope(_) => "scope",
            Self::Any(_) => "any",
        }
    }

    /// Truthiness as used by `if`, `while`, `not`, `to.bool` and friends.
    ///
    /// Zero numbers, `#f`, and empty strings/bytes/lists/code are falsy;
    /// `any` delegates to its payload; natives and scope-refs are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => !n.is_zero(),
            Self::Float(x) => *x != 0.0,
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
            Self::Symbol(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Code(body) => !body.is_empty(),
            Self::Native(_) | Self::Scope(_) => true,
            Self::Any(inner) => inner.is_truthy(),
        }
    }

    /// The numeric payload, failing with `TypeMismatch` for non-numbers.
    pub(crate) fn as_number(&self) -> RunResult<f64> {
        match self {
            Self::Int(n) => Ok(big_to_f64(n)),
            Self::Float(x) => Ok(*x),
            other => Err(Failure::type_mismatch(format!(
                "expected a number, found {}",
                other.tag_name()
            ))),
        }
    }

    /// Addition: numeric on numbers (same tag preserved, mixed promotes to
    /// float), payload concatenation on strings, bytes, lists and code.
    pub(crate) fn add(self, other: Self) -> RunResult<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(a + b)),
            (Self::Float(a), Self::Float(b)) => Ok(Self::Float(a + b)),
            (Self::Int(a), Self::Float(b)) => Ok(Self::Float(big_to_f64(&a) + b)),
            (Self::Float(a), Self::Int(b)) => Ok(Self::Float(a + big_to_f64(&b))),
            (Self::Str(mut a), Self::Str(b)) => {
                a.push_str(&b);
                Ok(Self::Str(a))
            }
            (Self::Bytes(mut a), Self::Bytes(b)) => {
                a.extend_from_slice(&b);
                Ok(Self::Bytes(a))
            }
            (Self::List(mut a), Self::List(b)) => {
                a.extend(b);
                Ok(Self::List(a))
            }
            (Self::Code(a), Self::Code(b)) => {
                let mut tokens: Vec<Token> = a.iter().cloned().collect();
                tokens.extend(b.iter().cloned());
                Ok(Self::Code(tokens.into()))
            }
            (a, b) => Err(Failure::type_mismatch(format!(
                "cannot add {} and {}",
                a.tag_name(),
                b.tag_name()
            ))),
        }
    }

    /// Subtraction; numbers only.
    pub(crate) fn sub(self, other: Self) -> RunResult<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(a - b)),
            (Self::Float(a), Self::Float(b)) => Ok(Self::Float(a - b)),
            (Self::Int(a), Self::Float(b)) => Ok(Self::Float(big_to_f64(&a) - b)),
            (Self::Float(a), Self::Int(b)) => Ok(Self::Float(a - big_to_f64(&b))),
            (a, b) => Err(Failure::type_mismatch(format!(
                "cannot subtract {} and {}",
                a.tag_name(),
                b.tag_name()
            ))),
        }
    }

    /// Multiplication; numbers only.
    pub(crate) fn mul(self, other: Self) -> RunResult<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(a * b)),
            (Self::Float(a), Self::Float(b)) => Ok(Self::Float(a * b)),
            (Self::Int(a), Self::Float(b)) => Ok(Self::Float(big_to_f64(&a) * b)),
            (Self::Float(a), Self::Int(b)) => Ok(Self::Float(a * big_to_f64(&b))),
            (a, b) => Err(Failure::type_mismatch(format!(
                "cannot multiply {} and {}",
                a.tag_name(),
                b.tag_name()
            ))),
        }
    }

    /// Division always produces a float; `1 0 /` follows IEEE semantics.
    pub(crate) fn div(self, other: Self) -> RunResult<Self> {
        Ok(Self::Float(self.as_number()? / other.as_number()?))
    }

    /// Modulo always produces a float; the result's sign follows the
    /// divisor.
    pub(crate) fn rem(self, other: Self) -> RunResult<Self> {
        let a = self.as_number()?;
        let b = other.as_number()?;
        Ok(Self::Float(a - b * (a / b).floor()))
    }

    /// The repr form: like the display form, but strings are quoted.
    #[must_use]
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.write_repr(&mut out).expect("string write cannot fail");
        out
    }

    fn write_repr<W: fmt::Write>(&self, f: &mut W) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write_float(f, *x),
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Str(s) => write_str_repr(f, s),
            Self::Bytes(bytes) => write_bytes_repr(f, bytes),
            Self::Symbol(name) => write!(f, "`{name}"),
            Self::List(items) => {
                f.write_char('[')?;
                for item in items {
                    f.write_char(' ')?;
                    item.write_repr(f)?;
                }
                f.write_str(" ]")
            }
            Self::Code(body) => write_code(f, body),
            Self::Native(word) => write!(f, "<native word {}>", word.name()),
            Self::Scope(scope) => write!(f, "<scope {}>", scope.name()),
            Self::Any(inner) => inner.write_repr(f),
        }
    }
}

/// The display form used by `show` and `peek`: strings render raw, every
/// other tag renders as its repr (list elements always use the repr form).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Any(inner) => inner.fmt(f),
            other => other.write_repr(f),
        }
    }
}

/// Equality: number pairs compare numerically regardless of tag, `any`
/// compares to `any` by payload, natives compare by identity, everything
/// else needs equal tag and payload. Never fails.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => big_to_f64(a) == *b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Scope(a), Self::Scope(b)) => a == b,
            (Self::Any(a), Self::Any(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordering: numeric for number pairs, payload ordering for same-tagged
/// comparable values, unordered otherwise (the comparison words render
/// unordered as `#f` rather than failing).
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => big_to_f64(a).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&big_to_f64(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            (Self::Symbol(a), Self::Symbol(b)) => Some(a.cmp(b)),
            (Self::List(a), Self::List(b)) => seq_cmp(a, b),
            (Self::Code(a), Self::Code(b)) => token_seq_cmp(a, b),
            (Self::Any(a), Self::Any(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Lexicographic comparison that bails out as unordered when any element
/// pair is unordered.
fn seq_cmp(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.partial_cmp(y)? {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Converts a big integer to f64 for mixed numeric operations; out-of-range
/// magnitudes saturate to infinity via num-traits.
pub(crate) fn big_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

/// Writes a float the way literals read back: always with a decimal point
/// (`3.0`, not `3`), `inf`/`nan` for the non-finite values.
pub(crate) fn write_float<W: fmt::Write>(f: &mut W, value: f64) -> fmt::Result {
    if value.is_finite() {
        f.write_str(ryu::Buffer::new().format_finite(value))
    } else if value.is_nan() {
        f.write_str("nan")
    } else if value > 0.0 {
        f.write_str("inf")
    } else {
        f.write_str("-inf")
    }
}

/// Writes a single-quoted string literal with the escapes the tokenizer
/// recognizes.
pub(crate) fn write_str_repr<W: fmt::Write>(f: &mut W, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\u{8}' => f.write_str("\\b")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{b}' => f.write_str("\\v")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('\'')
}

/// Writes a bytes literal as `b"…"`; the payload is rendered lossily as
/// UTF-8 since byte literals are written as text in source.
pub(crate) fn write_bytes_repr<W: fmt::Write>(f: &mut W, bytes: &[u8]) -> fmt::Result {
    f.write_str("b\"")?;
    for c in String::from_utf8_lossy(bytes).chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\u{8}' => f.write_str("\\b")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{b}' => f.write_str("\\v")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('"')
}

/// Writes a code block as its nested tokens, `{ tok tok … }`.
pub(crate) fn write_code<W: fmt::Write>(f: &mut W, body: &[Token]) -> fmt::Result {
    f.write_char('{')?;
    for token in body {
        write!(f, " {token}")?;
    }
    f.write_str(" }")
}
