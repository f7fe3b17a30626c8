use std::fmt::{self, Write};
use std::str::FromStr;

use strum::{Display, EnumString, IntoStaticStr};

use crate::value::Value;

/// Result type alias for operations that can produce a runtime failure.
pub type RunResult<T> = Result<T, Failure>;

/// Failure kinds raised by the interpreter core.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>`
/// implementations. The string representation matches the variant name exactly
/// (e.g., `StackUnderflow` -> "StackUnderflow").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum BuiltinKind {
    /// Pop on an empty operand stack.
    StackUnderflow,
    /// Unbound call or `lookup` of a missing name.
    NameNotFound,
    /// Arithmetic, comparison, or conversion on incompatible tags.
    TypeMismatch,
    /// The module loader exhausted every resolution strategy.
    ImportError,
    /// Unrecognized leading character in source text.
    TokenizeError,
}

/// The kind of a failure: one of the builtin kinds, or a user-chosen name
/// raised via `raise` / `raise.details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailKind {
    Builtin(BuiltinKind),
    User(String),
}

impl FailKind {
    /// Creates a kind from a raised symbol name.
    ///
    /// A name that spells a builtin kind produces that kind, so a handler for
    /// `` `TypeMismatch `` catches both interpreter-raised and user-raised
    /// failures of that name.
    pub fn from_name(name: &str) -> Self {
        match BuiltinKind::from_str(name) {
            Ok(kind) => Self::Builtin(kind),
            Err(_) => Self::User(name.to_string()),
        }
    }

    /// The kind's name as matched by `try` handlers.
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => (*kind).into(),
            Self::User(name) => name,
        }
    }

    /// Checks whether a `try` handler registered under `handler_name` catches
    /// this kind.
    ///
    /// A handler matches when its name equals the kind's own name or one of
    /// its supertypes. Every kind's chain ends `... -> Exception ->
    /// BaseException`, so those two names catch everything.
    #[must_use]
    pub fn matches(&self, handler_name: &str) -> bool {
        handler_name == self.name() || matches!(handler_name, "Exception" | "BaseException")
    }
}

impl fmt::Display for FailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recoverable runtime failure: a kind plus the argument values a matching
/// `try` handler receives as a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    kind: FailKind,
    args: Vec<Value>,
}

impl Failure {
    pub fn new(kind: FailKind, args: Vec<Value>) -> Self {
        Self { kind, args }
    }

    /// A builtin-kind failure carrying a single message argument.
    fn builtin(kind: BuiltinKind, message: impl Into<String>) -> Self {
        Self {
            kind: FailKind::Builtin(kind),
            args: vec![Value::Str(message.into())],
        }
    }

    pub fn stack_underflow(message: impl Into<String>) -> Self {
        Self::builtin(BuiltinKind::StackUnderflow, message)
    }

    pub fn name_not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: FailKind::Builtin(BuiltinKind::NameNotFound),
            args: vec![Value::Str(name)],
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::builtin(BuiltinKind::TypeMismatch, message)
    }

    pub fn import_error(name: impl Into<String>) -> Self {
        Self::builtin(BuiltinKind::ImportError, name)
    }

    pub fn tokenize_error(message: impl Into<String>) -> Self {
        Self::builtin(BuiltinKind::TokenizeError, message)
    }

    /// A user-raised failure (`raise` / `raise.details`).
    pub fn user(name: &str, args: Vec<Value>) -> Self {
        Self {
            kind: FailKind::from_name(name),
            args,
        }
    }

    pub fn kind(&self) -> &FailKind {
        &self.kind
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Consumes the failure, returning the argument values for handler use.
    pub fn into_args(self) -> Vec<Value> {
        self.args
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if !self.args.is_empty() {
            f.write_char(':')?;
            for arg in &self.args {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
