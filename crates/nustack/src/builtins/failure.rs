//! Structured failure words.

use std::rc::Rc;

use super::{code_body, symbol_name};
use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::tokenize::Token;
use crate::value::Value;

/// `(c l -- )` — evaluates the try block; on failure, scans the
/// `[kind handler]` pairs for the first kind matching the failure's kind
/// or one of its supertypes, pushes the failure's arguments as a list, and
/// evaluates the handler. An unmatched failure keeps propagating.
pub(crate) fn try_(interp: &mut Interpreter) -> RunResult<()> {
    let (body, handlers) = interp.stack_mut().pop2()?;
    let body = code_body(body, "try")?;
    let handlers = match handlers {
        Value::List(entries) => entries,
        other => {
            return Err(Failure::type_mismatch(format!(
                "try: expected a list of [kind handler] pairs, found {}",
                other.tag_name()
            )));
        }
    };

    let Err(failure) = interp.eval(&body) else {
        return Ok(());
    };

    let mut matched: Option<Rc<[Token]>> = None;
    for entry in handlers {
        let Value::List(pair) = entry else {
            return Err(Failure::type_mismatch(
                "try: each handler must be a [kind handler] pair",
            ));
        };
        if pair.len() < 2 {
            return Err(Failure::type_mismatch(
                "try: each handler needs a kind and a body",
            ));
        }
        let mut parts = pair.into_iter();
        let kind = symbol_name(parts.next().expect("length checked"), "try")?;
        let handler = parts.next().expect("length checked");
        if failure.kind().matches(&kind) {
            matched = Some(code_body(handler, "try")?);
            break;
        }
    }

    match matched {
        Some(handler) => {
            interp.stack_mut().push(Value::List(failure.into_args()));
            interp.eval(&handler)
        }
        None => Err(failure),
    }
}

/// `(sym -- )` — raises a failure of the given kind with no arguments.
pub(crate) fn raise(interp: &mut Interpreter) -> RunResult<()> {
    let name = symbol_name(interp.stack_mut().pop()?, "raise")?;
    Err(Failure::user(&name, vec![]))
}

/// `(sym l -- )` — raises a failure of the given kind carrying the
/// elements of the argument list.
pub(crate) fn raise_details(interp: &mut Interpreter) -> RunResult<()> {
    let (name, args) = interp.stack_mut().pop2()?;
    let name = symbol_name(name, "raise.details")?;
    let args = match args {
        Value::List(items) => items,
        other => {
            return Err(Failure::type_mismatch(format!(
                "raise.details: expected an argument list, found {}",
                other.tag_name()
            )));
        }
    };
    Err(Failure::user(&name, args))
}
