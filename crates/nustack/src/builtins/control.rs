//! Control flow words. Branch blocks are evaluated in the current scope
//! frame, so a `def` inside an `if` branch binds in the surrounding scope.

use super::code_body;
use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::value::Value;

/// `(b c c -- )`
pub(crate) fn if_(interp: &mut Interpreter) -> RunResult<()> {
    let (b, on_true, on_false) = interp.stack_mut().pop3()?;
    let branch = if b.is_truthy() { on_true } else { on_false };
    let body = code_body(branch, "if")?;
    interp.eval(&body)
}

/// `(l -- )` — a list of `[test body]` pairs. The first body whose test
/// leaves a truthy value is evaluated; when no test matches, control falls
/// through silently.
pub(crate) fn cond(interp: &mut Interpreter) -> RunResult<()> {
    let entries = match interp.stack_mut().pop()? {
        Value::List(entries) => entries,
        other => {
            return Err(Failure::type_mismatch(format!(
                "cond: expected a list of [test body] pairs, found {}",
                other.tag_name()
            )));
        }
    };
    for entry in entries {
        let Value::List(pair) = entry else {
            return Err(Failure::type_mismatch(
                "cond: each entry must be a [test body] pair",
            ));
        };
        if pair.len() < 2 {
            return Err(Failure::type_mismatch(
                "cond: each entry needs a test and a body",
            ));
        }
        let mut parts = pair.into_iter();
        let test = code_body(parts.next().expect("length checked"), "cond")?;
        let body = code_body(parts.next().expect("length checked"), "cond")?;
        interp.eval(&test)?;
        if interp.stack_mut().pop()?.is_truthy() {
            interp.eval(&body)?;
            break;
        }
    }
    Ok(())
}
