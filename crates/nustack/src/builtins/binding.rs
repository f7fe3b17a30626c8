//! Binding and lookup words.

use super::symbol_name;
use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::value::Value;

/// `(a s -- )` — the value is pushed first, then the name symbol. Writes
/// unconditionally into the innermost frame.
pub(crate) fn define(interp: &mut Interpreter) -> RunResult<()> {
    let (value, name) = interp.stack_mut().pop2()?;
    let name = symbol_name(name, "define")?;
    interp.scopes_mut().assign(name, value);
    Ok(())
}

/// `(sym -- any)`
pub(crate) fn lookup(interp: &mut Interpreter) -> RunResult<()> {
    let name = symbol_name(interp.stack_mut().pop()?, "lookup")?;
    let value = interp.scopes().lookup(&name)?;
    interp.stack_mut().push(value);
    Ok(())
}

/// `(code -- )` — evaluates a code block (in its own frame, like a word
/// invocation) or invokes a native word.
pub(crate) fn call(interp: &mut Interpreter) -> RunResult<()> {
    match interp.stack_mut().pop()? {
        Value::Native(word) => word.invoke(interp),
        Value::Code(body) => interp.eval_in_frame(&body),
        other => Err(Failure::type_mismatch(format!(
            "call: expected code or a native word, found {}",
            other.tag_name()
        ))),
    }
}
