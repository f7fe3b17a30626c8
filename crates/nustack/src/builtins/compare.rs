//! Comparison and logic words.
//!
//! Equality never raises; ordering on incomparable values silently yields
//! `#f`. `or` and `and` select one of their operands and push it wrapped
//! with the `any` tag, so a later `not` or `if` tests the selected value's
//! truthiness.

use std::cmp::Ordering;

use crate::exception::RunResult;
use crate::interp::Interpreter;
use crate::value::Value;

/// `(a1 a2 -- b)`
pub(crate) fn eq(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    interp.stack_mut().push(Value::Bool(a == b));
    Ok(())
}

/// `(a1 a2 -- b)`
pub(crate) fn lt(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = matches!(a.partial_cmp(&b), Some(Ordering::Less));
    interp.stack_mut().push(Value::Bool(result));
    Ok(())
}

/// `(a1 a2 -- b)`
pub(crate) fn gt(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = matches!(a.partial_cmp(&b), Some(Ordering::Greater));
    interp.stack_mut().push(Value::Bool(result));
    Ok(())
}

/// `(b -- b)`
pub(crate) fn not(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    interp.stack_mut().push(Value::Bool(!a.is_truthy()));
    Ok(())
}

/// `(b1 b2 -- any)`
pub(crate) fn or(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let chosen = if a.is_truthy() { a } else { b };
    interp.stack_mut().push(Value::Any(Box::new(chosen)));
    Ok(())
}

/// `(b1 b2 -- any)`
pub(crate) fn and(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let chosen = if a.is_truthy() { b } else { a };
    interp.stack_mut().push(Value::Any(Box::new(chosen)));
    Ok(())
}
