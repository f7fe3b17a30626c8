//! Iteration words.
//!
//! Every loop checks the interpreter's break flag before each round and
//! clears it on exit, so `break` stops exactly the innermost running loop
//! of the interpreter that executed it. Iterating a string pushes its
//! characters and iterating bytes pushes its octets, wrapped with the
//! `any` tag since they are not already values of the sequence.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::code_body;
use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::tokenize::Token;
use crate::value::Value;

fn sequence_items(value: Value, word: &str) -> RunResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Str(s) => Ok(s
            .chars()
            .map(|c| Value::Any(Box::new(Value::Str(c.to_string()))))
            .collect()),
        Value::Bytes(bytes) => Ok(bytes
            .into_iter()
            .map(|b| Value::Any(Box::new(Value::Int(BigInt::from(b)))))
            .collect()),
        other => Err(Failure::type_mismatch(format!(
            "{word}: expected a sequence, found {}",
            other.tag_name()
        ))),
    }
}

/// `(sequence c -- )`
pub(crate) fn for_each(interp: &mut Interpreter) -> RunResult<()> {
    let (seq, code) = interp.stack_mut().pop2()?;
    let items = sequence_items(seq, "for.each")?;
    let body = code_body(code, "for.each")?;
    for item in items {
        if interp.take_break() {
            break;
        }
        interp.stack_mut().push(item);
        interp.eval(&body)?;
    }
    Ok(())
}

/// `(c n -- )`
pub(crate) fn repeat_n(interp: &mut Interpreter) -> RunResult<()> {
    let (code, n) = interp.stack_mut().pop2()?;
    let body = code_body(code, "repeat.n")?;
    let count = match n {
        Value::Int(n) => n.to_usize().unwrap_or(0),
        other => {
            return Err(Failure::type_mismatch(format!(
                "repeat.n: expected an int count, found {}",
                other.tag_name()
            )));
        }
    };
    for _ in 0..count {
        if interp.take_break() {
            break;
        }
        interp.eval(&body)?;
    }
    Ok(())
}

/// `(sequence1 c -- sequence2)`
pub(crate) fn map(interp: &mut Interpreter) -> RunResult<()> {
    let (seq, code) = interp.stack_mut().pop2()?;
    let items = sequence_items(seq, "map")?;
    let body = code_body(code, "map")?;
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if interp.take_break() {
            break;
        }
        interp.stack_mut().push(item);
        interp.eval(&body)?;
        result.push(interp.stack_mut().pop()?);
    }
    interp.stack_mut().push(Value::List(result));
    Ok(())
}

/// `(sequence1 c -- sequence2)`
pub(crate) fn filter(interp: &mut Interpreter) -> RunResult<()> {
    let (seq, code) = interp.stack_mut().pop2()?;
    let items = sequence_items(seq, "filter")?;
    let body = code_body(code, "filter")?;
    let mut result = Vec::new();
    for item in items {
        if interp.take_break() {
            break;
        }
        interp.stack_mut().push(item.clone());
        interp.eval(&body)?;
        if interp.stack_mut().pop()?.is_truthy() {
            result.push(item);
        }
    }
    interp.stack_mut().push(Value::List(result));
    Ok(())
}

/// `(sequence1 a c -- a)`
pub(crate) fn reduce(interp: &mut Interpreter) -> RunResult<()> {
    let (seq, start, code) = interp.stack_mut().pop3()?;
    let items = sequence_items(seq, "reduce")?;
    let body = code_body(code, "reduce")?;
    let mut acc = start;
    for item in items {
        if interp.take_break() {
            break;
        }
        interp.stack_mut().push_many([acc, item]);
        interp.eval(&body)?;
        acc = interp.stack_mut().pop()?;
    }
    interp.stack_mut().push(acc);
    Ok(())
}

/// `(c -- )`
pub(crate) fn forever(interp: &mut Interpreter) -> RunResult<()> {
    let body = code_body(interp.stack_mut().pop()?, "forever")?;
    loop {
        if interp.take_break() {
            break;
        }
        interp.eval(&body)?;
    }
    Ok(())
}

/// The shared flag-testing loop behind `while` and `do.while`: pop the
/// flag, stop when it is falsy (leaving it on the stack), otherwise run
/// body then cond, which leaves the next flag.
fn flag_loop(interp: &mut Interpreter, body: &[Token], cond: &[Token]) -> RunResult<()> {
    loop {
        if interp.take_break() {
            break;
        }
        let flag = interp.stack_mut().pop()?;
        if !flag.is_truthy() {
            interp.stack_mut().push(flag);
            break;
        }
        interp.eval(body)?;
        interp.eval(cond)?;
    }
    Ok(())
}

/// `(b c c -- b)`
pub(crate) fn while_(interp: &mut Interpreter) -> RunResult<()> {
    let (body, cond) = interp.stack_mut().pop2()?;
    let body = code_body(body, "while")?;
    let cond = code_body(cond, "while")?;
    flag_loop(interp, &body, &cond)
}

/// `(c c -- b)`
pub(crate) fn do_while(interp: &mut Interpreter) -> RunResult<()> {
    let (body, cond) = interp.stack_mut().pop2()?;
    let body = code_body(body, "do.while")?;
    let cond = code_body(cond, "do.while")?;
    interp.eval(&body)?;
    interp.eval(&cond)?;
    flag_loop(interp, &body, &cond)
}

/// `( -- )`
pub(crate) fn break_(interp: &mut Interpreter) -> RunResult<()> {
    interp.request_break();
    Ok(())
}
