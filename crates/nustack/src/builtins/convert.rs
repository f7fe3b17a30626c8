//! Conversion words. A conversion that cannot succeed is a `TypeMismatch`
//! failure; in particular `to.int` on a code block fails rather than
//! rendering it.

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::value::{Value, big_to_f64};

fn value_to_int(value: &Value) -> RunResult<BigInt> {
    match value {
        Value::Int(n) => Ok(n.clone()),
        Value::Float(x) => BigInt::from_f64(x.trunc())
            .ok_or_else(|| Failure::type_mismatch(format!("cannot convert {x} to int"))),
        Value::Bool(b) => Ok(BigInt::from(i32::from(*b))),
        Value::Str(s) => s
            .trim()
            .parse::<BigInt>()
            .map_err(|_| Failure::type_mismatch(format!("cannot convert '{s}' to int"))),
        Value::Any(inner) => value_to_int(inner),
        other => Err(Failure::type_mismatch(format!(
            "cannot convert {} to int",
            other.tag_name()
        ))),
    }
}

fn value_to_float(value: &Value) -> RunResult<f64> {
    match value {
        Value::Int(n) => Ok(big_to_f64(n)),
        Value::Float(x) => Ok(*x),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Failure::type_mismatch(format!("cannot convert '{s}' to float"))),
        Value::Any(inner) => value_to_float(inner),
        other => Err(Failure::type_mismatch(format!(
            "cannot convert {} to float",
            other.tag_name()
        ))),
    }
}

/// `(a -- s)`
pub(crate) fn to_string(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    interp.stack_mut().push(Value::Str(a.to_string()));
    Ok(())
}

/// `(a -- i)`
pub(crate) fn to_int(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    let n = value_to_int(&a)?;
    interp.stack_mut().push(Value::Int(n));
    Ok(())
}

/// `(a -- f)`
pub(crate) fn to_float(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    let x = value_to_float(&a)?;
    interp.stack_mut().push(Value::Float(x));
    Ok(())
}

/// `(a -- sym)`
pub(crate) fn to_symbol(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    interp.stack_mut().push(Value::Symbol(a.to_string()));
    Ok(())
}

/// `(a -- b)`
pub(crate) fn to_bool(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    interp.stack_mut().push(Value::Bool(a.is_truthy()));
    Ok(())
}
