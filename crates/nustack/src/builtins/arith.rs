//! Arithmetic words. The numeric semantics live on [`crate::Value`]:
//! same-tag operations preserve the tag, mixed int/float promotes to
//! float, and `/` and `%` always produce floats.

use crate::exception::RunResult;
use crate::interp::Interpreter;

pub(crate) fn add(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = a.add(b)?;
    interp.stack_mut().push(result);
    Ok(())
}

pub(crate) fn sub(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = a.sub(b)?;
    interp.stack_mut().push(result);
    Ok(())
}

pub(crate) fn mul(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = a.mul(b)?;
    interp.stack_mut().push(result);
    Ok(())
}

pub(crate) fn div(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = a.div(b)?;
    interp.stack_mut().push(result);
    Ok(())
}

pub(crate) fn rem(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let result = a.rem(b)?;
    interp.stack_mut().push(result);
    Ok(())
}
