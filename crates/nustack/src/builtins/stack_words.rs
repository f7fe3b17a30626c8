//! Stack manipulation words.

use crate::exception::RunResult;
use crate::interp::Interpreter;

/// `(a1 a2 -- a2 a1)`
pub(crate) fn swap(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    interp.stack_mut().push_many([b, a]);
    Ok(())
}

/// `(a -- )`
pub(crate) fn drop_(interp: &mut Interpreter) -> RunResult<()> {
    interp.stack_mut().pop()?;
    Ok(())
}

/// `(a -- a a)`
pub(crate) fn dup(interp: &mut Interpreter) -> RunResult<()> {
    let a = interp.stack_mut().pop()?;
    interp.stack_mut().push_many([a.clone(), a]);
    Ok(())
}

/// `(a1 a2 -- a1 a2 a1)`
pub(crate) fn over(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    interp.stack_mut().push_many([a.clone(), b, a]);
    Ok(())
}

/// `(a1 a2 a3 -- a2 a3 a1)`
pub(crate) fn rot(interp: &mut Interpreter) -> RunResult<()> {
    let (a1, a2, a3) = interp.stack_mut().pop3()?;
    interp.stack_mut().push_many([a2, a3, a1]);
    Ok(())
}
