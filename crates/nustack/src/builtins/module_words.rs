//! Module import words.

use super::symbol_name;
use crate::exception::RunResult;
use crate::interp::Interpreter;
use crate::loader;

/// `(sym -- )` — loads a module and binds it under its first path segment;
/// deeper segments are wrapped so `a::b::c` resolves by member access.
pub(crate) fn import(interp: &mut Interpreter) -> RunResult<()> {
    let name = symbol_name(interp.stack_mut().pop()?, "import")?;
    let (segments, scope) = loader::load_module(interp, &name)?;
    let wrapped = loader::namespace_wrap(&segments, scope);
    interp.scopes_mut().assign(segments[0].clone(), wrapped);
    Ok(())
}

/// `(sym -- )` — loads a module and merges its top-level entries directly
/// into the caller's scope (overwriting on conflict). The namespace itself
/// is bound as well, so qualified names keep resolving after a star
/// import.
pub(crate) fn import_star(interp: &mut Interpreter) -> RunResult<()> {
    let name = symbol_name(interp.stack_mut().pop()?, "import*")?;
    let (segments, scope) = loader::load_module(interp, &name)?;
    for (entry_name, value) in scope.iter() {
        let entry_name = entry_name.to_string();
        let value = value.clone();
        interp.scopes_mut().assign(entry_name, value);
    }
    let wrapped = loader::namespace_wrap(&segments, scope);
    interp.scopes_mut().assign(segments[0].clone(), wrapped);
    Ok(())
}
