//! Module loader: resolves import names to source files or native modules
//! and produces a scope-ref for binding.
//!
//! Resolution order for `import` / `import*`:
//!
//! 1. a leading `std::` forces the stdlib: a `.nu` source file under the
//!    `NUSTACK_STDLIB` root if one is configured, then the compiled-in
//!    stdlib module registry;
//! 2. otherwise the search path — the interpreter's current directory
//!    followed by the entries of `NUSTACKPATH` — is walked for a `.nu`
//!    source file; first hit wins;
//! 3. then the host-extension table registered on the interpreter;
//! 4. then the compiled-in stdlib registry;
//! 5. and when everything failed, `ImportError`.
//!
//! Each source file is evaluated in a fresh interpreter instance, so an
//! import can never observe or mutate the importer's stack or scopes.

use std::path::{Path, PathBuf};
use std::{env, fs};

use indexmap::IndexMap;
use tracing::debug;

use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::modules;
use crate::scope::ScopeRef;
use crate::value::Value;

/// Resolves `name`, returning the path segments and the loaded scope.
pub(crate) fn load_module(
    interp: &Interpreter,
    name: &str,
) -> RunResult<(Vec<String>, ScopeRef)> {
    let (std_forced, path) = match name.strip_prefix("std::") {
        Some(stripped) => (true, stripped),
        None => (false, name),
    };
    let segments: Vec<String> = path.split("::").map(str::to_string).collect();
    let joined = segments.join("::");

    if std_forced {
        if let Some(root) = env::var_os("NUSTACK_STDLIB") {
            let file = module_file(Path::new(&root), &segments);
            debug!(path = %file.display(), "trying stdlib source module");
            if file.exists() {
                let scope = eval_source_module(&file, &joined)?;
                return Ok((segments, scope));
            }
        }
        if let Some(module) = modules::create(&joined) {
            debug!(module = %joined, "loaded compiled-in stdlib module");
            return Ok((segments, module.to_scope_ref()));
        }
        return Err(Failure::import_error(name));
    }

    let mut roots = vec![interp.current_dir().to_path_buf()];
    if let Some(nupath) = env::var_os("NUSTACKPATH") {
        roots.extend(env::split_paths(&nupath));
    }
    for root in roots {
        let file = module_file(&root, &segments);
        debug!(path = %file.display(), "trying source module");
        if file.exists() {
            let scope = eval_source_module(&file, &joined)?;
            return Ok((segments, scope));
        }
    }

    if let Some(module) = interp.extension(&joined) {
        debug!(module = %joined, "loaded host extension module");
        return Ok((segments, module.to_scope_ref()));
    }
    if let Some(module) = modules::create(&joined) {
        debug!(module = %joined, "loaded compiled-in stdlib module");
        return Ok((segments, module.to_scope_ref()));
    }
    Err(Failure::import_error(name))
}

/// `<root>/<seg1>/…/<segN>.nu`
fn module_file(root: &Path, segments: &[String]) -> PathBuf {
    let mut file = root.to_path_buf();
    let (last, parents) = segments.split_last().expect("split produces a segment");
    for segment in parents {
        file.push(segment);
    }
    file.push(format!("{last}.nu"));
    file
}

/// Evaluates a source module in a fresh interpreter and wraps its
/// outermost frame as a scope-ref. Failures inside the module's evaluation
/// propagate to the importer unchanged.
fn eval_source_module(file: &Path, display_name: &str) -> RunResult<ScopeRef> {
    debug!(path = %file.display(), "evaluating source module");
    let source = fs::read_to_string(file)
        .map_err(|err| Failure::import_error(format!("{display_name}: {err}")))?;

    let mut module_interp = Interpreter::new();
    if let Some(parent) = file.parent() {
        module_interp.set_current_dir(parent);
    }
    module_interp.run(&source)?;

    let frame = module_interp.into_program_frame();
    let mut bindings: Vec<(String, Value)> = frame.into_iter().collect();
    // frame iteration order is arbitrary; sort so the scope-ref enumerates
    // deterministically
    bindings.sort_by(|a, b| a.0.cmp(&b.0));
    let mut entries = IndexMap::with_capacity(bindings.len());
    for (name, value) in bindings {
        entries.insert(name, value);
    }
    Ok(ScopeRef::new(display_name, entries))
}

/// Wraps deeper path segments in nested one-key scopes, so that importing
/// `a::b::c` binds `a` and `a::b::c word` resolves by chained member
/// access.
pub(crate) fn namespace_wrap(segments: &[String], scope: ScopeRef) -> Value {
    let mut value = Value::Scope(scope);
    for segment in segments.iter().skip(1).rev() {
        value = Value::Scope(ScopeRef::single(segment, segment.clone(), value));
    }
    value
}
