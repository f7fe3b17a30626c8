//! Compiled-in native stdlib modules.
//!
//! These are created on demand when an import resolves to them; each
//! submodule exposes a `create_module` entry point.

pub(crate) mod string_mod;

use crate::module::Module;

/// Creates a compiled-in stdlib module by its `::`-joined path, if one
/// exists.
pub(crate) fn create(name: &str) -> Option<Module> {
    match name {
        "String" => Some(string_mod::create_module()),
        _ => None,
    }
}
