//! Module loader tests: source files on the search path, the compiled-in
//! stdlib, host extensions, namespace binding, and import isolation.
//!
//! Tests touching environment variables are serialized.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use num_bigint::BigInt;
use nustack::{
    BuiltinKind, CollectStringPrint, FailKind, Failure, Interpreter, Module, NoPrint, Value,
};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

fn int(n: i64) -> Value {
    Value::Int(BigInt::from(n))
}

fn interp_in(dir: &Path) -> Interpreter {
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    interp.set_current_dir(dir);
    interp
}

fn set_env(key: &str, value: &OsStr) {
    // SAFETY: tests that touch the environment carry #[serial]
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    // SAFETY: tests that touch the environment carry #[serial]
    unsafe { std::env::remove_var(key) }
}

// =============================================================================
// 1. Source modules on the search path
// =============================================================================

#[test]
#[serial]
fn import_binds_a_source_module_under_its_name() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mymod.nu"),
        "42 `answer def { dup * } `square def",
    )
    .unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("`mymod import mymod::answer 5 mymod::square").unwrap();
    assert_eq!(interp.stack().values(), &[int(42), int(25)]);
}

#[test]
#[serial]
fn import_star_merges_and_keeps_the_namespace() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mymod.nu"), "42 `answer def").unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("`mymod imp* answer mymod::answer").unwrap();
    assert_eq!(interp.stack().values(), &[int(42), int(42)]);
}

#[test]
#[serial]
fn nested_paths_bind_the_first_segment() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg").join("inner.nu"), "7 `seven def").unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("`pkg::inner import pkg::inner::seven").unwrap();
    assert_eq!(interp.stack().values(), &[int(7)]);
}

#[test]
#[serial]
fn nustackpath_roots_are_searched_after_the_current_directory() {
    let cwd = TempDir::new().unwrap();
    let libdir = TempDir::new().unwrap();
    fs::write(libdir.path().join("shared.nu"), "1 `one def").unwrap();

    set_env("NUSTACKPATH", libdir.path().as_os_str());
    let mut interp = interp_in(cwd.path());
    let result = interp.run("`shared import shared::one");
    remove_env("NUSTACKPATH");

    result.unwrap();
    assert_eq!(interp.stack().values(), &[int(1)]);
}

/// Property 4: a second import replaces the binding with an equivalent
/// scope-ref.
#[test]
#[serial]
fn import_is_idempotent() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mymod.nu"), "42 `answer def").unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("`mymod import").unwrap();
    let first = interp.scopes().lookup("mymod").unwrap();
    interp.run("`mymod import").unwrap();
    let second = interp.scopes().lookup("mymod").unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// 2. Import isolation
// =============================================================================

/// Imports run in a fresh interpreter: the module sees neither the
/// importer's stack nor its bindings.
#[test]
#[serial]
fn imported_source_cannot_observe_the_importer() {
    let dir = TempDir::new().unwrap();
    // the module would need the importer's binding `secret` to resolve it
    fs::write(
        dir.path().join("probe.nu"),
        "{ secret } [ [ `NameNotFound { drop #f `saw def } ] ] try",
    )
    .unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("1 `secret def `probe import probe::saw").unwrap();
    assert_eq!(
        interp.stack().top(),
        Some(&Value::Bool(false)),
        "the module resolved the importer's binding"
    );
}

/// The break flag is per interpreter instance: a break executed while a
/// module loads cannot stop the importer's loops.
#[test]
#[serial]
fn imported_break_does_not_stop_the_importers_loop() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("brk.nu"), "break").unwrap();

    let mut interp = interp_in(dir.path());
    interp.run("0 { `brk import 1 + } 2 repeat.n").unwrap();
    assert_eq!(interp.stack().values(), &[int(2)]);
}

#[test]
#[serial]
fn failure_inside_a_module_propagates_to_the_importer() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.nu"), "missing.word").unwrap();

    let mut interp = interp_in(dir.path());
    let failure = interp.run("`broken import").unwrap_err();
    assert_eq!(
        *failure.kind(),
        FailKind::Builtin(BuiltinKind::NameNotFound)
    );
}

#[test]
fn missing_module_is_an_import_error() {
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    let failure = interp.run("`definitely.not.there import").unwrap_err();
    assert_eq!(*failure.kind(), FailKind::Builtin(BuiltinKind::ImportError));
}

// =============================================================================
// 3. The compiled-in stdlib
// =============================================================================

#[test]
#[serial]
fn std_string_split_resolves_after_a_star_import() {
    remove_env("NUSTACK_STDLIB");
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    interp
        .run("`std::String import* 'a,b,c' ',' std::String::split")
        .unwrap();
    assert_eq!(
        interp.stack().top(),
        Some(&Value::List(vec![
            Value::Str("a".into()),
            Value::Str("b".into()),
            Value::Str("c".into()),
        ]))
    );
}

#[test]
#[serial]
fn std_string_words_and_constants() {
    remove_env("NUSTACK_STDLIB");
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    interp.run("`std::String import").unwrap();

    interp.run("[ 'a' 'b' ] '-' String::join").unwrap();
    assert_eq!(interp.stack().top(), Some(&Value::Str("a-b".into())));

    interp.run("'hello' 'ell' String::contains").unwrap();
    assert_eq!(interp.stack().top(), Some(&Value::Bool(true)));

    interp.run("String::digits").unwrap();
    assert_eq!(interp.stack().top(), Some(&Value::Str("0123456789".into())));
}

#[test]
#[serial]
fn merged_stdlib_words_work_unqualified() {
    remove_env("NUSTACK_STDLIB");
    let collect = CollectStringPrint::new();
    let mut interp = Interpreter::with_writer(Box::new(collect.clone()));
    interp
        .run("`std::String import* 'x;y' ';' split show")
        .unwrap();
    assert_eq!(collect.output(), "[ 'x' 'y' ]\n");
}

#[test]
#[serial]
fn nustack_stdlib_source_root_wins_over_the_compiled_in_registry() {
    let stdlib = TempDir::new().unwrap();
    fs::write(stdlib.path().join("Util.nu"), "9 `nine def").unwrap();

    set_env("NUSTACK_STDLIB", stdlib.path().as_os_str());
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    let result = interp.run("`std::Util import Util::nine");
    remove_env("NUSTACK_STDLIB");

    result.unwrap();
    assert_eq!(interp.stack().values(), &[int(9)]);
}

#[test]
#[serial]
fn std_forced_names_skip_the_search_path() {
    // a file named like the module exists in the current directory, but
    // std:: must not find it
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("NotStd.nu"), "1 `x def").unwrap();

    remove_env("NUSTACK_STDLIB");
    let mut interp = interp_in(dir.path());
    let failure = interp.run("`std::NotStd import").unwrap_err();
    assert_eq!(*failure.kind(), FailKind::Builtin(BuiltinKind::ImportError));
}

// =============================================================================
// 4. Host extensions
// =============================================================================

fn math_extension() -> Module {
    let mut module = Module::new("mathx");
    module.register(&["triple"], "(n -- n)", "Multiplies by three", |interp| {
        match interp.stack_mut().pop()? {
            Value::Int(n) => {
                interp.stack_mut().push(Value::Int(n * 3));
                Ok(())
            }
            other => Err(Failure::type_mismatch(format!(
                "triple: expected an int, found {}",
                other.tag_name()
            ))),
        }
    });
    module.register_value("factor", Value::Int(BigInt::from(3)));
    module
}

#[test]
#[serial]
fn host_extension_modules_resolve_by_registered_name() {
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    interp.register_extension("mathx", math_extension());
    interp.run("`mathx import 7 mathx::triple mathx::factor").unwrap();
    assert_eq!(interp.stack().values(), &[int(21), int(3)]);
}

#[test]
#[serial]
fn host_extension_failures_are_catchable() {
    let mut interp = Interpreter::with_writer(Box::new(NoPrint));
    interp.register_extension("mathx", math_extension());
    interp
        .run(
            "`mathx import* \
             { 'nan' triple } [ [ `TypeMismatch { drop 0 } ] ] try",
        )
        .unwrap();
    assert_eq!(interp.stack().values(), &[int(0)]);
}
