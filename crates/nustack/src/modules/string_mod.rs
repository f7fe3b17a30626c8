//! Implementation of the `std::String` module: string utilities and
//! character-class constants.

use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::module::Module;
use crate::value::Value;

const ASCII_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const ASCII_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const HEXDIGITS: &str = "0123456789abcdefABCDEF";
const OCTDIGITS: &str = "01234567";
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const WHITESPACE: &str = " \t\n\r\x0b\x0c";

fn expect_str(value: Value, word: &str) -> RunResult<String> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(Failure::type_mismatch(format!(
            "{word}: expected a string, found {}",
            other.tag_name()
        ))),
    }
}

/// `(s1 s2 -- l)`
fn split(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let text = expect_str(a, "split")?;
    let separator = expect_str(b, "split")?;
    if separator.is_empty() {
        return Err(Failure::type_mismatch("split: empty separator"));
    }
    let parts = text
        .split(separator.as_str())
        .map(|part| Value::Str(part.to_string()))
        .collect();
    interp.stack_mut().push(Value::List(parts));
    Ok(())
}

/// `(sequence s1 -- s2)`
fn join(interp: &mut Interpreter) -> RunResult<()> {
    let (seq, sep) = interp.stack_mut().pop2()?;
    let separator = expect_str(sep, "join")?;
    let items = match seq {
        Value::List(items) => items,
        other => {
            return Err(Failure::type_mismatch(format!(
                "join: expected a list of strings, found {}",
                other.tag_name()
            )));
        }
    };
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(expect_str(item, "join")?);
    }
    interp.stack_mut().push(Value::Str(parts.join(&separator)));
    Ok(())
}

/// `(s1 s2 -- b)`
fn contains(interp: &mut Interpreter) -> RunResult<()> {
    let (a, b) = interp.stack_mut().pop2()?;
    let text = expect_str(a, "contains")?;
    let needle = expect_str(b, "contains")?;
    interp
        .stack_mut()
        .push(Value::Bool(text.contains(needle.as_str())));
    Ok(())
}

pub(crate) fn create_module() -> Module {
    let mut module = Module::new("String");

    module.register_value("ascii_letters", {
        Value::Str(format!("{ASCII_LOWERCASE}{ASCII_UPPERCASE}"))
    });
    module.register_value("ascii_lowercase", Value::Str(ASCII_LOWERCASE.into()));
    module.register_value("ascii_uppercase", Value::Str(ASCII_UPPERCASE.into()));
    module.register_value("digits", Value::Str(DIGITS.into()));
    module.register_value("hexdigits", Value::Str(HEXDIGITS.into()));
    module.register_value("octdigits", Value::Str(OCTDIGITS.into()));
    module.register_value("punctuation", Value::Str(PUNCTUATION.into()));
    module.register_value(
        "printable",
        Value::Str(format!(
            "{DIGITS}{ASCII_LOWERCASE}{ASCII_UPPERCASE}{PUNCTUATION}{WHITESPACE}"
        )),
    );
    module.register_value("whitespace", Value::Str(WHITESPACE.into()));

    module.register(&["split"], "(s1 s2 -- l)", "Splits s1 by s2", split);
    module.register(
        &["join"],
        "(sequence s1 -- s2)",
        "Joins a sequence of strings, inserting s1 between the members",
        join,
    );
    module.register(
        &["contains"],
        "(s1 s2 -- b)",
        "Pushes #t when the string s1 contains s2",
        contains,
    );

    module
}
