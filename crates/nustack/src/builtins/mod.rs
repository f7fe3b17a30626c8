//! The primitive word set: the minimum surface the standard library is
//! written against.
//!
//! Every word is registered on one `builtins` module with its aliases,
//! stack-effect signature, and docstring, and merged into the outermost
//! scope frame of every interpreter at construction.

mod arith;
mod binding;
mod compare;
mod control;
mod convert;
mod failure;
mod io_words;
mod iteration;
mod module_words;
mod stack_words;

use std::rc::Rc;

use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::module::Module;
use crate::tokenize::Token;
use crate::value::Value;

/// Extracts a code block payload, failing with `TypeMismatch` otherwise.
pub(crate) fn code_body(value: Value, word: &str) -> RunResult<Rc<[Token]>> {
    match value {
        Value::Code(body) => Ok(body),
        other => Err(Failure::type_mismatch(format!(
            "{word}: expected a code block, found {}",
            other.tag_name()
        ))),
    }
}

/// Extracts a name from a symbol (or string) operand.
pub(crate) fn symbol_name(value: Value, word: &str) -> RunResult<String> {
    match value {
        Value::Symbol(name) | Value::Str(name) => Ok(name),
        other => Err(Failure::type_mismatch(format!(
            "{word}: expected a symbol, found {}",
            other.tag_name()
        ))),
    }
}

/// `( -- l)` — the command line arguments; the first element is the script
/// path or `<<INTERACTIVE>>`.
fn argv(interp: &mut Interpreter) -> RunResult<()> {
    let args = interp
        .argv()
        .iter()
        .map(|arg| Value::Str(arg.clone()))
        .collect();
    interp.stack_mut().push(Value::List(args));
    Ok(())
}

/// Builds the `builtins` module.
pub(crate) fn create_module() -> Module {
    let mut m = Module::new("builtins");

    // stack manipulation
    m.register(
        &["swap"],
        "(a1 a2 -- a2 a1)",
        "Swaps the two values on top of the stack",
        stack_words::swap,
    );
    m.register(&["drop"], "(a -- )", "Pops the top of the stack", stack_words::drop_);
    m.register(
        &["dup"],
        "(a -- a a)",
        "Duplicates the top of the stack",
        stack_words::dup,
    );
    m.register(
        &["over"],
        "(a1 a2 -- a1 a2 a1)",
        "Copies the value under the top onto the top",
        stack_words::over,
    );
    m.register(
        &["rot"],
        "(a1 a2 a3 -- a2 a3 a1)",
        "Rotates the top three values on the stack",
        stack_words::rot,
    );

    // arithmetic
    m.register(
        &["+", "add"],
        "(n n -- n)",
        "Adds two numbers; concatenates strings, bytes, lists and code",
        arith::add,
    );
    m.register(&["-", "sub"], "(n n -- n)", "Subtracts two numbers", arith::sub);
    m.register(&["*", "mul"], "(n n -- n)", "Multiplies two numbers", arith::mul);
    m.register(
        &["/", "div"],
        "(n n -- n)",
        "Divides two numbers; the result is always a float",
        arith::div,
    );
    m.register(
        &["%", "mod"],
        "(n n -- n)",
        "Modulo of two numbers; the result is always a float",
        arith::rem,
    );

    // comparison and logic
    m.register(
        &["eq", "="],
        "(a1 a2 -- b)",
        "Pushes #t when the top two values equal each other",
        compare::eq,
    );
    m.register(
        &["lt", "<"],
        "(a1 a2 -- b)",
        "Pushes #t when a1 < a2; incomparable values give #f",
        compare::lt,
    );
    m.register(
        &["gt", ">"],
        "(a1 a2 -- b)",
        "Pushes #t when a1 > a2; incomparable values give #f",
        compare::gt,
    );
    m.register(&["not"], "(b -- b)", "Negates a truthiness test", compare::not);
    m.register(
        &["or", "|"],
        "(b1 b2 -- any)",
        "Pushes b1 when it is truthy, b2 otherwise; the result is tagged any",
        compare::or,
    );
    m.register(
        &["and", "&"],
        "(b1 b2 -- any)",
        "Pushes b2 when b1 is truthy, b1 otherwise; the result is tagged any",
        compare::and,
    );

    // conversion
    m.register(
        &["to.string"],
        "(a -- s)",
        "Converts the top of the stack to its display string",
        convert::to_string,
    );
    m.register(&["to.int"], "(a -- i)", "Converts the top of the stack to an int", convert::to_int);
    m.register(
        &["to.float"],
        "(a -- f)",
        "Converts the top of the stack to a float",
        convert::to_float,
    );
    m.register(
        &["to.symbol"],
        "(a -- sym)",
        "Converts the top of the stack to a symbol",
        convert::to_symbol,
    );
    m.register(
        &["to.bool"],
        "(a -- b)",
        "Converts the top of the stack to its truthiness",
        convert::to_bool,
    );

    // binding and lookup
    m.register(
        &["define", "def"],
        "(a s -- )",
        "Binds a value to a name in the current scope",
        binding::define,
    );
    m.register(
        &["lookup"],
        "(sym -- any)",
        "Pushes the value bound to a name; useful for dynamic lookup",
        binding::lookup,
    );
    m.register(
        &["call"],
        "(code -- )",
        "Evaluates a code block or invokes a native word",
        binding::call,
    );

    // I/O
    m.register(&["show"], "(a -- )", "Shows the top of the stack", io_words::show);
    m.register(
        &["peek"],
        "(a -- a)",
        "Shows the top of the stack without popping it",
        io_words::peek,
    );
    m.register(
        &["show.repr"],
        "(a -- )",
        "Shows the top of the stack and its tag",
        io_words::show_repr,
    );
    m.register(
        &["peek.repr"],
        "(a -- a)",
        "Shows the top of the stack and its tag without popping it",
        io_words::peek_repr,
    );
    m.register(
        &["input", "in"],
        "(a -- s)",
        "Shows a prompt, reads a line of input, and pushes it as a string",
        io_words::input,
    );
    m.register(&["show.scopes"], "( -- )", "Shows the current scope frames", io_words::show_scopes);

    // control flow
    m.register(
        &["if"],
        "(b c c -- )",
        "Evaluates the first block when b is truthy, the second otherwise",
        control::if_,
    );
    m.register(
        &["cond"],
        "(l -- )",
        "Takes a list of [test body] pairs and evaluates the first body whose test is truthy",
        control::cond,
    );

    // iteration
    m.register(
        &["for.each"],
        "(sequence c -- )",
        "Evaluates a code block for each item of a sequence",
        iteration::for_each,
    );
    m.register(&["repeat.n"], "(c n -- )", "Evaluates a code block n times", iteration::repeat_n);
    m.register(
        &["map"],
        "(sequence1 c -- sequence2)",
        "Evaluates a code block over each item and collects the results",
        iteration::map,
    );
    m.register(
        &["filter"],
        "(sequence1 c -- sequence2)",
        "Keeps the items for which a code block leaves a truthy value",
        iteration::filter,
    );
    m.register(
        &["reduce"],
        "(sequence1 a c -- a)",
        "Folds a sequence to a single value",
        iteration::reduce,
    );
    m.register(&["forever"], "(c -- )", "Evaluates a code block until break", iteration::forever);
    m.register(
        &["while"],
        "(b c c -- b)",
        "Pops a flag each round; while it is truthy, evaluates body then cond. \
         The final falsy flag stays on the stack",
        iteration::while_,
    );
    m.register(
        &["do.while"],
        "(c c -- b)",
        "Like while, but evaluates body and cond once before the first flag test",
        iteration::do_while,
    );
    m.register(&["break"], "( -- )", "Stops the innermost running loop", iteration::break_);

    // failure handling
    m.register(
        &["try"],
        "(c l -- )",
        "Evaluates a block; on failure, runs the first handler whose kind matches",
        failure::try_,
    );
    m.register(&["raise"], "(sym -- )", "Raises a failure with the given kind", failure::raise);
    m.register(
        &["raise.details"],
        "(sym l -- )",
        "Raises a failure with the given kind and argument list",
        failure::raise_details,
    );

    // modules
    m.register(
        &["import", "imp"],
        "(sym -- )",
        "Loads a module and binds it under its first path segment",
        module_words::import,
    );
    m.register(
        &["import*", "imp*"],
        "(sym -- )",
        "Loads a module and merges its entries into the current scope",
        module_words::import_star,
    );

    // introspection
    m.register(&["argv"], "( -- l)", "Pushes the command line arguments as a list", argv);

    m
}
