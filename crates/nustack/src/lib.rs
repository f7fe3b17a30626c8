#![doc = include_str!("../../../README.md")]

mod builtins;
mod exception;
mod interp;
mod io;
mod loader;
mod module;
mod modules;
mod scope;
mod stack;
mod tokenize;
mod value;

pub use crate::{
    exception::{BuiltinKind, FailKind, Failure, RunResult},
    interp::{INTERACTIVE, Interpreter},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    module::{Module, NativeFn, NativeWord},
    scope::{ScopeChain, ScopeRef},
    stack::OperandStack,
    tokenize::{Token, tokenize},
    value::Value,
};
