use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;
use tracing::trace;

use crate::builtins;
use crate::exception::{Failure, RunResult};
use crate::io::{PrintWriter, StdPrint};
use crate::module::Module;
use crate::scope::ScopeChain;
use crate::stack::OperandStack;
use crate::tokenize::{Token, tokenize};
use crate::value::Value;

/// The first argv element when the interpreter runs without a script.
pub const INTERACTIVE: &str = "<<INTERACTIVE>>";

thread_local! {
    /// The builtin word module, constructed once and shared by every
    /// interpreter instance on the thread.
    static BUILTINS: Rc<Module> = Rc::new(builtins::create_module());
}

/// One interpreter instance: an operand stack, a scope chain, argv, a
/// current directory for module resolution, the host-extension table, an
/// output writer, and the instance's break flag.
///
/// Instances are independently constructable; the module loader creates
/// fresh ones to evaluate imported source files, so imports can never
/// observe or mutate the importer's stack or scopes.
pub struct Interpreter {
    stack: OperandStack,
    scopes: ScopeChain,
    argv: Vec<String>,
    current_dir: PathBuf,
    extensions: AHashMap<String, Rc<Module>>,
    writer: Box<dyn PrintWriter>,
    break_requested: bool,
}

impl Interpreter {
    /// An interpreter writing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(StdPrint))
    }

    /// An interpreter with a custom output writer.
    #[must_use]
    pub fn with_writer(writer: Box<dyn PrintWriter>) -> Self {
        let mut scopes = ScopeChain::new();
        BUILTINS.with(|module| {
            for (name, word) in module.words() {
                scopes.assign(name, Value::Native(Rc::clone(word)));
            }
        });
        // frame 1: the program's own outermost frame, above the builtins
        scopes.push_frame();
        Self {
            stack: OperandStack::new(),
            scopes,
            argv: vec![INTERACTIVE.to_string()],
            current_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            extensions: AHashMap::new(),
            writer,
            break_requested: false,
        }
    }

    /// Tokenizes and evaluates a complete source string.
    pub fn run(&mut self, source: &str) -> RunResult<()> {
        let tokens = tokenize(source)?;
        self.eval(&tokens)
    }

    /// Evaluates a token sequence against the interpreter's stack and
    /// scope.
    ///
    /// List markers are resolved here: `[` records the stack depth,
    /// subsequent tokens evaluate normally so list elements are evaluated
    /// expressions, and the matching `]` drains everything above the mark
    /// into one list value. When evaluation fails with a list still open,
    /// the stack is truncated back to the outermost mark before the
    /// failure propagates, so a caught failure leaves no partial
    /// accumulation behind.
    pub fn eval(&mut self, tokens: &[Token]) -> RunResult<()> {
        let mut marks: Vec<usize> = Vec::new();
        for token in tokens {
            if let Err(failure) = self.eval_token(token, &mut marks) {
                if let Some(&outermost) = marks.first() {
                    self.stack.truncate(outermost);
                }
                return Err(failure);
            }
        }
        Ok(())
    }

    fn eval_token(&mut self, token: &Token, marks: &mut Vec<usize>) -> RunResult<()> {
        match token {
            Token::Int(n) => self.stack.push(Value::Int(n.clone())),
            Token::Float(x) => self.stack.push(Value::Float(*x)),
            Token::Bool(b) => self.stack.push(Value::Bool(*b)),
            Token::Str(s) => self.stack.push(Value::Str(s.clone())),
            Token::Bytes(bytes) => self.stack.push(Value::Bytes(bytes.clone())),
            Token::Symbol(name) => self.stack.push(Value::Symbol(name.clone())),
            Token::Code(body) => self.stack.push(Value::Code(Rc::clone(body))),
            Token::ListStart => marks.push(self.stack.len()),
            Token::ListEnd => {
                let Some(mark) = marks.pop() else {
                    return Err(Failure::type_mismatch("unmatched ] in token stream"));
                };
                let items = self.stack.split_off_from(mark);
                self.stack.push(Value::List(items));
            }
            Token::Call(name) => self.dispatch(name)?,
        }
        Ok(())
    }

    /// Dispatches one call token: resolve the name, then invoke natives,
    /// evaluate code values in a fresh frame, and push anything else.
    fn dispatch(&mut self, name: &str) -> RunResult<()> {
        trace!(word = name, "dispatch");
        let bound = if name.contains("::") {
            self.resolve_member_path(name)?
        } else {
            self.scopes.lookup(name)?
        };
        match bound {
            Value::Native(word) => word.invoke(self),
            Value::Code(body) => self.eval_in_frame(&body),
            Value::Scope(scope) => Err(Failure::type_mismatch(format!(
                "scope {} cannot be invoked without a member name",
                scope.name()
            ))),
            other => {
                self.stack.push(other);
                Ok(())
            }
        }
    }

    /// Resolves a `::`-qualified call name by chained member access: an
    /// optional leading `std::` is dropped (the loader strips it the same
    /// way when binding), the first segment is looked up in the scope
    /// chain, and each further segment goes through a scope-ref.
    fn resolve_member_path(&self, name: &str) -> RunResult<Value> {
        let path = name.strip_prefix("std::").unwrap_or(name);
        let mut segments = path.split("::");
        let first = segments.next().unwrap_or_default();
        let mut current = self.scopes.lookup(first)?;
        for segment in segments {
            let Value::Scope(scope) = current else {
                return Err(Failure::type_mismatch(format!(
                    "{name}: member access through a {} value",
                    current.tag_name()
                )));
            };
            current = scope
                .get(segment)
                .ok_or_else(|| Failure::name_not_found(format!("{name} (missing {segment})")))?;
        }
        Ok(current)
    }

    /// Evaluates a code block in a fresh scope frame; the frame is popped
    /// on success and failure alike.
    pub fn eval_in_frame(&mut self, tokens: &[Token]) -> RunResult<()> {
        self.scopes.push_frame();
        let result = self.eval(tokens);
        self.scopes.pop_frame();
        result
    }

    #[must_use]
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    #[must_use]
    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeChain {
        &mut self.scopes
    }

    pub fn writer_mut(&mut self) -> &mut dyn PrintWriter {
        &mut *self.writer
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn set_argv(&mut self, argv: Vec<String>) {
        self.argv = argv;
    }

    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn set_current_dir(&mut self, dir: impl Into<PathBuf>) {
        self.current_dir = dir.into();
    }

    /// Registers a host extension module, importable under `name`.
    pub fn register_extension(&mut self, name: impl Into<String>, module: Module) {
        self.extensions.insert(name.into(), Rc::new(module));
    }

    pub(crate) fn extension(&self, name: &str) -> Option<Rc<Module>> {
        self.extensions.get(name).cloned()
    }

    /// Sets this interpreter's break flag; the innermost running iteration
    /// word observes and clears it.
    pub fn request_break(&mut self) {
        self.break_requested = true;
    }

    /// Clears and returns the break flag. Iteration words call this before
    /// every round.
    pub(crate) fn take_break(&mut self) -> bool {
        std::mem::take(&mut self.break_requested)
    }

    /// Consumes the interpreter, returning its program frame. The module
    /// loader uses this to wrap an evaluated source module as a scope-ref.
    pub(crate) fn into_program_frame(self) -> AHashMap<String, Value> {
        self.scopes.into_program_frame()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
