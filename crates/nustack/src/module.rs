use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::exception::RunResult;
use crate::interp::Interpreter;
use crate::scope::ScopeRef;
use crate::value::Value;

/// The host callable behind a native word. It reads its inputs by popping
/// the interpreter's stack and pushes its outputs; a returned failure is
/// catchable by `try`.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter) -> RunResult<()>>;

/// A named host function with its stack-effect signature and docstring.
///
/// Signature and docstring are metadata carried for tooling; the
/// interpreter itself only calls `invoke`.
#[derive(Clone)]
pub struct NativeWord {
    name: String,
    signature: String,
    doc: String,
    func: NativeFn,
}

impl NativeWord {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The informal stack effect, e.g. `"(a b -- c)"`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn invoke(&self, interp: &mut Interpreter) -> RunResult<()> {
        (self.func)(interp)
    }
}

impl fmt::Debug for NativeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeWord")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A table of native words exposed under a display name.
///
/// A host builds a module by registering callables and constants during
/// construction; after construction the contents are read-only. Loading a
/// module flattens it to a [`ScopeRef`] via [`Module::to_scope_ref`].
#[derive(Debug, Default)]
pub struct Module {
    name: String,
    words: IndexMap<String, Rc<NativeWord>>,
    constants: IndexMap<String, Value>,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            words: IndexMap::new(),
            constants: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers one callable under one or more aliases. The first alias is
    /// the word's primary name.
    pub fn register(
        &mut self,
        names: &[&str],
        signature: &str,
        doc: &str,
        func: impl Fn(&mut Interpreter) -> RunResult<()> + 'static,
    ) {
        let word = Rc::new(NativeWord {
            name: names.first().map_or_else(String::new, ToString::to_string),
            signature: signature.to_string(),
            doc: doc.to_string(),
            func: Rc::new(func),
        });
        for alias in names {
            self.words.insert((*alias).to_string(), Rc::clone(&word));
        }
    }

    /// Registers a constant value exposed as a member of the module.
    pub fn register_value(&mut self, name: &str, value: Value) {
        self.constants.insert(name.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<NativeWord>> {
        self.words.get(name)
    }

    /// The registered words in registration order.
    pub fn words(&self) -> impl Iterator<Item = (&str, &Rc<NativeWord>)> {
        self.words.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flattens words and constants into a scope-ref for binding into a
    /// caller's scope.
    #[must_use]
    pub fn to_scope_ref(&self) -> ScopeRef {
        let mut entries = IndexMap::with_capacity(self.words.len() + self.constants.len());
        for (name, word) in &self.words {
            entries.insert(name.clone(), Value::Native(Rc::clone(word)));
        }
        for (name, value) in &self.constants {
            entries.insert(name.clone(), value.clone());
        }
        ScopeRef::new(&self.name, entries)
    }
}
