use std::rc::Rc;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::exception::{Failure, RunResult};
use crate::value::Value;

/// The layered name environment: a non-empty stack of identifier→value
/// frames.
///
/// `assign` writes to the innermost frame, `lookup` searches inner to
/// outer. Frames pushed for nested evaluation are popped on all exit paths
/// (the evaluator brackets evaluation with `push_frame`/`pop_frame`).
///
/// Frame 0 holds the builtin words merged in at interpreter construction;
/// frame 1 is the program's own outermost frame, which is what an imported
/// module exposes through its scope-ref.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<AHashMap<String, Value>>,
}

impl ScopeChain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![AHashMap::new()],
        }
    }

    /// Binds `name` in the innermost frame, overwriting any existing entry
    /// there.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.frames
            .last_mut()
            .expect("scope chain is never empty")
            .insert(name.into(), value);
    }

    /// Inner-to-outer search; a missing name is a `NameNotFound` failure.
    pub fn lookup(&self, name: &str) -> RunResult<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .cloned()
            .ok_or_else(|| Failure::name_not_found(name))
    }

    pub fn push_frame(&mut self) {
        self.frames.push(AHashMap::new());
    }

    /// Pops the innermost frame. The outermost frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames from innermost to outermost, for `show.scopes`.
    pub(crate) fn frames_inner_to_outer(
        &self,
    ) -> impl Iterator<Item = &AHashMap<String, Value>> {
        self.frames.iter().rev()
    }

    /// Extracts the program's outermost frame (frame 1, above the builtin
    /// frame). The module loader calls this on a finished interpreter to
    /// wrap a source module's bindings as a scope-ref.
    pub(crate) fn into_program_frame(mut self) -> AHashMap<String, Value> {
        if self.frames.len() > 1 {
            self.frames.swap_remove(1)
        } else {
            AHashMap::new()
        }
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

/// A first-class, read-only handle to a scope: the result of importing a
/// module. Shared ownership keeps an imported scope alive as long as any
/// holder references it.
#[derive(Debug, Clone)]
pub struct ScopeRef {
    name: Rc<str>,
    entries: Rc<IndexMap<String, Value>>,
}

impl ScopeRef {
    pub fn new(name: &str, entries: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            entries: Rc::new(entries),
        }
    }

    /// A one-entry scope, used to wrap intermediate path segments so that
    /// `a::b::c` resolves by chained member access.
    pub(crate) fn single(name: &str, key: String, value: Value) -> Self {
        let mut entries = IndexMap::with_capacity(1);
        entries.insert(key, value);
        Self::new(name, entries)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member access; `None` for a missing name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    /// Enumerates the entries in their registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two scope-refs are equal when they share storage or hold equal entries
/// under the same name — re-importing a module yields an equivalent
/// scope-ref, not necessarily the same allocation.
impl PartialEq for ScopeRef {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.entries, &other.entries) {
            return true;
        }
        self.name == other.name
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.entries.get(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::exception::{BuiltinKind, FailKind};

    fn int(n: i64) -> Value {
        Value::Int(BigInt::from(n))
    }

    #[test]
    fn assign_writes_innermost_and_lookup_searches_outward() {
        let mut scopes = ScopeChain::new();
        scopes.assign("x", int(1));
        scopes.push_frame();
        assert_eq!(scopes.lookup("x").unwrap(), int(1));
        scopes.assign("x", int(2));
        assert_eq!(scopes.lookup("x").unwrap(), int(2));
        scopes.pop_frame();
        // the inner binding died with its frame
        assert_eq!(scopes.lookup("x").unwrap(), int(1));
    }

    #[test]
    fn missing_name_is_name_not_found() {
        let scopes = ScopeChain::new();
        let failure = scopes.lookup("nope").unwrap_err();
        assert_eq!(
            *failure.kind(),
            FailKind::Builtin(BuiltinKind::NameNotFound)
        );
    }

    #[test]
    fn outermost_frame_survives_pop() {
        let mut scopes = ScopeChain::new();
        scopes.assign("x", int(1));
        scopes.pop_frame();
        assert_eq!(scopes.lookup("x").unwrap(), int(1));
    }

    #[test]
    fn scope_refs_compare_by_entries() {
        let mut a = IndexMap::new();
        a.insert("x".to_string(), int(1));
        let mut b = IndexMap::new();
        b.insert("x".to_string(), int(1));
        assert_eq!(ScopeRef::new("m", a), ScopeRef::new("m", b));

        let wrapped = ScopeRef::single("m", "inner".to_string(), int(2));
        assert_eq!(wrapped.get("inner"), Some(int(2)));
        assert_eq!(wrapped.get("other"), None);
    }
}
