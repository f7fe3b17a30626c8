use smallvec::SmallVec;

use crate::exception::{Failure, RunResult};
use crate::value::Value;

/// The shared operand stack: a LIFO of values with bulk pop.
///
/// Underflow is a recoverable `StackUnderflow` failure; `pop_n` checks the
/// depth before removing anything, so a failed bulk pop leaves the stack
/// untouched.
#[derive(Debug, Default)]
pub struct OperandStack(Vec<Value>);

impl OperandStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// Pushes several values in argument order, so the last one ends up on
    /// top.
    pub fn push_many(&mut self, values: impl IntoIterator<Item = Value>) {
        self.0.extend(values);
    }

    pub fn pop(&mut self) -> RunResult<Value> {
        self.0
            .pop()
            .ok_or_else(|| Failure::stack_underflow("pop on empty stack"))
    }

    /// Pops two values, returned in the order they were pushed.
    pub fn pop2(&mut self) -> RunResult<(Value, Value)> {
        if self.0.len() < 2 {
            return Err(Failure::stack_underflow(format!(
                "need 2 values, stack holds {}",
                self.0.len()
            )));
        }
        let b = self.0.pop().expect("length checked");
        let a = self.0.pop().expect("length checked");
        Ok((a, b))
    }

    /// Pops three values, returned in the order they were pushed.
    pub fn pop3(&mut self) -> RunResult<(Value, Value, Value)> {
        if self.0.len() < 3 {
            return Err(Failure::stack_underflow(format!(
                "need 3 values, stack holds {}",
                self.0.len()
            )));
        }
        let c = self.0.pop().expect("length checked");
        let b = self.0.pop().expect("length checked");
        let a = self.0.pop().expect("length checked");
        Ok((a, b, c))
    }

    /// Pops `n` values, returned in the order they were pushed (bottom-most
    /// of the popped group first).
    pub fn pop_n(&mut self, n: usize) -> RunResult<SmallVec<[Value; 4]>> {
        if self.0.len() < n {
            return Err(Failure::stack_underflow(format!(
                "need {n} values, stack holds {}",
                self.0.len()
            )));
        }
        let split = self.0.len() - n;
        Ok(self.0.drain(split..).collect())
    }

    /// Removes and returns everything at or above `mark`, in push order.
    /// Used by the evaluator to materialize lists.
    pub(crate) fn split_off_from(&mut self, mark: usize) -> Vec<Value> {
        self.0.split_off(mark.min(self.0.len()))
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The values bottom-to-top.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn top(&self) -> Option<&Value> {
        self.0.last()
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
    fn pop_n_returns_values_in_push_order() {
        let mut stack = OperandStack::new();
        stack.push_many([int(1), int(2), int(3)]);
        let popped = stack.pop_n(2).unwrap();
        assert_eq!(popped.as_slice(), &[int(2), int(3)]);
        assert_eq!(stack.values(), &[int(1)]);
    }

    #[test]
    fn underflow_is_recoverable_and_nondestructive() {
        let mut stack = OperandStack::new();
        stack.push(int(1));
        let failure = stack.pop_n(2).unwrap_err();
        assert_eq!(
            *failure.kind(),
            FailKind::Builtin(BuiltinKind::StackUnderflow)
        );
        // the failed bulk pop removed nothing
        assert_eq!(stack.values(), &[int(1)]);
        assert!(stack.pop().is_ok());
        assert!(stack.pop().is_err());
    }

    #[test]
    fn pop2_and_pop3_match_pop_n() {
        let mut stack = OperandStack::new();
        stack.push_many([int(1), int(2), int(3)]);
        let (a, b, c) = stack.pop3().unwrap();
        assert_eq!((a, b, c), (int(1), int(2), int(3)));
        assert!(stack.pop2().is_err());
    }
}
