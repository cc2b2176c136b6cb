//! Evaluation stack with an active-key set for cycle detection.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{PassError, PassResult};
use crate::store::Formula;

/// A formula whose arguments are being collected.
pub(crate) struct Frame<K, V> {
    pub(crate) key: K,
    pub(crate) formula: Arc<Formula<K, V>>,
    /// Resolved prefix of the formula's dependencies.
    pub(crate) args: Vec<V>,
}

impl<K, V> Frame<K, V> {
    /// Whether every dependency has a resolved argument.
    pub(crate) fn is_ready(&self) -> bool {
        self.args.len() == self.formula.arity()
    }
}

/// Stack of suspended formula evaluations.
///
/// A key is in `active` exactly while it has a frame on the stack.
pub(crate) struct EvalStack<K, V> {
    frames: Vec<Frame<K, V>>,
    active: FxHashSet<K>,
}

impl<K, V> EvalStack<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            frames: Vec::new(),
            active: FxHashSet::default(),
        }
    }

    /// Push a frame for `key`, failing if `key` is already being evaluated.
    pub(crate) fn push(&mut self, key: K, formula: Arc<Formula<K, V>>) -> PassResult<K, ()> {
        if !self.active.insert(key.clone()) {
            return Err(PassError::Cycle(key));
        }

        let args = Vec::with_capacity(formula.arity());
        self.frames.push(Frame { key, formula, args });
        Ok(())
    }

    /// Pop the top frame. Returns `true` when the stack is empty afterwards.
    pub(crate) fn pop(&mut self) -> bool {
        if let Some(frame) = self.frames.pop() {
            self.active.remove(&frame.key);
        }
        self.frames.is_empty()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame<K, V>> {
        self.frames.last_mut()
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every frame after a failed evaluation.
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(deps: &[&'static str]) -> Arc<Formula<&'static str, i32>> {
        Arc::new(Formula::new(|args: &[i32]| args.iter().sum(), deps.iter().copied()))
    }

    #[test]
    fn test_push_pop_tracks_active() {
        let mut stack = EvalStack::new();
        stack.push("a", formula(&["b"])).unwrap();
        stack.push("b", formula(&[])).unwrap();
        assert_eq!(stack.depth(), 2);

        assert!(!stack.pop());
        // "b" left the active set, so it can be pushed again
        stack.push("b", formula(&[])).unwrap();
        assert!(!stack.pop());
        assert!(stack.pop());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_active_key_is_cycle() {
        let mut stack = EvalStack::new();
        stack.push("a", formula(&["a"])).unwrap();
        assert_eq!(stack.push("a", formula(&["a"])), Err(PassError::Cycle("a")));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_clear_resets_active() {
        let mut stack = EvalStack::new();
        stack.push("a", formula(&[])).unwrap();
        stack.clear();
        assert!(stack.is_empty());
        stack.push("a", formula(&[])).unwrap();
    }

    #[test]
    fn test_frame_ready() {
        let mut stack = EvalStack::new();
        stack.push("a", formula(&["x", "y"])).unwrap();
        let frame = stack.top_mut().unwrap();
        assert!(!frame.is_ready());
        frame.args.extend([1, 2]);
        assert!(frame.is_ready());
    }
}
