//! Iterative depth-first formula evaluation.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{PassError, PassResult};
use crate::store::{Cell, CellSource, Formula};

use super::stack::EvalStack;

/// Counters describing a single resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Number of `(key, value)` pairs yielded so far.
    pub yielded: usize,
    /// Number of formula invocations.
    pub formulas_evaluated: usize,
    /// Number of lookups answered from the memo instead of evaluating.
    pub memo_hits: usize,
    /// Deepest evaluation stack reached.
    pub max_depth: usize,
}

/// Pass-scoped evaluation state: memo, stack and counters.
///
/// Created fresh for every pass and dropped with it.
pub(crate) struct Evaluator<K, V> {
    memo: FxHashMap<K, V>,
    stack: EvalStack<K, V>,
    pub(crate) stats: PassStats,
}

impl<K, V> Evaluator<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            memo: FxHashMap::default(),
            stack: EvalStack::new(),
            stats: PassStats::default(),
        }
    }

    /// Formula result already computed in this pass.
    pub(crate) fn memoized(&mut self, key: &K) -> Option<V> {
        let value = self.memo.get(key).cloned();
        if value.is_some() {
            self.stats.memo_hits += 1;
        }
        value
    }

    /// Evaluate `formula` for `key`, descending into dependencies with an
    /// explicit stack.
    ///
    /// Every formula reached is invoked at most once per pass; results land in
    /// the memo. On failure the stack is emptied and the failing key reported.
    pub(crate) fn evaluate<S>(
        &mut self,
        source: &S,
        key: K,
        formula: Arc<Formula<K, V>>,
    ) -> PassResult<K, V>
    where
        S: CellSource<Key = K, Value = V> + ?Sized,
    {
        debug_assert!(self.stack.is_empty(), "evaluation started with frames left over");
        self.push(key, formula)?;

        let result = self.run(source);
        if result.is_err() {
            self.stack.clear();
        }
        result
    }

    fn push(&mut self, key: K, formula: Arc<Formula<K, V>>) -> PassResult<K, ()> {
        trace!(key = ?key, depth = self.stack.depth(), "push formula");
        self.stack.push(key, formula)?;
        self.stats.max_depth = self.stats.max_depth.max(self.stack.depth());
        Ok(())
    }

    fn run<S>(&mut self, source: &S) -> PassResult<K, V>
    where
        S: CellSource<Key = K, Value = V> + ?Sized,
    {
        while let Some(frame) = self.stack.top_mut() {
            // Resume after the arguments collected before this frame was suspended.
            let formula = Arc::clone(&frame.formula);
            let mut descend = None;

            for dep in &formula.dependencies()[frame.args.len()..] {
                if let Some(value) = self.memo.get(dep) {
                    frame.args.push(value.clone());
                    self.stats.memo_hits += 1;
                    continue;
                }

                match source.lookup(dep) {
                    None => return Err(PassError::MissingKey(dep.clone())),
                    Some(Cell::Value(value)) => frame.args.push(value),
                    Some(Cell::Formula(next)) => {
                        descend = Some((dep.clone(), next));
                        break;
                    }
                }
            }

            if let Some((dep, next)) = descend {
                self.push(dep, next)?;
                continue;
            }

            debug_assert!(frame.is_ready());
            let value = formula.call(&frame.args);
            let key = frame.key.clone();
            self.stats.formulas_evaluated += 1;
            trace!(key = ?key, depth = self.stack.depth(), "formula evaluated");

            self.memo.insert(key, value.clone());
            if self.stack.pop() {
                return Ok(value);
            }
        }

        unreachable!("evaluation stack emptied before the root formula completed")
    }
}
