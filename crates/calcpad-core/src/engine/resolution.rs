//! Lazy, pull-based resolution passes.

use std::fmt;
use std::iter::FusedIterator;

use tracing::debug;

use crate::error::{PassError, PassResult};
use crate::store::{Cell, CellSource};

use super::evaluator::{Evaluator, PassStats};

/// Resolve `keys` against `source`.
///
/// Works with any [`CellSource`], including shared wrappers such as
/// `&RefCell<Pad<K, V>>` that allow new keys to be added between pulls.
pub fn resolve<S, I>(source: S, keys: I) -> Resolution<S, I::IntoIter>
where
    S: CellSource,
    I: IntoIterator<Item = S::Key>,
{
    Resolution::new(source, keys.into_iter())
}

/// A single resolution pass.
///
/// Yields `(key, value)` pairs in request order. Nothing is computed until the
/// next item is pulled, and dropping the iterator abandons the pass along with
/// its memo and evaluation stack.
///
/// The first missing key or cycle ends the pass. No pair is yielded for the
/// failing key; pairs yielded earlier remain valid. The failure is then
/// available from [`Resolution::error`].
pub struct Resolution<S, I>
where
    S: CellSource,
{
    source: S,
    keys: I,
    evaluator: Evaluator<S::Key, S::Value>,
    error: Option<PassError<S::Key>>,
    finished: bool,
}

impl<S, I> Resolution<S, I>
where
    S: CellSource,
    I: Iterator<Item = S::Key>,
{
    /// Start a pass. Performs no lookups until the first pull.
    pub fn new(source: S, keys: I) -> Self {
        Self {
            source,
            keys,
            evaluator: Evaluator::new(),
            error: None,
            finished: false,
        }
    }

    /// The failure that ended this pass, if any.
    pub fn error(&self) -> Option<&PassError<S::Key>> {
        self.error.as_ref()
    }

    /// Whether the pass has ended, either by exhausting the keys or by failing.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Counters for the work done so far.
    pub fn stats(&self) -> PassStats {
        self.evaluator.stats
    }

    /// The pass status so far, without pulling further keys.
    ///
    /// `Ok` does not imply the pass ran to completion; abandoned passes report
    /// no error.
    pub fn into_result(self) -> PassResult<S::Key, ()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Drive the pass to its end and collect everything it produced.
    pub fn into_outcome(mut self) -> PassOutcome<S::Key, S::Value> {
        let pairs = self.by_ref().collect();
        PassOutcome {
            pairs,
            error: self.error,
            stats: self.evaluator.stats,
        }
    }

    fn resolve_one(&mut self, key: S::Key) -> PassResult<S::Key, (S::Key, S::Value)> {
        match self.source.lookup(&key) {
            None => Err(PassError::MissingKey(key)),
            Some(Cell::Value(value)) => Ok((key, value)),
            Some(Cell::Formula(formula)) => {
                let value = match self.evaluator.memoized(&key) {
                    Some(value) => value,
                    None => self
                        .evaluator
                        .evaluate(&self.source, key.clone(), formula)?,
                };
                Ok((key, value))
            }
        }
    }
}

impl<S, I> Iterator for Resolution<S, I>
where
    S: CellSource,
    I: Iterator<Item = S::Key>,
{
    type Item = (S::Key, S::Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(key) = self.keys.next() else {
            self.finished = true;
            debug!(stats = ?self.evaluator.stats, "resolution pass complete");
            return None;
        };

        match self.resolve_one(key) {
            Ok(pair) => {
                self.evaluator.stats.yielded += 1;
                Some(pair)
            }
            Err(err) => {
                debug!(error = ?err, stats = ?self.evaluator.stats, "resolution pass failed");
                self.error = Some(err);
                self.finished = true;
                None
            }
        }
    }
}

impl<S, I> FusedIterator for Resolution<S, I>
where
    S: CellSource,
    I: Iterator<Item = S::Key>,
{
}

impl<S, I> fmt::Debug for Resolution<S, I>
where
    S: CellSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("error", &self.error)
            .field("finished", &self.finished)
            .field("stats", &self.evaluator.stats)
            .finish_non_exhaustive()
    }
}

/// Everything a pass produced once driven to its end.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome<K, V> {
    /// Pairs yielded before the pass ended.
    pub pairs: Vec<(K, V)>,
    /// The failure that ended the pass, if any.
    pub error: Option<PassError<K>>,
    /// Work counters for the whole pass.
    pub stats: PassStats,
}

impl<K, V> PassOutcome<K, V> {
    /// The pairs, or the failure if the pass did not complete.
    pub fn into_result(self) -> PassResult<K, Vec<(K, V)>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.pairs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Pad;

    fn pad() -> Pad<&'static str, i32> {
        let mut pad = Pad::new();
        pad.put_value("a", 1);
        pad.put_value("b", 2);
        pad.put_formula("x", |args: &[i32]| args.iter().sum(), ["a", "b"]);
        pad
    }

    #[test]
    fn test_nothing_happens_before_first_pull() {
        let pad = pad();
        let pass = pad.calc(&["missing"]);
        assert!(!pass.is_finished());
        assert!(pass.error().is_none());
        assert_eq!(pass.stats(), PassStats::default());
    }

    #[test]
    fn test_fused_after_error() {
        let pad = pad();
        let mut pass = pad.calc(&["a", "missing", "b"]);
        assert_eq!(pass.next(), Some(("a", 1)));
        assert_eq!(pass.next(), None);
        assert_eq!(pass.next(), None);
        assert_eq!(pass.error(), Some(&PassError::MissingKey("missing")));
        assert_eq!(pass.stats().yielded, 1);
    }

    #[test]
    fn test_top_level_memo_hit() {
        let pad = pad();
        let outcome = pad.calc(&["x", "x"]).into_outcome();
        assert_eq!(outcome.pairs, vec![("x", 3), ("x", 3)]);
        assert_eq!(outcome.stats.formulas_evaluated, 1);
        assert_eq!(outcome.stats.memo_hits, 1);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_outcome_into_result() {
        let pad = pad();
        assert_eq!(
            pad.calc(&["a", "x"]).into_outcome().into_result(),
            Ok(vec![("a", 1), ("x", 3)])
        );
        assert_eq!(
            pad.calc(&["nope"]).into_outcome().into_result(),
            Err(PassError::MissingKey("nope"))
        );
    }

    #[test]
    fn test_into_result_without_draining() {
        let pad = pad();
        let mut pass = pad.calc(&["a", "nope"]);
        assert_eq!(pass.next(), Some(("a", 1)));
        assert_eq!(pass.into_result(), Ok(()));
    }
}
