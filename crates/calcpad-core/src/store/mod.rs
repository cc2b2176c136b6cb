//! Key/value store of plain values and formulas.
//!
//! This module provides:
//! - [`Pad`], the owning store
//! - [`Cell`] and [`Formula`], the per-key content
//! - [`CellSource`], the read-only lookup seam the resolver runs against

mod cell;
mod source;

pub use cell::{Cell, Formula, FormulaFn};
pub use source::CellSource;

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::engine::Resolution;

/// Minimum number of keys a pad allocates room for.
const MIN_PAD_SIZE: usize = 10;

/// A container mapping keys to values or formulas.
///
/// Keys are requested through [`Pad::calc`] or [`Pad::calc_seq`], which
/// produce a lazy [`Resolution`] yielding `(key, value)` pairs. Formula results
/// are computed on demand and memoized for the duration of that pass only.
pub struct Pad<K, V> {
    cells: FxHashMap<K, Cell<K, V>>,
}

impl<K, V> Pad<K, V>
where
    K: Eq + Hash,
{
    /// Create a new empty pad.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a pad able to hold at least `capacity` keys without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: FxHashMap::with_capacity_and_hasher(
                capacity.max(MIN_PAD_SIZE),
                Default::default(),
            ),
        }
    }

    /// Install or overwrite a value cell.
    pub fn put_value(&mut self, key: K, value: V) {
        self.cells.insert(key, Cell::Value(value));
    }

    /// Install or overwrite a formula cell.
    ///
    /// `function` receives one argument per entry in `dependencies`, in the same order.
    pub fn put_formula<F, D>(&mut self, key: K, function: F, dependencies: D)
    where
        F: Fn(&[V]) -> V + Send + Sync + 'static,
        D: IntoIterator<Item = K>,
    {
        self.cells
            .insert(key, Cell::Formula(Arc::new(Formula::new(function, dependencies))));
    }

    /// Install a single-argument formula.
    pub fn put_unary<F>(&mut self, key: K, function: F, arg: K)
    where
        F: Fn(&V) -> V + Send + Sync + 'static,
    {
        self.put_formula(
            key,
            move |args: &[V]| match args {
                [x] => function(x),
                _ => unreachable!("unary formula called with {} arguments", args.len()),
            },
            [arg],
        );
    }

    /// Install a two-argument formula.
    pub fn put_binary<F>(&mut self, key: K, function: F, lhs: K, rhs: K)
    where
        F: Fn(&V, &V) -> V + Send + Sync + 'static,
    {
        self.put_formula(
            key,
            move |args: &[V]| match args {
                [x, y] => function(x, y),
                _ => unreachable!("binary formula called with {} arguments", args.len()),
            },
            [lhs, rhs],
        );
    }

    /// Remove a key, returning its cell if it existed.
    pub fn remove(&mut self, key: &K) -> Option<Cell<K, V>> {
        self.cells.remove(key)
    }

    /// Get the cell stored under a key.
    pub fn get(&self, key: &K) -> Option<&Cell<K, V>> {
        self.cells.get(key)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.cells.contains_key(key)
    }

    /// Iterate over all keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.cells.keys()
    }

    /// Get the number of keys.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the pad is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl<K, V> Pad<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a pad as a copy of another one.
    pub fn from_other(other: &Self) -> Self {
        let mut pad = Self::with_capacity(other.len());
        pad.update_from(other);
        pad
    }

    /// Copy every cell of `other` into this pad. Keys present in both take
    /// the cell from `other`.
    pub fn update_from(&mut self, other: &Self) -> &mut Self {
        self.cells.extend(
            other
                .cells
                .iter()
                .map(|(key, cell)| (key.clone(), cell.clone())),
        );
        self
    }
}

impl<K, V> Pad<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Resolve a fixed list of keys.
    ///
    /// Returns a lazy iterator of `(key, value)` pairs in request order. The
    /// pass stops at the first missing key or cycle; see [`Resolution::error`].
    pub fn calc<'a>(
        &'a self,
        keys: &'a [K],
    ) -> Resolution<&'a Self, std::iter::Cloned<std::slice::Iter<'a, K>>> {
        Resolution::new(self, keys.iter().cloned())
    }

    /// Resolve an arbitrary sequence of keys.
    ///
    /// The sequence is pulled one key at a time, only as fast as the
    /// returned iterator is consumed.
    pub fn calc_seq<I>(&self, keys: I) -> Resolution<&Self, I::IntoIter>
    where
        I: IntoIterator<Item = K>,
    {
        Resolution::new(self, keys.into_iter())
    }
}

impl<K, V> Default for Pad<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Pad<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.cells.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_pad() -> Pad<i32, i32> {
        let mut pad = Pad::new();
        pad.put_value(1, 1);
        pad.put_value(2, 2);
        pad.put_formula(3, |args: &[i32]| args.iter().sum(), [1, 2]);
        pad
    }

    #[test]
    fn test_empty_pad() {
        let pad: Pad<&str, f64> = Pad::new();
        assert!(pad.is_empty());
        assert_eq!(pad.len(), 0);
        assert!(pad.cells.capacity() >= MIN_PAD_SIZE);
    }

    #[test]
    fn test_with_capacity_respects_minimum() {
        let pad: Pad<u32, u32> = Pad::with_capacity(2);
        assert!(pad.cells.capacity() >= MIN_PAD_SIZE);

        let pad: Pad<u32, u32> = Pad::with_capacity(100);
        assert!(pad.cells.capacity() >= 100);
    }

    #[test]
    fn test_put_and_overwrite() {
        let mut pad = base_pad();
        assert_eq!(pad.len(), 3);
        assert!(pad.get(&3).is_some_and(Cell::is_formula));

        pad.put_value(3, 30);
        assert_eq!(pad.len(), 3);
        assert_eq!(pad.get(&3).and_then(Cell::as_value), Some(&30));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut pad = base_pad();
        assert!(pad.remove(&1).is_some());
        assert!(pad.remove(&1).is_none());
        assert!(!pad.contains_key(&1));
        assert_eq!(pad.len(), 2);

        pad.clear();
        assert!(pad.is_empty());
    }

    #[test]
    fn test_from_other_is_independent_copy() {
        let original = base_pad();
        let mut copy = Pad::from_other(&original);
        assert_eq!(copy.len(), original.len());

        copy.remove(&2);
        assert!(original.contains_key(&2));
    }

    #[test]
    fn test_update_from_last_writer_wins() {
        let mut pad = base_pad();
        let mut other = Pad::new();
        other.put_value(2, 20);
        other.put_value(4, 4);

        pad.update_from(&other).put_value(5, 5);

        assert_eq!(pad.len(), 5);
        assert_eq!(pad.get(&2).and_then(Cell::as_value), Some(&20));
    }

    #[test]
    fn test_fixed_arity_helpers() {
        let mut pad = Pad::new();
        pad.put_value("a", 6);
        pad.put_value("b", 4);
        pad.put_binary("diff", |a: &i32, b: &i32| a - b, "a", "b");
        pad.put_unary("neg", |a: &i32| -a, "diff");

        let results: Vec<_> = pad.calc(&["diff", "neg"]).collect();
        assert_eq!(results, vec![("diff", 2), ("neg", -2)]);
    }

    #[test]
    fn test_keys_lists_everything() {
        let pad = base_pad();
        let mut keys: Vec<_> = pad.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2, 3]);
    }
}
