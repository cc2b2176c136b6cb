//! Read-only lookup seam between stores and the resolver.

use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Cell, Pad};

/// Read access to cells, as seen by a resolution pass.
///
/// `lookup` must be side-effect free and must return the same answer for an
/// existing key for the whole pass. New keys may appear between lookups;
/// existing cells must not be changed or removed while a pass is running.
/// The resolver does not enforce this.
///
/// Wrappers such as [`RefCell`] and [`RwLock`] implement this trait by holding
/// their borrow for a single lookup only, so cells can be added to the
/// underlying pad between pulls of a running pass.
pub trait CellSource {
    /// Key type.
    type Key: Eq + Hash + Clone + Debug;
    /// Value type.
    type Value: Clone;

    /// Look up the cell for `key`. `None` means the key is not present.
    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>>;
}

impl<K, V> CellSource for Pad<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<Cell<K, V>> {
        self.get(key).cloned()
    }
}

impl<S: CellSource + ?Sized> CellSource for &S {
    type Key = S::Key;
    type Value = S::Value;

    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>> {
        (**self).lookup(key)
    }
}

impl<S: CellSource + ?Sized> CellSource for Rc<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>> {
        (**self).lookup(key)
    }
}

impl<S: CellSource + ?Sized> CellSource for Arc<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>> {
        (**self).lookup(key)
    }
}

/// Panics if the cell is mutably borrowed while a lookup runs.
impl<S: CellSource> CellSource for RefCell<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>> {
        self.borrow().lookup(key)
    }
}

impl<S: CellSource> CellSource for RwLock<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn lookup(&self, key: &Self::Key) -> Option<Cell<Self::Key, Self::Value>> {
        // Lookups never leave the store half-written, so a poisoned lock is still readable.
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> Pad<&'static str, i32> {
        let mut pad = Pad::new();
        pad.put_value("a", 1);
        pad.put_formula("b", |args: &[i32]| args[0] + 1, ["a"]);
        pad
    }

    #[test]
    fn test_pad_lookup() {
        let pad = pad();
        assert!(matches!(pad.lookup(&"a"), Some(Cell::Value(1))));
        assert!(matches!(pad.lookup(&"b"), Some(Cell::Formula(_))));
        assert!(pad.lookup(&"c").is_none());
    }

    #[test]
    fn test_wrappers_delegate() {
        let shared = Rc::new(RefCell::new(pad()));
        assert!(matches!(shared.lookup(&"a"), Some(Cell::Value(1))));

        shared.borrow_mut().put_value("c", 3);
        assert!(matches!(shared.lookup(&"c"), Some(Cell::Value(3))));

        let locked = Arc::new(RwLock::new(pad()));
        assert!(matches!(locked.lookup(&"b"), Some(Cell::Formula(_))));
    }
}
