//! Cell and formula types.

use std::fmt;
use std::sync::Arc;

/// Function type stored inside a [`Formula`].
///
/// Receives the resolved dependency values in declaration order.
pub type FormulaFn<V> = dyn Fn(&[V]) -> V + Send + Sync;

/// A pure computation over the values of other keys.
///
/// Immutable once installed in a pad. The function must be deterministic and
/// accept exactly as many arguments as there are dependencies.
pub struct Formula<K, V> {
    function: Box<FormulaFn<V>>,
    dependencies: Vec<K>,
}

impl<K, V> Formula<K, V> {
    /// Create a formula from a function and its ordered dependency keys.
    ///
    /// Dependencies may be empty (a constant formula) and may repeat a key.
    pub fn new<F, D>(function: F, dependencies: D) -> Self
    where
        F: Fn(&[V]) -> V + Send + Sync + 'static,
        D: IntoIterator<Item = K>,
    {
        Self {
            function: Box::new(function),
            dependencies: dependencies.into_iter().collect(),
        }
    }

    /// Dependency keys in argument order.
    pub fn dependencies(&self) -> &[K] {
        &self.dependencies
    }

    /// Number of arguments the function expects.
    pub fn arity(&self) -> usize {
        self.dependencies.len()
    }

    /// Invoke the function on fully resolved arguments.
    pub fn call(&self, args: &[V]) -> V {
        debug_assert_eq!(
            args.len(),
            self.dependencies.len(),
            "formula invoked with the wrong number of arguments"
        );
        (self.function)(args)
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Formula<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Content of a single key in the pad.
pub enum Cell<K, V> {
    /// A terminal, already known value.
    Value(V),
    /// A formula computed on demand during a resolution pass.
    Formula(Arc<Formula<K, V>>),
}

impl<K, V> Cell<K, V> {
    /// Whether this cell holds a formula.
    pub fn is_formula(&self) -> bool {
        matches!(self, Self::Formula(_))
    }

    /// The stored value, if this is a value cell.
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Formula(_) => None,
        }
    }

    /// The formula, if this is a formula cell.
    pub fn as_formula(&self) -> Option<&Arc<Formula<K, V>>> {
        match self {
            Self::Value(_) => None,
            Self::Formula(formula) => Some(formula),
        }
    }
}

// Formulas are shared, so cloning only needs `V: Clone`.
impl<K, V: Clone> Clone for Cell<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Formula(formula) => Self::Formula(Arc::clone(formula)),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cell<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Formula(formula) => f.debug_tuple("Formula").field(formula).finish(),
        }
    }
}
