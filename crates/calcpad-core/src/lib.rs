//! Core engine for the calcpad calculation pad.
//!
//! This crate provides:
//! - [`Pad`], a key/value store where every key holds a value or a formula
//! - A stack-based resolver that evaluates formulas lazily, at most once per pass
//! - Missing-key and cycle detection reported per resolution pass
//!
//! # Example
//!
//! ```
//! use calcpad_core::Pad;
//!
//! let mut pad = Pad::new();
//! pad.put_value("a", 1);
//! pad.put_value("b", 2);
//! pad.put_value("c", 3);
//! pad.put_formula("x", |args: &[i32]| args.iter().sum(), ["a", "b"]);
//! pad.put_formula("y", |args: &[i32]| args.iter().sum(), ["b", "c"]);
//! pad.put_formula("z", |args: &[i32]| args.iter().product(), ["x", "y"]);
//!
//! let results: Vec<_> = pad.calc(&["x", "y", "z"]).collect();
//! assert_eq!(results, vec![("x", 3), ("y", 5), ("z", 15)]);
//! ```

pub mod engine;
pub mod error;
pub mod store;

pub use engine::{PassOutcome, PassStats, Resolution, resolve};
pub use error::{PassError, PassResult};
pub use store::{Cell, CellSource, Formula, Pad};
