//! Resolution engine for calcpad.
//!
//! A resolution pass turns a requested key sequence into a lazy sequence of
//! `(key, value)` pairs. Formulas are evaluated depth-first with an explicit
//! stack instead of native recursion, so evaluation depth is limited only by
//! memory and a pass can be abandoned cleanly between pulls.
//!
//! # Architecture
//!
//! ```text
//! keys ──► Resolution (iterator, one key per pull)
//!              │
//!              ├── Value cell ──────────────► yield
//!              │
//!              └── Formula cell
//!                      │
//!                      └── Evaluator (pass-scoped)
//!                              ├── memo: key → result
//!                              └── EvalStack: frames + active set
//! ```
//!
//! All pass state lives in the [`Resolution`] and is dropped with it; two
//! passes over the same store share nothing.

mod evaluator;
mod resolution;
mod stack;

pub use evaluator::PassStats;
pub use resolution::{PassOutcome, Resolution, resolve};
