//! Sheet documents for calcpad.
//!
//! Loads JSON sheets of numeric values and operator formulas into a
//! [`calcpad_core::Pad`], and analyzes their dependency structure.
//!
//! # Architecture
//!
//! ```text
//! sheet.json ─────► SheetDocument ─────► validate ─────► Pad<String, f64>
//!                         │
//!                         ▼
//!                    SheetGraph (petgraph)
//!                    missing refs, cycles, order
//! ```

mod analysis;
mod document;
mod error;
mod operator;

pub use analysis::{Analysis, MissingReference, SheetGraph, analyze};
pub use document::{EntryKind, FormulaSpec, SheetDocument};
pub use error::{SheetError, SheetResult};
pub use operator::{Arity, Operator};

use std::path::Path;

use calcpad_core::Pad;

/// Load a sheet file straight into a pad.
pub fn load_pad(path: impl AsRef<Path>) -> SheetResult<Pad<String, f64>> {
    SheetDocument::from_path(path)?.to_pad()
}
