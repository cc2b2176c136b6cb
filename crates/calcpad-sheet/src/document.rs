//! Sheet documents and their conversion into a [`Pad`].
//!
//! A sheet is a JSON object:
//!
//! ```json
//! {
//!   "title": "Quarterly totals",
//!   "values":   { "a": 1, "b": 2, "c": 3 },
//!   "formulas": {
//!     "x": { "op": "sum", "args": ["a", "b"] },
//!     "z": { "op": "product", "args": ["x", "c"] },
//!     "k": { "op": "const", "value": 7 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use calcpad_core::Pad;
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};
use crate::operator::Operator;

/// A formula as written in a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSpec {
    /// Operator name, see [`Operator`].
    pub op: String,

    /// Dependency keys, in argument order.
    #[serde(default)]
    pub args: Vec<String>,

    /// Constant for the `const` operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Kind of a sheet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Value,
    Formula,
}

/// A parsed sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetDocument {
    /// Optional human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Plain values by key.
    #[serde(default)]
    pub values: BTreeMap<String, f64>,

    /// Formulas by key.
    #[serde(default)]
    pub formulas: BTreeMap<String, FormulaSpec>,
}

impl SheetDocument {
    /// Read and parse a sheet file.
    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| SheetError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let document = Self::parse(&source)?;
        tracing::debug!(
            "Loaded sheet {} ({} values, {} formulas)",
            path.display(),
            document.values.len(),
            document.formulas.len()
        );
        Ok(document)
    }

    /// Parse a sheet from JSON text.
    pub fn parse(source: &str) -> SheetResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serialize the sheet as pretty-printed JSON.
    pub fn to_json(&self) -> SheetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .values
            .keys()
            .chain(self.formulas.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Kind of the entry under `key`, if any.
    pub fn kind(&self, key: &str) -> Option<EntryKind> {
        if self.values.contains_key(key) {
            Some(EntryKind::Value)
        } else if self.formulas.contains_key(key) {
            Some(EntryKind::Formula)
        } else {
            None
        }
    }

    /// Check every formula's operator and argument count.
    ///
    /// Malformed formulas are rejected here so that evaluation never sees
    /// an argument list its function cannot handle.
    pub fn validate(&self) -> SheetResult<()> {
        if let Some(key) = self.values.keys().find(|key| self.formulas.contains_key(*key)) {
            return Err(SheetError::DuplicateKey(key.clone()));
        }

        for (key, spec) in &self.formulas {
            resolve_operator(key, spec)?;
        }
        Ok(())
    }

    /// Build a pad holding every value and formula of this sheet.
    pub fn to_pad(&self) -> SheetResult<Pad<String, f64>> {
        self.validate()?;

        let mut pad = Pad::with_capacity(self.values.len() + self.formulas.len());
        for (key, value) in &self.values {
            pad.put_value(key.clone(), *value);
        }

        for (key, spec) in &self.formulas {
            match resolve_operator(key, spec)? {
                (Operator::Const, Some(constant)) => {
                    pad.put_formula(key.clone(), move |_: &[f64]| constant, []);
                }
                (op, _) => {
                    pad.put_formula(
                        key.clone(),
                        move |args: &[f64]| op.apply(args),
                        spec.args.iter().cloned(),
                    );
                }
            }
        }

        Ok(pad)
    }
}

/// Parse the operator of a formula and check its arguments.
fn resolve_operator(key: &str, spec: &FormulaSpec) -> SheetResult<(Operator, Option<f64>)> {
    let op: Operator = spec.op.parse().map_err(|op| SheetError::UnknownOperator {
        key: key.to_string(),
        op,
    })?;

    let arity = op.arity();
    if !arity.accepts(spec.args.len()) {
        return Err(SheetError::invalid_formula(
            key,
            format!("'{op}' takes {arity}, got {}", spec.args.len()),
        ));
    }

    match (op, spec.value) {
        (Operator::Const, None) => Err(SheetError::invalid_formula(
            key,
            "'const' requires a numeric 'value'",
        )),
        (Operator::Const, constant) => Ok((op, constant)),
        (_, Some(_)) => Err(SheetError::invalid_formula(
            key,
            format!("'value' is only allowed with 'const', not '{op}'"),
        )),
        (_, None) => Ok((op, None)),
    }
}
