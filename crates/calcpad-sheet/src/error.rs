//! Error types for sheet loading.

use std::path::PathBuf;

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors that can occur while loading a sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// Failed to read the sheet file.
    #[error("Failed to read file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// Failed to parse the sheet JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A formula names an operator that does not exist.
    #[error("Unknown operator '{op}' in formula '{key}'")]
    UnknownOperator { key: String, op: String },

    /// A formula is malformed (wrong argument count, missing constant, ...).
    #[error("Invalid formula '{key}': {message}")]
    InvalidFormula { key: String, message: String },

    /// The same key is defined both as a value and as a formula.
    #[error("Key '{0}' is defined both as a value and as a formula")]
    DuplicateKey(String),
}

impl SheetError {
    pub(crate) fn invalid_formula(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidFormula {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
