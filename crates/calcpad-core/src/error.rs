//! Error types for calcpad-core.

use std::fmt;

use thiserror::Error;

/// Result type for a single resolution step.
pub type PassResult<K, T> = std::result::Result<T, PassError<K>>;

/// Terminal failure of a resolution pass.
///
/// A pass records at most one of these: the first failure stops the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError<K> {
    /// A key was required, either requested directly or as a dependency,
    /// but the store has no cell for it.
    #[error("missing key \"{0}\"")]
    MissingKey(K),

    /// Evaluating a formula re-entered a key that was already being evaluated.
    #[error("cycle detected on key \"{0}\"")]
    Cycle(K),
}

impl<K> PassError<K> {
    /// The key that was absent or re-entered.
    pub fn key(&self) -> &K {
        match self {
            Self::MissingKey(key) | Self::Cycle(key) => key,
        }
    }

    /// Whether this is a missing key failure.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey(_))
    }

    /// Whether this is a cycle failure.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle(_))
    }

    /// Format the error with a recovery hint for command-line output.
    pub fn with_hint(&self) -> String
    where
        K: fmt::Display,
    {
        let hint = match self {
            Self::MissingKey(_) => "define a value or formula for this key, or drop it from the request",
            Self::Cycle(_) => "a formula depends on itself, directly or through other formulas",
        };
        format!("{self}\n  hint: {hint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_cli_wording() {
        assert_eq!(
            PassError::MissingKey(123).to_string(),
            "missing key \"123\""
        );
        assert_eq!(
            PassError::Cycle("x").to_string(),
            "cycle detected on key \"x\""
        );
    }

    #[test]
    fn test_key_accessor() {
        assert_eq!(PassError::MissingKey("a").key(), &"a");
        assert_eq!(PassError::Cycle(7).key(), &7);
        assert!(PassError::Cycle(7).is_cycle());
        assert!(!PassError::Cycle(7).is_missing_key());
    }

    #[test]
    fn test_with_hint_keeps_message_first() {
        let text = PassError::MissingKey("rate").with_hint();
        assert!(text.starts_with("missing key \"rate\"\n"));
        assert!(text.contains("hint:"));
    }
}
