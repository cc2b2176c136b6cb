//! Integration tests for loading sheets from disk and resolving them.

use std::fs;
use std::path::PathBuf;

use calcpad_core::PassError;
use calcpad_sheet::{SheetDocument, SheetError, analyze, load_pad};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A sheet written to a temporary directory.
struct TestSheet {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestSheet {
    fn new(source: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("sheet.json");
        fs::write(&path, source).expect("Failed to write sheet");
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

const TOTALS: &str = r#"{
    "values": { "a": 1, "b": 2, "c": 3, "d": 4 },
    "formulas": {
        "e": { "op": "sum", "args": ["a", "b"] },
        "f": { "op": "sum", "args": ["c", "d"] },
        "g": { "op": "sum", "args": ["e", "f"] },
        "avg": { "op": "mean", "args": ["a", "b", "c", "d"] },
        "spread": { "op": "sub", "args": ["d", "a"] }
    }
}"#;

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_and_resolve() {
    let sheet = TestSheet::new(TOTALS);
    let pad = load_pad(&sheet.path).unwrap();

    let requested = keys(&["e", "f", "g", "avg", "spread"]);
    let outcome = pad.calc(&requested).into_outcome();
    assert!(outcome.error.is_none());

    let values: Vec<f64> = outcome.pairs.into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, vec![3.0, 7.0, 10.0, 2.5, 3.0]);
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_pad(temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SheetError::ReadError { .. }));
}

#[test]
fn test_removed_value_reports_missing_key() {
    let sheet = TestSheet::new(TOTALS);
    let mut pad = load_pad(&sheet.path).unwrap();
    pad.remove(&"a".to_string());

    let requested = keys(&["e", "f", "g"]);
    let outcome = pad.calc(&requested).into_outcome();
    assert!(outcome.pairs.is_empty());
    assert_eq!(outcome.error, Some(PassError::MissingKey("a".to_string())));
}

// =============================================================================
// Analysis
// =============================================================================

#[test]
fn test_analysis_agrees_with_resolver_on_cycles() {
    let sheet = TestSheet::new(
        r#"{
            "values": { "v": 1 },
            "formulas": {
                "p": { "op": "sum", "args": ["q", "v"] },
                "q": { "op": "neg", "args": ["p"] }
            }
        }"#,
    );
    let document = SheetDocument::from_path(&sheet.path).unwrap();

    let analysis = analyze(&document);
    assert_eq!(analysis.cycles, vec![keys(&["p", "q"])]);

    let pad = document.to_pad().unwrap();
    let requested = keys(&["p"]);
    let outcome = pad.calc(&requested).into_outcome();
    assert!(outcome.pairs.is_empty());
    assert!(outcome.error.is_some_and(|e| e.is_cycle()));
}

#[test]
fn test_order_resolves_every_key() {
    let document = SheetDocument::parse(TOTALS).unwrap();
    let analysis = analyze(&document);
    assert!(analysis.is_clean());

    let pad = document.to_pad().unwrap();
    let outcome = pad.calc(&analysis.order).into_outcome();
    assert!(outcome.error.is_none());
    assert_eq!(outcome.pairs.len(), document.keys().len());
    // dependencies come first, so no formula had to descend
    assert_eq!(outcome.stats.max_depth, 1);
}
