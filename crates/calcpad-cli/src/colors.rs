//! Terminal color constants and utilities for CLI output.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";

/// Whether stdout is a terminal. Piped output stays free of escape codes.
fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| io::stdout().is_terminal())
}

/// Wrap `text` in `color` when writing to a terminal.
pub fn paint(color: &str, text: impl std::fmt::Display) -> String {
    if enabled() {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}
