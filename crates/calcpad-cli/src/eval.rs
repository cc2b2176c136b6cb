//! Eval command implementation for calcpad CLI.
//!
//! Resolves the requested keys of a sheet, printing each result as soon as
//! it is produced.

use calcpad_sheet::SheetDocument;

use crate::colors;

/// Evaluate a sheet.
pub fn execute(sheet_path: &str, keys: &[String], show_stats: bool) -> anyhow::Result<()> {
    let document = SheetDocument::from_path(sheet_path)?;
    let pad = document.to_pad()?;

    let requested: Vec<String> = if keys.is_empty() {
        document.keys().into_iter().map(str::to_string).collect()
    } else {
        keys.to_vec()
    };
    tracing::debug!("Resolving {} keys from {}", requested.len(), sheet_path);

    let mut pass = pad.calc(&requested);
    for (key, value) in pass.by_ref() {
        println!("{} = {}", colors::paint(colors::CYAN, &key), value);
    }

    if show_stats {
        let stats = pass.stats();
        println!(
            "{}",
            colors::paint(
                colors::DIM,
                format!(
                    "{} results, {} formulas evaluated, {} memo hits, max depth {}",
                    stats.yielded, stats.formulas_evaluated, stats.memo_hits, stats.max_depth
                )
            )
        );
    }

    if let Some(err) = pass.error() {
        anyhow::bail!("{}", err.with_hint());
    }

    Ok(())
}
