//! Check command implementation for calcpad CLI.
//!
//! Analyzes the whole dependency graph of a sheet without evaluating it.

use calcpad_sheet::{SheetDocument, analyze};

use crate::colors;

/// Check a sheet for missing references and cycles.
pub fn execute(sheet_path: &str) -> anyhow::Result<()> {
    let document = SheetDocument::from_path(sheet_path)?;
    document.validate()?;

    let analysis = analyze(&document);

    if let Some(title) = &document.title {
        println!("{}", colors::paint(colors::BOLD, title));
    }

    for reference in &analysis.missing {
        println!(
            "{} '{}' depends on '{}', which is not defined",
            colors::paint(colors::RED, "missing:"),
            reference.formula,
            reference.missing
        );
    }

    for cycle in &analysis.cycles {
        let mut path = cycle.clone();
        path.push(cycle[0].clone());
        println!(
            "{} {}",
            colors::paint(colors::RED, "cycle:"),
            path.join(" → ")
        );
    }

    if !analysis.is_clean() {
        anyhow::bail!(
            "sheet has {} missing references and {} cycles",
            analysis.missing.len(),
            analysis.cycles.len()
        );
    }

    println!(
        "{} {} keys, evaluation order: {}",
        colors::paint(colors::GREEN, "ok:"),
        analysis.order.len(),
        analysis.order.join(", ")
    );

    Ok(())
}
