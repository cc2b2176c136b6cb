//! Keys command implementation for calcpad CLI.

use calcpad_sheet::{EntryKind, SheetDocument};

use crate::colors;

/// List the keys of a sheet.
pub fn execute(sheet_path: &str) -> anyhow::Result<()> {
    let document = SheetDocument::from_path(sheet_path)?;

    for key in document.keys() {
        let description = match document.kind(key) {
            Some(EntryKind::Formula) => {
                let spec = &document.formulas[key];
                colors::paint(
                    colors::YELLOW,
                    format!("{}({})", spec.op, spec.args.join(", ")),
                )
            }
            _ => colors::paint(colors::DIM, "value"),
        };
        println!("{key}  {description}");
    }

    Ok(())
}
