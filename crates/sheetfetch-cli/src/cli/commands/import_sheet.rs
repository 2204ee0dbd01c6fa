//! `sheetfetch import-sheet <snapshot.toml>` – share-link import driven by sheet cells.

use anyhow::{Context, Result};
use sheetfetch_core::cells::{CellValue, CellWriter, MemorySheet, ShareLinkInput};
use sheetfetch_core::config::SheetfetchConfig;
use std::path::Path;

use super::import::import_share_link;
use super::raw::raw_share_link;
use super::{print_import, print_raw};

/// Reads inputs through the cell layout, runs the import and writes the
/// status cell back into the snapshot (`Saved: ...` or `ERROR: ...`).
pub async fn run_import_sheet(cfg: &SheetfetchConfig, snapshot: &Path) -> Result<()> {
    let mut sheet = MemorySheet::load(snapshot)?;
    let layout = cfg.cell_layout();
    let result = import_from_sheet(cfg, &sheet).await;

    let status = match &result {
        Ok(path) => format!("Saved: {path}"),
        Err(e) => format!("ERROR: {e:#}"),
    };
    sheet.write_cell(&layout.status, CellValue::Text(status));
    sheet
        .save(snapshot)
        .with_context(|| format!("write status to {}", snapshot.display()))?;
    result.map(|_| ())
}

async fn import_from_sheet(cfg: &SheetfetchConfig, sheet: &MemorySheet) -> Result<String> {
    let input = ShareLinkInput::read(sheet, &cfg.cell_layout())?;
    if input.raw {
        let output = input
            .output_filename
            .as_deref()
            .context("raw mode needs an output filename (e.g. file.pdf)")?;
        let out = raw_share_link(cfg, &input.url, output).await?;
        print_raw(&out);
        Ok(out.path.display().to_string())
    } else {
        let out = import_share_link(
            cfg,
            &input.url,
            input.is_private,
            input.proxy_url.clone(),
            input.output_filename.as_deref(),
        )
        .await?;
        print_import(&out);
        Ok(out.path.display().to_string())
    }
}
