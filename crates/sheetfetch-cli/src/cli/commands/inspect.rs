//! `sheetfetch inspect` – magic-byte check of the last raw download.

use anyhow::{bail, Result};
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::import_state;
use sheetfetch_core::inspect::inspect_path;

use super::staging;

pub fn run_inspect(cfg: &SheetfetchConfig) -> Result<()> {
    let Some(state) = import_state::load(&staging(cfg).state_path()) else {
        bail!("no previous import found; run `sheetfetch raw` first");
    };
    if !state.file_path.exists() {
        bail!("file not found: {}", state.file_path.display());
    }

    let report = inspect_path(&state.file_path, &state.file_type)?;
    println!("File:     {}", state.file_path.display());
    println!("Recorded: {}", state.file_type);
    println!("Detected: {}", report.kind);
    println!("Size:     {:.1} KiB", report.size as f64 / 1024.0);
    for w in &report.warnings {
        println!("WARNING:  {}", w);
    }
    Ok(())
}
