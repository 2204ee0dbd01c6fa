//! `sheetfetch stats` – pick the stats module for a dataset.

use anyhow::{bail, Context, Result};
use sheetfetch_core::config::SheetfetchConfig;
use sheetfetch_core::filetype::{detect_delimiter_from_content, FileType};
use sheetfetch_core::import_state;
use sheetfetch_core::stats::{select_plugin, DataProfile, PLUGINS};
use std::fs::File;
use std::io::{BufRead, BufReader};

use super::staging;

pub fn run_stats(cfg: &SheetfetchConfig, tables: Vec<String>, columns: Vec<String>) -> Result<()> {
    let profile = if tables.is_empty() && columns.is_empty() {
        profile_from_last_import(cfg)?
    } else {
        DataProfile::new(tables, columns)
    };

    match select_plugin(&profile) {
        Some(plugin) => println!("Detected: {} ({})", plugin.name(), plugin.describe()),
        None => {
            println!("Could not auto-detect data type. Expected one of:");
            for p in PLUGINS {
                println!("  {:<8} {}", p.name(), p.describe());
            }
        }
    }
    Ok(())
}

/// Column names from the header of the last staged delimited file.
fn profile_from_last_import(cfg: &SheetfetchConfig) -> Result<DataProfile> {
    let state = import_state::load(&staging(cfg).state_path())
        .context("no previous import found; run `sheetfetch import` first")?;
    let file_type = FileType::from_extension(&state.file_type);
    if !file_type.map_or(false, FileType::is_delimited) {
        bail!(
            "cannot read table names from a staged {} file; pass --table/--column",
            state.file_type
        );
    }

    let file = File::open(&state.file_path)
        .with_context(|| format!("open {}", state.file_path.display()))?;
    let mut header = String::new();
    BufReader::new(file).read_line(&mut header)?;
    let delimiter = detect_delimiter_from_content(header.as_bytes());
    let columns: Vec<String> = header
        .trim_end()
        .split(delimiter)
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect();
    Ok(DataProfile::new(Vec::<String>::new(), columns))
}
