//! CLI command handlers. Each command is in its own file.

mod checksum;
mod classify;
mod completions;
mod import;
mod import_sheet;
mod import_token;
mod inspect;
mod raw;
mod resolve;
mod stats;

pub use checksum::run_checksum;
pub use classify::run_classify;
pub use completions::{run_completions, run_man};
pub use import::run_import;
pub use import_sheet::run_import_sheet;
pub use import_token::run_import_token;
pub use inspect::run_inspect;
pub use raw::run_raw;
pub use resolve::run_resolve;
pub use stats::run_stats;

use anyhow::{Context, Result};
use sheetfetch_core::config::{HttpConfig, SheetfetchConfig};
use sheetfetch_core::fetch::{self, FetchResponse};
use sheetfetch_core::filetype::{delimiter_name, DatabaseFlavor};
use sheetfetch_core::import::{ImportOutcome, RawOutcome};
use sheetfetch_core::resolver::FetchPlan;
use sheetfetch_core::staging::StagingDir;

/// Runs the blocking curl transfer off the async runtime.
async fn fetch_plan(plan: FetchPlan, http: HttpConfig) -> Result<FetchResponse> {
    tokio::task::spawn_blocking(move || fetch::fetch(&plan, &http))
        .await
        .context("fetch task join")?
}

fn staging(cfg: &SheetfetchConfig) -> StagingDir {
    StagingDir::new(cfg.staging_dir())
}

fn mib(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn print_import(out: &ImportOutcome) {
    if out.cleared > 0 {
        println!("Removed {} previous staged file(s)", out.cleared);
    }
    let source = out
        .evidence
        .map(|e| format!("{e:?}").to_lowercase())
        .unwrap_or_else(|| "none".to_string());
    println!("Type:      {} (from {})", out.file_type, source);
    if let Some(d) = out.delimiter {
        println!("Delimiter: {}", delimiter_name(d.delimiter));
    }
    if let Some(flavor) = out.flavor {
        let label = match flavor {
            DatabaseFlavor::DuckDb => "DuckDB",
            DatabaseFlavor::Sqlite => "SQLite (convert before querying)",
        };
        println!("Database:  {}", label);
    }
    println!("Size:      {:.2} MiB", mib(out.bytes));
    println!("SHA-256:   {}", out.sha256);
    println!("Staged at: {}", out.path.display());
}

fn print_raw(out: &RawOutcome) {
    println!("Size:    {:.2} MiB", mib(out.bytes));
    println!("SHA-256: {}", out.sha256);
    println!("Saved:   {}", out.path.display());
}
