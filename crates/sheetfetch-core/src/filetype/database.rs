//! Second-stage disambiguation of the embedded-database family.
//!
//! Classification maps both SQLite and native DuckDB files to
//! [`FileType::Duckdb`](super::FileType::Duckdb); the import step tells them
//! apart from the staged file header before opening it.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SQLITE_MAGIC: &[u8] = b"SQLite format 3";
const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseFlavor {
    DuckDb,
    /// Needs conversion before it can be queried as DuckDB.
    Sqlite,
}

/// Flavor of a database header (first 16 bytes are enough).
pub fn database_flavor(header: &[u8]) -> DatabaseFlavor {
    let header = &header[..header.len().min(HEADER_LEN)];
    if header
        .windows(SQLITE_MAGIC.len())
        .any(|w| w == SQLITE_MAGIC)
    {
        DatabaseFlavor::Sqlite
    } else {
        DatabaseFlavor::DuckDb
    }
}

/// Reads the header of a staged database file and returns its flavor.
pub fn database_flavor_of_path(path: &Path) -> Result<DatabaseFlavor> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    f.by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(database_flavor(&header))
}
