//! Staging directory layout.
//!
//! Processed imports land at fixed paths keyed by file type, so downstream
//! tools always know where the last dataset is. Raw downloads keep the name
//! the user chose.

mod sanitize;

pub use sanitize::{raw_extension, raw_output_name};

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filetype::FileType;

pub const PARQUET_FILE: &str = "imported_data.parquet";
pub const DUCKDB_FILE: &str = "imported_database.duckdb";
pub const DELIMITED_FILE: &str = "imported_data.csv";
pub const JSON_FILE: &str = "imported_data.json";
pub const STATE_FILE: &str = "last_import_state.json";

/// Names raw downloads may not take: processed imports and state writes own them.
const RESERVED_NAMES: [&str; 6] = [
    PARQUET_FILE,
    DUCKDB_FILE,
    DELIMITED_FILE,
    JSON_FILE,
    STATE_FILE,
    "last_import_state.json.tmp",
];

#[derive(Debug, Clone)]
pub struct StagingDir {
    root: PathBuf,
}

impl StagingDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create staging dir {}", self.root.display()))
    }

    /// Staging path for a processed import; `None` for non-data types.
    pub fn path_for(&self, file_type: FileType) -> Option<PathBuf> {
        let name = match file_type {
            FileType::Parquet => PARQUET_FILE,
            FileType::Duckdb => DUCKDB_FILE,
            FileType::Json => JSON_FILE,
            t if t.is_delimited() => DELIMITED_FILE,
            _ => return None,
        };
        Some(self.root.join(name))
    }

    pub fn staged_files(&self) -> [PathBuf; 4] {
        [PARQUET_FILE, DUCKDB_FILE, DELIMITED_FILE, JSON_FILE].map(|n| self.root.join(n))
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    /// Path for a raw download saved as `output_name` (normalized first).
    ///
    /// Fails for the staged and state filenames, which later imports overwrite.
    pub fn raw_path(&self, output_name: &str) -> Result<PathBuf> {
        let name = raw_output_name(output_name)
            .with_context(|| format!("unusable output filename '{output_name}'"))?;
        if RESERVED_NAMES.contains(&name.as_str()) {
            bail!("output filename '{name}' is reserved for staged imports; choose another name");
        }
        Ok(self.root.join(name))
    }

    /// Removes previously staged processed files; returns how many were removed.
    ///
    /// A file that cannot be removed is logged and skipped.
    pub fn clear_previous(&self) -> usize {
        let mut removed = 0;
        for path in self.staged_files() {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "cleared previous staged files");
        }
        removed
    }
}
