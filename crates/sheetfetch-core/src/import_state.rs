//! Record of the last completed import, shared by `inspect` and `stats`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportState {
    /// Input mode that produced the file (`share_link`, `token:Dropbox`, `raw`, ...).
    pub source_label: String,
    pub source_url: String,
    /// Classified type for processed imports, lowercased extension for raw ones.
    pub file_type: String,
    pub file_path: PathBuf,
    pub sha256: String,
    /// Unix seconds.
    pub imported_at: u64,
}

impl ImportState {
    pub fn new(
        source_label: impl Into<String>,
        source_url: impl Into<String>,
        file_type: impl Into<String>,
        file_path: impl Into<PathBuf>,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            source_label: source_label.into(),
            source_url: source_url.into(),
            file_type: file_type.into(),
            file_path: file_path.into(),
            sha256: sha256.into(),
            imported_at: now_secs(),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Writes `state` as JSON, replacing any previous record.
pub fn save(path: &Path, state: &ImportState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}

/// Last import, or `None` when the file is missing or unreadable.
pub fn load(path: &Path) -> Option<ImportState> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("ignoring corrupt import state {}: {}", path.display(), e);
            None
        }
    }
}
