//! Processed and raw imports: classify a fetched body, stage it, record it.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::checksum::sha256_bytes;
use crate::fetch::FetchResponse;
use crate::filetype::{
    classify, database_flavor_of_path, ClassifyInput, DatabaseFlavor, DelimiterChoice,
    EvidenceSource, FileType,
};
use crate::import_state::{self, ImportState};
use crate::staging::{raw_extension, StagingDir};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("received an HTML page instead of data (private link? check credentials or use token access)")]
    HtmlInsteadOfData,
    #[error("could not determine file type")]
    UnrecognizedContent,
    #[error("download failed (HTTP {0})")]
    Http(u32),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What the caller knows about a download besides the response itself.
#[derive(Debug, Clone, Copy)]
pub struct ImportRequest<'a> {
    /// Input mode, recorded in the import state.
    pub source_label: &'a str,
    /// Direct (unproxied) URL or provider path; also the URL type hint.
    pub source_url: &'a str,
    /// Filename the user supplied, if any.
    pub explicit_name: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub file_type: FileType,
    pub evidence: Option<EvidenceSource>,
    pub delimiter: Option<DelimiterChoice>,
    /// Set for the database family only.
    pub flavor: Option<DatabaseFlavor>,
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
    /// Previously staged files removed before writing.
    pub cleared: usize,
}

/// Classifies `response` and writes it to the staging path for its type.
///
/// HTML error pages and unclassifiable bodies are rejected before anything
/// is written. Previously staged files are removed first.
pub fn stage_download(
    staging: &StagingDir,
    req: &ImportRequest<'_>,
    response: &FetchResponse,
) -> Result<ImportOutcome> {
    if !response.is_success() {
        return Err(ImportError::Http(response.status).into());
    }

    let classification = classify(&ClassifyInput {
        explicit_name: req.explicit_name,
        url: Some(req.source_url),
        content_disposition: response.content_disposition.as_deref(),
        bytes: Some(&response.body),
    });
    let file_type = classification.file_type;
    tracing::debug!(
        file_type = %file_type,
        evidence = ?classification.source,
        content_type = response.content_type.as_deref(),
        "classified download"
    );
    let path = match file_type {
        FileType::HtmlError => return Err(ImportError::HtmlInsteadOfData.into()),
        t => staging.path_for(t).ok_or(ImportError::UnrecognizedContent)?,
    };

    staging.ensure()?;
    let cleared = staging.clear_previous();
    fs::write(&path, &response.body)
        .map_err(ImportError::from)
        .with_context(|| format!("write {}", path.display()))?;

    let flavor = if file_type == FileType::Duckdb {
        Some(database_flavor_of_path(&path)?)
    } else {
        None
    };
    let sha256 = sha256_bytes(&response.body);

    record(
        staging,
        ImportState::new(
            req.source_label,
            req.source_url,
            file_type.as_str(),
            &path,
            sha256.as_str(),
        ),
    );
    tracing::info!(
        file_type = %file_type,
        bytes = response.body.len(),
        path = %path.display(),
        "staged import"
    );

    Ok(ImportOutcome {
        file_type,
        evidence: classification.source,
        delimiter: classification.delimiter,
        flavor,
        path,
        bytes: response.body.len(),
        sha256,
        cleared,
    })
}

#[derive(Debug, Clone)]
pub struct RawOutcome {
    pub path: PathBuf,
    /// Lowercased extension of the output name, or `unknown`.
    pub extension: String,
    pub bytes: usize,
    pub sha256: String,
}

/// Saves `response` unclassified under `output_name` in the staging dir.
pub fn save_raw(
    staging: &StagingDir,
    source_label: &str,
    source_url: &str,
    output_name: &str,
    response: &FetchResponse,
) -> Result<RawOutcome> {
    if !response.is_success() {
        return Err(ImportError::Http(response.status).into());
    }
    let path = staging.raw_path(output_name)?;
    staging.ensure()?;
    fs::write(&path, &response.body)
        .map_err(ImportError::from)
        .with_context(|| format!("write {}", path.display()))?;

    let extension = path
        .file_name()
        .map(|n| raw_extension(&n.to_string_lossy()))
        .unwrap_or_else(|| "unknown".to_string());
    let sha256 = sha256_bytes(&response.body);
    record(
        staging,
        ImportState::new(source_label, source_url, extension.as_str(), &path, sha256.as_str()),
    );
    tracing::info!(bytes = response.body.len(), path = %path.display(), "saved raw download");

    Ok(RawOutcome {
        path,
        extension,
        bytes: response.body.len(),
        sha256,
    })
}

/// The staged file is the result; a failed state write only loses `inspect`/`stats` context.
fn record(staging: &StagingDir, state: ImportState) {
    if let Err(e) = import_state::save(&staging.state_path(), &state) {
        tracing::warn!("could not save import state: {:#}", e);
    }
}
