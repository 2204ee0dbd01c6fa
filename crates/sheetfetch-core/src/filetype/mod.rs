//! File-type classification of downloaded resources.
//!
//! Signals are consulted cheapest first, in a fixed order:
//! 1. explicit filename supplied by the caller,
//! 2. the source URL (`filetype` query override, then path extension),
//! 3. the `Content-Disposition` filename,
//! 4. the downloaded bytes.
//!
//! Only step 4 can report [`FileType::HtmlError`]; when it cannot classify
//! either, the result is [`FileType::Unknown`].

mod content_disposition;
mod database;
mod delimiter;
mod sniff;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use content_disposition::filename_from_content_disposition;
pub use database::{database_flavor, database_flavor_of_path, DatabaseFlavor};
pub use delimiter::{choose_delimiter, delimiter_name, detect_delimiter_from_content, DelimiterChoice};
pub use sniff::{sniff_bytes, MIN_DELIMITER_COUNT, MIN_SNIFF_LEN};

/// Canonical format tag; exactly one per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Parquet,
    Duckdb,
    Csv,
    Tsv,
    Txt,
    Pipe,
    Json,
    /// Transport succeeded but the body is a web page (login, redirect, 404).
    HtmlError,
    Unknown,
}

impl FileType {
    /// Maps a bare extension (no dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<FileType> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "parquet" => Some(FileType::Parquet),
            "duckdb" => Some(FileType::Duckdb),
            "csv" => Some(FileType::Csv),
            "tsv" => Some(FileType::Tsv),
            "txt" => Some(FileType::Txt),
            "pipe" | "psv" => Some(FileType::Pipe),
            "json" => Some(FileType::Json),
            _ => None,
        }
    }

    /// Maps the extension of the final segment of a filename or path.
    pub fn from_path(path: &str) -> Option<FileType> {
        let name = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
        let (_, ext) = name.rsplit_once('.')?;
        FileType::from_extension(ext)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Parquet => "parquet",
            FileType::Duckdb => "duckdb",
            FileType::Csv => "csv",
            FileType::Tsv => "tsv",
            FileType::Txt => "txt",
            FileType::Pipe => "pipe",
            FileType::Json => "json",
            FileType::HtmlError => "html_error",
            FileType::Unknown => "unknown",
        }
    }

    /// `csv`, `tsv`, `txt` and `pipe` share the delimited-text import path.
    pub fn is_delimited(self) -> bool {
        matches!(
            self,
            FileType::Csv | FileType::Tsv | FileType::Txt | FileType::Pipe
        )
    }

    /// Separator implied by the tag alone.
    pub fn declared_delimiter(self) -> Option<char> {
        match self {
            FileType::Csv => Some(','),
            FileType::Tsv => Some('\t'),
            FileType::Pipe => Some('|'),
            _ => None,
        }
    }

    /// False for the two failure tags.
    pub fn is_data(self) -> bool {
        !matches!(self, FileType::HtmlError | FileType::Unknown)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type hint from a source URL: `filetype=` query override, then path extension.
pub fn hint_from_url(url: &str) -> Option<FileType> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let override_hint = parsed
                .query_pairs()
                .find(|(k, _)| k == "filetype")
                .and_then(|(_, v)| FileType::from_extension(&v));
            override_hint.or_else(|| {
                let last = parsed.path().rsplit('/').next().unwrap_or("");
                FileType::from_path(last)
            })
        }
        Err(_) => {
            let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
            FileType::from_path(path)
        }
    }
}

/// Type hint from a `Content-Disposition` header value.
pub fn hint_from_content_disposition(header_value: &str) -> Option<FileType> {
    filename_from_content_disposition(header_value).and_then(|name| FileType::from_path(&name))
}

/// Which signal produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    ExplicitName,
    Url,
    Header,
    Content,
}

/// Independently optional hints; resolution order is fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationEvidence {
    pub explicit_hint: Option<FileType>,
    pub url_hint: Option<FileType>,
    pub header_hint: Option<FileType>,
    pub byte_hint: Option<FileType>,
}

impl ClassificationEvidence {
    /// First present hint in priority order, or `Unknown`.
    pub fn resolve(&self) -> (FileType, Option<EvidenceSource>) {
        [
            (self.explicit_hint, EvidenceSource::ExplicitName),
            (self.url_hint, EvidenceSource::Url),
            (self.header_hint, EvidenceSource::Header),
            (self.byte_hint, EvidenceSource::Content),
        ]
        .into_iter()
        .find_map(|(hint, source)| hint.map(|t| (t, Some(source))))
        .unwrap_or((FileType::Unknown, None))
    }
}

/// Everything the caller knows about one download.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyInput<'a> {
    /// Destination filename the user chose (not derived from the response).
    pub explicit_name: Option<&'a str>,
    pub url: Option<&'a str>,
    pub content_disposition: Option<&'a str>,
    pub bytes: Option<&'a [u8]>,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub file_type: FileType,
    /// `None` when nothing matched and the type is `Unknown`.
    pub source: Option<EvidenceSource>,
    /// Set for delimited types when bytes were supplied.
    pub delimiter: Option<DelimiterChoice>,
}

/// Classifies a download, stopping at the first signal that matches.
pub fn classify(input: &ClassifyInput<'_>) -> Classification {
    let mut evidence = ClassificationEvidence {
        explicit_hint: input.explicit_name.and_then(FileType::from_path),
        ..Default::default()
    };
    if evidence.explicit_hint.is_none() {
        evidence.url_hint = input.url.and_then(hint_from_url);
    }
    if evidence.explicit_hint.is_none() && evidence.url_hint.is_none() {
        evidence.header_hint = input.content_disposition.and_then(hint_from_content_disposition);
    }
    if evidence == ClassificationEvidence::default() {
        evidence.byte_hint = input
            .bytes
            .map(sniff_bytes)
            .filter(|t| *t != FileType::Unknown);
    }

    let (file_type, source) = evidence.resolve();
    tracing::debug!(file_type = %file_type, source = ?source, "classified download");

    let delimiter = input.bytes.and_then(|b| choose_delimiter(file_type, b));
    Classification {
        file_type,
        source,
        delimiter,
    }
}
