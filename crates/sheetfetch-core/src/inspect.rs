//! Magic-byte inspection of raw downloads (PDF, ZIP, common images).

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// What a raw file's bytes say it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    Pdf {
        /// e.g. `"1.7"`; empty if the header is cut short.
        version: String,
        /// `/Type /Page` objects minus `/Type /Pages` trees; a rough estimate.
        estimated_pages: usize,
    },
    Zip {
        /// From the end-of-central-directory record, when one is found.
        entries: Option<u16>,
    },
    Png {
        dimensions: Option<(u32, u32)>,
    },
    Jpeg,
    Gif {
        dimensions: Option<(u32, u32)>,
    },
    Bmp {
        dimensions: Option<(u32, u32)>,
    },
    Webp,
    Unknown,
}

impl RawKind {
    pub fn name(&self) -> &'static str {
        match self {
            RawKind::Pdf { .. } => "pdf",
            RawKind::Zip { .. } => "zip",
            RawKind::Png { .. } => "png",
            RawKind::Jpeg => "jpeg",
            RawKind::Gif { .. } => "gif",
            RawKind::Bmp { .. } => "bmp",
            RawKind::Webp => "webp",
            RawKind::Unknown => "unknown",
        }
    }

    /// File extensions that agree with this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            RawKind::Pdf { .. } => &["pdf"],
            RawKind::Zip { .. } => &["zip"],
            RawKind::Png { .. } => &["png"],
            RawKind::Jpeg => &["jpg", "jpeg"],
            RawKind::Gif { .. } => &["gif"],
            RawKind::Bmp { .. } => &["bmp"],
            RawKind::Webp => &["webp"],
            RawKind::Unknown => &[],
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawKind::Pdf {
                version,
                estimated_pages,
            } => write!(f, "PDF {version}, ~{estimated_pages} page(s)"),
            RawKind::Zip { entries: Some(n) } => write!(f, "ZIP archive, {n} entries"),
            RawKind::Png {
                dimensions: Some((w, h)),
            }
            | RawKind::Gif {
                dimensions: Some((w, h)),
            }
            | RawKind::Bmp {
                dimensions: Some((w, h)),
            } => write!(f, "{} image, {w} x {h} pixels", self.name().to_uppercase()),
            other => f.write_str(&other.name().to_uppercase()),
        }
    }
}

const ZIP_MAGICS: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];
const EOCD: &[u8] = b"PK\x05\x06";

pub fn inspect_bytes(bytes: &[u8]) -> RawKind {
    if bytes.starts_with(b"%PDF") {
        let version = bytes
            .get(5..8)
            .map(|v| String::from_utf8_lossy(v).into_owned())
            .unwrap_or_default();
        let pages = count(bytes, b"/Type /Page");
        let trees = count(bytes, b"/Type /Pages");
        return RawKind::Pdf {
            version,
            estimated_pages: pages.saturating_sub(trees),
        };
    }
    if ZIP_MAGICS.iter().any(|m| bytes.starts_with(m)) {
        return RawKind::Zip {
            entries: zip_entry_count(bytes),
        };
    }
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        let dimensions = be_u32(bytes, 16).zip(be_u32(bytes, 20));
        return RawKind::Png { dimensions };
    }
    if bytes.starts_with(b"\xff\xd8\xff") {
        return RawKind::Jpeg;
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        let dimensions = le_u16(bytes, 6).zip(le_u16(bytes, 8));
        return RawKind::Gif {
            dimensions: dimensions.map(|(w, h)| (u32::from(w), u32::from(h))),
        };
    }
    if bytes.starts_with(b"BM") {
        let dimensions = le_u32(bytes, 18).zip(le_u32(bytes, 22).map(|h| (h as i32).unsigned_abs()));
        return RawKind::Bmp { dimensions };
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return RawKind::Webp;
    }
    RawKind::Unknown
}

/// Result of inspecting a file on disk.
#[derive(Debug, Clone)]
pub struct RawReport {
    pub kind: RawKind,
    pub size: u64,
    /// Mismatches between the recorded extension and the detected kind.
    pub warnings: Vec<String>,
}

/// Inspects `path`, comparing the detected kind to `recorded_ext`.
pub fn inspect_path(path: &Path, recorded_ext: &str) -> Result<RawReport> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let kind = inspect_bytes(&bytes);
    let ext = recorded_ext.trim().to_ascii_lowercase();
    let mut warnings = Vec::new();
    if kind == RawKind::Unknown {
        warnings.push(format!(
            "no known signature found; last import was recorded as '{ext}'"
        ));
    } else if !kind.extensions().contains(&ext.as_str()) {
        warnings.push(format!(
            "last import was recorded as '{ext}' but the content is {}",
            kind.name()
        ));
    }
    for w in &warnings {
        tracing::warn!("{}", w);
    }
    Ok(RawReport {
        kind,
        size: bytes.len() as u64,
        warnings,
    })
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn zip_entry_count(bytes: &[u8]) -> Option<u16> {
    let pos = bytes.windows(EOCD.len()).rposition(|w| w == EOCD)?;
    le_u16(bytes, pos + 10)
}

fn be_u32(b: &[u8], at: usize) -> Option<u32> {
    b.get(at..at + 4)
        .and_then(|s| s.try_into().ok())
        .map(u32::from_be_bytes)
}

fn le_u32(b: &[u8], at: usize) -> Option<u32> {
    b.get(at..at + 4)
        .and_then(|s| s.try_into().ok())
        .map(u32::from_le_bytes)
}

fn le_u16(b: &[u8], at: usize) -> Option<u16> {
    b.get(at..at + 2)
        .and_then(|s| s.try_into().ok())
        .map(u16::from_le_bytes)
}
