//! Google Drive sharing-link rewriting.

use once_cell::sync::Lazy;
use regex::Regex;

const DIRECT_DOWNLOAD_PREFIX: &str = "https://drive.usercontent.google.com/download?id=";
const DIRECT_DOWNLOAD_SUFFIX: &str = "&export=download&confirm=t";

/// Minimum length of a bare file id accepted by [`extract_gdrive_file_id`].
const MIN_BARE_ID_LEN: usize = 11;

// Tried in order; first match wins.
static ID_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"/file/d/([a-zA-Z0-9_-]+)").expect("static regex"),
        Regex::new(r"/open\?id=([a-zA-Z0-9_-]+)").expect("static regex"),
        Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("static regex"),
    ]
});

static BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static regex"));

/// Extracts a file id from a Drive URL (`/file/d/{id}`, `open?id={id}`, `id={id}`).
pub fn gdrive_id_from_url(url: &str) -> Option<String> {
    ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Rewrites a Drive sharing URL into the direct-download form.
///
/// Returns the input unchanged with `false` when the URL is not a Drive URL,
/// is already a `drive.usercontent.google.com` link with `confirm=t`, or has
/// no recognizable file id.
pub fn rewrite_google_drive_url(url: &str) -> (String, bool) {
    let lower = url.to_ascii_lowercase();
    if !lower.contains("drive.google.com") && !lower.contains("drive.usercontent.google.com") {
        return (url.to_string(), false);
    }
    if lower.contains("drive.usercontent.google.com") && lower.contains("confirm=t") {
        return (url.to_string(), false);
    }

    match gdrive_id_from_url(url) {
        Some(id) => (direct_download_url(&id), true),
        None => (url.to_string(), false),
    }
}

/// Accepts either a Drive URL or a bare file id (token-access input).
pub fn extract_gdrive_file_id(input: &str) -> Option<String> {
    let input = input.trim();
    let lower = input.to_ascii_lowercase();
    if lower.contains("http") || lower.contains("drive.google.com") {
        return gdrive_id_from_url(input);
    }
    if input.len() >= MIN_BARE_ID_LEN && BARE_ID.is_match(input) {
        return Some(input.to_string());
    }
    None
}

fn direct_download_url(id: &str) -> String {
    format!("{DIRECT_DOWNLOAD_PREFIX}{id}{DIRECT_DOWNLOAD_SUFFIX}")
}
