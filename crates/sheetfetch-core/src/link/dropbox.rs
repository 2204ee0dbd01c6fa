//! Dropbox sharing-link rewriting (`dl=1`).

use url::Url;

/// Forces `dl=1` on a Dropbox URL so it serves raw bytes.
///
/// Non-Dropbox URLs, URLs that already carry `dl=1` and URLs that do not
/// parse are returned unchanged with `false`. Every other query parameter and
/// the fragment are preserved.
pub fn rewrite_dropbox_url(url: &str) -> (String, bool) {
    if !url.to_ascii_lowercase().contains("dropbox.com") {
        return (url.to_string(), false);
    }
    let mut parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return (url.to_string(), false),
    };

    let already_direct = parsed
        .query_pairs()
        .find(|(k, _)| k == "dl")
        .map_or(false, |(_, v)| v == "1");
    if already_direct {
        return (url.to_string(), false);
    }

    // Work on the raw segments so untouched parameters keep their exact text.
    let mut segments: Vec<&str> = Vec::new();
    let mut replaced = false;
    for segment in parsed.query().unwrap_or("").split('&') {
        if segment.is_empty() {
            continue;
        }
        let key = segment.split_once('=').map_or(segment, |(k, _)| k);
        if key == "dl" {
            if !replaced {
                segments.push("dl=1");
                replaced = true;
            }
        } else {
            segments.push(segment);
        }
    }
    if !replaced {
        segments.push("dl=1");
    }

    let query = segments.join("&");
    parsed.set_query(Some(&query));
    (parsed.to_string(), true)
}
