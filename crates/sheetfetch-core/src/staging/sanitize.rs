//! Output filenames for raw downloads.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Normalizes a user-supplied output filename.
///
/// - Lowercases the extension (`Report.PDF` -> `Report.pdf`)
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes
///
/// Returns `None` when nothing usable is left (e.g. `".."` or `"   "`).
pub fn raw_output_name(name: &str) -> Option<String> {
    let name = name.trim();
    let name = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}.{}", ext.to_lowercase()),
        _ => name.to_string(),
    };

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let unsafe_char = c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        if unsafe_char || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return None;
    }
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    Some(trimmed[..take].to_string())
}

/// Lowercased extension of a raw output name, or `"unknown"`.
pub fn raw_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => "unknown".to_string(),
    }
}
