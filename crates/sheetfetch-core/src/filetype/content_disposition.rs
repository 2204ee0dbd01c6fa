//! Content-Disposition header parsing (filename, quoted filename, filename*).

use percent_encoding::percent_decode_str;

/// Extracts the server-suggested filename from a raw Content-Disposition value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987), used only when neither
///   plain form is present
///
/// The quoted form takes precedence over the token form wherever it appears.
pub fn filename_from_content_disposition(header_value: &str) -> Option<String> {
    let mut quoted: Option<String> = None;
    let mut token: Option<String> = None;
    let mut extended: Option<String> = None;

    for param in split_params(header_value.trim()) {
        let Some((name, v)) = param.trim().split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let v = v.trim();

        match name.as_str() {
            "filename" => {
                if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                    let unquoted = decode_quoted_filename(&v[1..v.len() - 1]);
                    if quoted.is_none() && !unquoted.is_empty() {
                        quoted = Some(unquoted);
                    }
                } else if token.is_none() && !v.is_empty() {
                    token = Some(v.trim_matches('"').to_string());
                }
            }
            "filename*" if extended.is_none() => {
                let lower = v.to_ascii_lowercase();
                if lower.starts_with("utf-8''") {
                    let decoded = percent_decode_str(&v["utf-8''".len()..])
                        .decode_utf8_lossy()
                        .into_owned();
                    if !decoded.is_empty() {
                        extended = Some(decoded);
                    }
                }
            }
            _ => {}
        }
    }

    quoted.or(token).or(extended).filter(|s| !s.is_empty())
}

/// Splits on `;` outside double quotes; `\"` inside quotes does not close them.
fn split_params(s: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&s[start..]);
    params
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted() {
        let r = filename_from_content_disposition("attachment; filename=\"report.csv\"");
        assert_eq!(r.as_deref(), Some("report.csv"));
    }

    #[test]
    fn parse_token() {
        let r = filename_from_content_disposition("attachment; filename=report.parquet");
        assert_eq!(r.as_deref(), Some("report.parquet"));
    }

    #[test]
    fn quoted_wins_over_token() {
        let r = filename_from_content_disposition(
            "attachment; filename=first.txt; filename=\"second.json\"",
        );
        assert_eq!(r.as_deref(), Some("second.json"));
    }

    #[test]
    fn escaped_quote_in_quoted_value() {
        let r = filename_from_content_disposition(r#"inline; filename="a \"b\".tsv""#);
        assert_eq!(r.as_deref(), Some("a \"b\".tsv"));
    }

    #[test]
    fn semicolon_inside_quoted_value() {
        let r = filename_from_content_disposition("attachment; filename=\"q3;final.csv\"");
        assert_eq!(r.as_deref(), Some("q3;final.csv"));

        let r = filename_from_content_disposition(
            r#"attachment; filename="a \";b.tsv"; size=10"#,
        );
        assert_eq!(r.as_deref(), Some("a \";b.tsv"));
    }

    #[test]
    fn filename_star_is_fallback() {
        let r = filename_from_content_disposition("attachment; filename*=UTF-8''caf%C3%A9.psv");
        assert_eq!(r.as_deref(), Some("café.psv"));

        let r = filename_from_content_disposition(
            "attachment; filename=\"plain.csv\"; filename*=UTF-8''other.json",
        );
        assert_eq!(r.as_deref(), Some("plain.csv"));
    }

    #[test]
    fn no_filename() {
        assert_eq!(filename_from_content_disposition("attachment"), None);
        assert_eq!(filename_from_content_disposition(""), None);
        assert_eq!(filename_from_content_disposition("attachment; filename=\"\""), None);
    }
}
