//! Parse HTTP response header lines.

/// Headers of the final response that the import pipeline uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedHeaders {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

/// Parse collected header lines. With redirects, curl reports one block per
/// hop; only the block after the last status line counts.
pub(crate) fn parse_headers(lines: &[String]) -> ParsedHeaders {
    let mut out = ParsedHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ParsedHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-disposition") {
                out.content_disposition = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.to_string());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_headers_content_disposition() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Disposition: attachment; filename=\"report.parquet\"",
            "content-type: application/octet-stream",
        ]));
        assert_eq!(
            r.content_disposition.as_deref(),
            Some("attachment; filename=\"report.parquet\"")
        );
        assert_eq!(r.content_type.as_deref(), Some("application/octet-stream"));
    }

    #[test]
    fn parse_headers_keeps_last_redirect_hop() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://cdn.example.com/x",
            "Content-Type: text/html",
            "",
            "HTTP/2 200",
            "Content-Type: text/csv",
        ]));
        assert_eq!(r.content_type.as_deref(), Some("text/csv"));
        assert!(r.content_disposition.is_none());
    }

    #[test]
    fn parse_headers_empty() {
        assert_eq!(parse_headers(&[]), ParsedHeaders::default());
    }
}
