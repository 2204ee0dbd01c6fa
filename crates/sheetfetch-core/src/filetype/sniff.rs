//! Byte-content sniffing: magic markers first, then text heuristics.

use super::FileType;

/// Buffers shorter than this carry no reliable signature.
pub const MIN_SNIFF_LEN: usize = 20;
/// A first line needs at least this many separators to count as delimited.
pub const MIN_DELIMITER_COUNT: usize = 2;

const HTML_PROBE_LEN: usize = 500;
const HTML_SCAN_CHARS: usize = 200;
const TEXT_SAMPLE_LEN: usize = 2048;

const PARQUET_MAGIC: &[u8] = b"PAR1";
const DUCKDB_MARKER: &[u8] = b"DUCK";
const DUCKDB_SCAN_LEN: usize = 20;
const SQLITE_MAGIC: &[u8] = b"SQLite format 3";
const SQLITE_SCAN_LEN: usize = 16;

/// Classifies a downloaded buffer by its content alone.
///
/// HTML detection runs before every binary signature so that login and
/// redirect pages are never mistaken for data.
pub fn sniff_bytes(bytes: &[u8]) -> FileType {
    if bytes.len() < MIN_SNIFF_LEN {
        return FileType::Unknown;
    }
    if looks_like_html(bytes) {
        return FileType::HtmlError;
    }
    if bytes.starts_with(PARQUET_MAGIC) || bytes.ends_with(PARQUET_MAGIC) {
        return FileType::Parquet;
    }
    if contains(&bytes[..DUCKDB_SCAN_LEN], DUCKDB_MARKER) {
        return FileType::Duckdb;
    }
    // SQLite shares the embedded-database import path; see `database_flavor`.
    if contains(&bytes[..SQLITE_SCAN_LEN], SQLITE_MAGIC) {
        return FileType::Duckdb;
    }

    let sample = match text_sample(bytes) {
        Some(s) => s,
        None => return FileType::Unknown,
    };

    if matches!(sample.trim_start().chars().next(), Some('{' | '[')) {
        return FileType::Json;
    }
    if !sample.contains(|c| c == '\n' || c == '\r') {
        return FileType::Txt;
    }

    let first_line = sample.split(|c| c == '\n' || c == '\r').next().unwrap_or("");
    let pipes = first_line.matches('|').count();
    let tabs = first_line.matches('\t').count();
    let commas = first_line.matches(',').count();

    if pipes >= MIN_DELIMITER_COUNT {
        FileType::Pipe
    } else if tabs >= MIN_DELIMITER_COUNT {
        FileType::Tsv
    } else if commas >= MIN_DELIMITER_COUNT {
        FileType::Csv
    } else {
        FileType::Txt
    }
}

fn looks_like_html(bytes: &[u8]) -> bool {
    let probe = &bytes[..bytes.len().min(HTML_PROBE_LEN)];
    let text = String::from_utf8_lossy(probe).to_lowercase();
    let text = text.trim();
    if text.starts_with("<!doctype") || text.starts_with("<html") {
        return true;
    }
    let head: String = text.chars().take(HTML_SCAN_CHARS).collect();
    head.contains("<html")
}

/// Strict UTF-8 view of the leading sample. A multi-byte character cut by the
/// sample boundary is dropped rather than treated as binary.
fn text_sample(bytes: &[u8]) -> Option<&str> {
    let truncated = bytes.len() > TEXT_SAMPLE_LEN;
    let sample = &bytes[..bytes.len().min(TEXT_SAMPLE_LEN)];
    match std::str::from_utf8(sample) {
        Ok(s) => Some(s),
        Err(e) if truncated && e.error_len().is_none() => {
            std::str::from_utf8(&sample[..e.valid_up_to()]).ok()
        }
        Err(_) => None,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_is_unknown() {
        assert_eq!(sniff_bytes(b"a,b,c\n1,2"), FileType::Unknown);
        assert_eq!(sniff_bytes(&[0u8; 10]), FileType::Unknown);
        assert_eq!(sniff_bytes(b"PAR1"), FileType::Unknown);
        assert_eq!(sniff_bytes(b""), FileType::Unknown);
    }

    #[test]
    fn short_csv_needs_minimum_length() {
        let tiny = b"a,b,c\n1,2,3\n";
        assert!(tiny.len() < MIN_SNIFF_LEN);
        assert_eq!(sniff_bytes(tiny), FileType::Unknown);

        let padded = b"a,b,c\n1,2,3\n4,5,6\n7,8,9\n";
        assert_eq!(sniff_bytes(padded), FileType::Csv);
    }

    #[test]
    fn html_page_is_error() {
        let page = b"<!DOCTYPE html>\n<html><head><title>Sign in</title></head></html>";
        assert_eq!(sniff_bytes(page), FileType::HtmlError);
        let page = b"   \n<HTML lang=\"en\"><body>Not found</body></HTML>";
        assert_eq!(sniff_bytes(page), FileType::HtmlError);
        let page = b"<?xml version=\"1.0\"?>\n<html xmlns=\"x\"><body/></html>";
        assert_eq!(sniff_bytes(page), FileType::HtmlError);
    }

    #[test]
    fn html_beats_delimiter_counting() {
        let page = b"<!DOCTYPE html>,a,b,c,d,e\n1,2,3,4,5\n";
        assert_eq!(sniff_bytes(page), FileType::HtmlError);
    }

    #[test]
    fn parquet_magic_both_ends() {
        let mut buf = vec![0u8; 100];
        buf[..4].copy_from_slice(b"PAR1");
        buf[96..].copy_from_slice(b"PAR1");
        assert_eq!(sniff_bytes(&buf), FileType::Parquet);
    }

    #[test]
    fn parquet_magic_tail_only() {
        let mut buf = vec![0xffu8; 64];
        buf[60..].copy_from_slice(b"PAR1");
        assert_eq!(sniff_bytes(&buf), FileType::Parquet);
    }

    #[test]
    fn duckdb_and_sqlite_headers() {
        let mut duck = vec![0u8; 64];
        duck[8..12].copy_from_slice(b"DUCK");
        assert_eq!(sniff_bytes(&duck), FileType::Duckdb);

        let mut sqlite = b"SQLite format 3\0".to_vec();
        sqlite.extend_from_slice(&[0u8; 48]);
        assert_eq!(sniff_bytes(&sqlite), FileType::Duckdb);
    }

    #[test]
    fn invalid_utf8_is_unknown() {
        let buf = vec![0xc3u8, 0x28, 0xa0, 0xa1, 0xff, 0xfe, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05,
            0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e];
        assert_eq!(sniff_bytes(&buf), FileType::Unknown);
    }

    #[test]
    fn json_object_and_array() {
        assert_eq!(sniff_bytes(b"  \n{\"name\": \"alpha\", \"n\": 1}"), FileType::Json);
        assert_eq!(sniff_bytes(b"[{\"a\": 1}, {\"a\": 2}, {\"a\": 3}]"), FileType::Json);
    }

    #[test]
    fn single_line_is_txt() {
        assert_eq!(sniff_bytes(b"a,b,c,d,e,f,g,h,i,j,k,l"), FileType::Txt);
    }

    #[test]
    fn delimiter_priority_and_threshold() {
        assert_eq!(sniff_bytes(b"a|b|c\n1|2|3\n4|5|6\n7|8|9\n"), FileType::Pipe);
        assert_eq!(sniff_bytes(b"a\tb\tc\n1\t2\t3\n4\t5\t6\n7\t8\t9\n"), FileType::Tsv);
        assert_eq!(sniff_bytes(b"a,b,c\n1,2,3\n4,5,6\n7,8,9\n"), FileType::Csv);
        // pipes win even when commas outnumber them
        assert_eq!(sniff_bytes(b"a,b|c,d|e,f\n1,2|3,4|5,6\n"), FileType::Pipe);
    }

    #[test]
    fn single_comma_is_txt() {
        assert_eq!(
            sniff_bytes(b"Hello, this is a note\nsecond line here\n"),
            FileType::Txt
        );
    }

    #[test]
    fn carriage_return_line_endings() {
        assert_eq!(sniff_bytes(b"x,y,z\r1,2,3\r4,5,6\r7,8,9\r"), FileType::Csv);
    }

    #[test]
    fn multibyte_char_cut_by_sample_boundary() {
        let mut buf = b"a,b,c\n".to_vec();
        while buf.len() < TEXT_SAMPLE_LEN - 1 {
            buf.push(b'x');
        }
        buf.extend_from_slice("é".as_bytes());
        buf.extend_from_slice(b"\nmore");
        assert_eq!(sniff_bytes(&buf), FileType::Csv);
    }
}
