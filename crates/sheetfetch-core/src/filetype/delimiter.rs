//! Field-separator detection for files already known to be delimited text.

use super::FileType;

/// Picks the separator from the first line: `|`, then tab, then `,`.
/// Comma is the default when none of the three appear.
pub fn detect_delimiter_from_content(bytes: &[u8]) -> char {
    let first = bytes.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let line = String::from_utf8_lossy(first);
    if line.contains('|') {
        '|'
    } else if line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Separator to parse with, plus what the type hint claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterChoice {
    pub delimiter: char,
    /// Separator implied by the declared type; `None` for `txt`.
    pub declared: Option<char>,
}

impl DelimiterChoice {
    /// True when the declared type disagrees with the content.
    pub fn conflicts(&self) -> bool {
        self.declared.map_or(false, |d| d != self.delimiter)
    }
}

/// Resolves the separator for a delimited `file_type`; the content always wins.
///
/// Returns `None` for non-delimited types.
pub fn choose_delimiter(file_type: FileType, bytes: &[u8]) -> Option<DelimiterChoice> {
    if !file_type.is_delimited() {
        return None;
    }
    let choice = DelimiterChoice {
        delimiter: detect_delimiter_from_content(bytes),
        declared: file_type.declared_delimiter(),
    };
    if choice.conflicts() {
        tracing::warn!(
            "{} hint suggests {} separator, but content uses {}",
            file_type,
            delimiter_name(choice.declared.unwrap_or(',')),
            delimiter_name(choice.delimiter)
        );
    }
    Some(choice)
}

/// Human-readable separator name for log lines and CLI output.
pub fn delimiter_name(c: char) -> &'static str {
    match c {
        ',' => "comma",
        '\t' => "tab",
        '|' => "pipe",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_priority() {
        assert_eq!(detect_delimiter_from_content(b"a|b,c\td\n"), '|');
        assert_eq!(detect_delimiter_from_content(b"a\tb,c\n"), '\t');
        assert_eq!(detect_delimiter_from_content(b"a,b\n"), ',');
    }

    #[test]
    fn detect_defaults_to_comma() {
        assert_eq!(detect_delimiter_from_content(b"single column\nvalue\n"), ',');
        assert_eq!(detect_delimiter_from_content(b""), ',');
    }

    #[test]
    fn only_first_line_counts() {
        assert_eq!(detect_delimiter_from_content(b"a,b,c\nx|y|z\n"), ',');
    }

    #[test]
    fn content_wins_over_extension() {
        let choice = choose_delimiter(FileType::Txt, b"id|name|score\n1|a|2\n").unwrap();
        assert_eq!(choice.delimiter, '|');
        assert_eq!(choice.declared, None);
        assert!(!choice.conflicts());

        let choice = choose_delimiter(FileType::Csv, b"id\tname\n1\ta\n").unwrap();
        assert_eq!(choice.delimiter, '\t');
        assert_eq!(choice.declared, Some(','));
        assert!(choice.conflicts());
    }

    #[test]
    fn matching_hint_is_not_a_conflict() {
        let choice = choose_delimiter(FileType::Tsv, b"a\tb\n").unwrap();
        assert!(!choice.conflicts());
    }

    #[test]
    fn non_delimited_types_have_no_delimiter() {
        assert_eq!(choose_delimiter(FileType::Parquet, b"a,b,c\n"), None);
        assert_eq!(choose_delimiter(FileType::Json, b"[1,2]"), None);
    }
}
