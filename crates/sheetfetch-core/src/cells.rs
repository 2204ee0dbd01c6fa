//! Typed access to spreadsheet cells.
//!
//! Inputs for an import are read from a handful of cell addresses. Values
//! arrive loosely typed, so every getter checks the type and reports the
//! address on mismatch instead of guessing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A single cell value as the host spreadsheet reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cell {address}: expected {expected}, found {found}")]
pub struct CellTypeError {
    pub address: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl CellTypeError {
    fn new(address: &str, expected: &'static str, found: &CellValue) -> Self {
        Self {
            address: address.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// Read side of the spreadsheet boundary.
pub trait CellReader {
    /// Raw value at `address` (e.g. `"B5"`); unknown addresses are `Empty`.
    fn cell(&self, address: &str) -> CellValue;

    /// Required non-blank text, trimmed.
    fn text(&self, address: &str) -> Result<String, CellTypeError> {
        match self.optional_text(address)? {
            Some(s) => Ok(s),
            None => Err(CellTypeError::new(address, "text", &CellValue::Empty)),
        }
    }

    /// Text, trimmed; empty cells and blank strings are `None`.
    fn optional_text(&self, address: &str) -> Result<Option<String>, CellTypeError> {
        match self.cell(address) {
            CellValue::Empty => Ok(None),
            CellValue::Text(s) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            other => Err(CellTypeError::new(address, "text", &other)),
        }
    }

    /// A 0/1 flag. `1`, `1.0` and `"1"` are true; empty is false.
    fn flag(&self, address: &str) -> Result<bool, CellTypeError> {
        match self.cell(address) {
            CellValue::Empty => Ok(false),
            CellValue::Number(n) => Ok(n.trunc() == 1.0),
            CellValue::Text(s) => Ok(s.trim() == "1"),
            other => Err(CellTypeError::new(address, "flag", &other)),
        }
    }
}

/// Write side of the spreadsheet boundary (status and output cells).
pub trait CellWriter {
    fn write_cell(&mut self, address: &str, value: CellValue);
}

/// Cell addresses of the share-link inputs and the status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub url: String,
    pub private_flag: String,
    pub proxy_url: String,
    pub raw_flag: String,
    pub output_filename: String,
    pub status: String,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            url: "B5".into(),
            private_flag: "B12".into(),
            proxy_url: "B17".into(),
            raw_flag: "B7".into(),
            output_filename: "B8".into(),
            status: "D8".into(),
        }
    }
}

/// Typed share-link request read from a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinkInput {
    pub url: String,
    pub is_private: bool,
    pub proxy_url: Option<String>,
    pub raw: bool,
    pub output_filename: Option<String>,
}

impl ShareLinkInput {
    pub fn read<R: CellReader + ?Sized>(
        reader: &R,
        layout: &CellLayout,
    ) -> Result<Self, CellTypeError> {
        Ok(Self {
            url: reader.text(&layout.url)?,
            is_private: reader.flag(&layout.private_flag)?,
            proxy_url: reader.optional_text(&layout.proxy_url)?,
            raw: reader.flag(&layout.raw_flag)?,
            output_filename: reader.optional_text(&layout.output_filename)?,
        })
    }
}

/// In-memory sheet keyed by upper-cased cell address.
///
/// Snapshots are flat TOML tables: `B5 = "https://..."`, `B7 = 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    cells: BTreeMap<String, CellValue>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, value: CellValue) -> Self {
        self.write_cell(address, value);
        self
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(data).context("parse sheet snapshot")?;
        let mut sheet = Self::new();
        for (address, value) in table {
            let cell = match value {
                toml::Value::String(s) => CellValue::Text(s),
                toml::Value::Integer(i) => CellValue::Number(i as f64),
                toml::Value::Float(f) => CellValue::Number(f),
                toml::Value::Boolean(b) => CellValue::Bool(b),
                other => anyhow::bail!(
                    "cell {address}: unsupported value type {}",
                    other.type_str()
                ),
            };
            sheet.write_cell(&address, cell);
        }
        Ok(sheet)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&data)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let mut table = toml::Table::new();
        for (address, value) in &self.cells {
            let v = match value {
                CellValue::Empty => continue,
                CellValue::Text(s) => toml::Value::String(s.clone()),
                CellValue::Number(n) => toml::Value::Float(*n),
                CellValue::Bool(b) => toml::Value::Boolean(*b),
            };
            table.insert(address.clone(), v);
        }
        Ok(toml::to_string(&table)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("write {}", path.display()))
    }
}

impl CellReader for MemorySheet {
    fn cell(&self, address: &str) -> CellValue {
        self.cells
            .get(&address.trim().to_ascii_uppercase())
            .cloned()
            .unwrap_or(CellValue::Empty)
    }
}

impl CellWriter for MemorySheet {
    fn write_cell(&mut self, address: &str, value: CellValue) {
        self.cells.insert(address.trim().to_ascii_uppercase(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_one_in_any_form() {
        let sheet = MemorySheet::new()
            .with("A1", CellValue::Number(1.0))
            .with("A2", CellValue::Text(" 1 ".into()))
            .with("A3", CellValue::Number(0.0))
            .with("A4", CellValue::Text("yes".into()));
        assert!(sheet.flag("A1").unwrap());
        assert!(sheet.flag("A2").unwrap());
        assert!(!sheet.flag("A3").unwrap());
        assert!(!sheet.flag("A4").unwrap());
        assert!(!sheet.flag("Z9").unwrap());
    }

    #[test]
    fn flag_rejects_bool() {
        let sheet = MemorySheet::new().with("B12", CellValue::Bool(true));
        let err = sheet.flag("B12").unwrap_err();
        assert_eq!(err.address, "B12");
        assert_eq!(err.expected, "flag");
        assert_eq!(err.found, "bool");
    }

    #[test]
    fn text_requires_non_blank_string() {
        let sheet = MemorySheet::new()
            .with("B5", CellValue::Text("  https://example.com/a.csv ".into()))
            .with("B6", CellValue::Text("   ".into()))
            .with("B7", CellValue::Number(42.0));
        assert_eq!(sheet.text("B5").unwrap(), "https://example.com/a.csv");
        assert_eq!(sheet.text("B6").unwrap_err().found, "empty");
        let err = sheet.text("B7").unwrap_err();
        assert_eq!(err.to_string(), "cell B7: expected text, found number");
        assert_eq!(sheet.optional_text("B6").unwrap(), None);
    }

    #[test]
    fn addresses_are_case_insensitive() {
        let sheet = MemorySheet::new().with("b5", CellValue::Text("x".into()));
        assert_eq!(sheet.cell("B5"), CellValue::Text("x".into()));
    }

    #[test]
    fn share_link_input_from_snapshot() {
        let sheet = MemorySheet::from_toml_str(
            r#"
            B5 = "https://github.com/o/r/raw/main/x.csv"
            B12 = 1
            B17 = "https://auth.example.com"
            B7 = "0"
            "#,
        )
        .unwrap();
        let input = ShareLinkInput::read(&sheet, &CellLayout::default()).unwrap();
        assert_eq!(input.url, "https://github.com/o/r/raw/main/x.csv");
        assert!(input.is_private);
        assert_eq!(input.proxy_url.as_deref(), Some("https://auth.example.com"));
        assert!(!input.raw);
        assert_eq!(input.output_filename, None);
    }

    #[test]
    fn snapshot_rejects_nested_tables() {
        assert!(MemorySheet::from_toml_str("[B5]\nx = 1\n").is_err());
    }

    #[test]
    fn snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.toml");
        let mut sheet = MemorySheet::new().with("B5", CellValue::Text("u".into()));
        sheet.write_cell("D8", CellValue::Text("Saved: /tmp/x".into()));
        sheet.save(&path).unwrap();
        let loaded = MemorySheet::load(&path).unwrap();
        assert_eq!(loaded, sheet);
    }
}
