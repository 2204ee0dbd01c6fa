//! `sheetfetch classify <path>` – classify a local file.

use anyhow::{Context, Result};
use sheetfetch_core::filetype::{classify, database_flavor, delimiter_name, ClassifyInput, FileType};
use std::fs;
use std::path::Path;

pub fn run_classify(
    path: &Path,
    name: Option<&str>,
    url: Option<&str>,
    content_disposition: Option<&str>,
) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let c = classify(&ClassifyInput {
        explicit_name: name,
        url,
        content_disposition,
        bytes: Some(&bytes),
    });

    match c.source {
        Some(source) => println!("{} (from {:?})", c.file_type, source),
        None => println!("{}", c.file_type),
    }
    if let Some(d) = c.delimiter {
        print!("delimiter: {}", delimiter_name(d.delimiter));
        match d.declared {
            Some(declared) if d.conflicts() => {
                println!(" (type suggests {})", delimiter_name(declared))
            }
            _ => println!(),
        }
    }
    if c.file_type == FileType::Duckdb {
        println!("database: {:?}", database_flavor(&bytes));
    }
    Ok(())
}
