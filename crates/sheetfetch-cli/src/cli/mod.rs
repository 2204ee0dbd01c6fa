//! CLI for the sheetfetch importer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sheetfetch_core::config;
use std::path::PathBuf;

use commands::{
    run_checksum, run_classify, run_completions, run_import, run_import_sheet, run_import_token,
    run_inspect, run_man, run_raw, run_resolve, run_stats,
};

/// Top-level CLI for the sheetfetch importer.
#[derive(Debug, Parser)]
#[command(name = "sheetfetch")]
#[command(
    about = "sheetfetch: fetch tabular data from share links and cloud storage",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show how a share link would be rewritten and fetched (no network access).
    Resolve {
        url: String,
        /// Private GitHub resource (routes through the authenticated proxy).
        #[arg(long)]
        private: bool,
        /// Authenticated proxy base; overrides `private_proxy_url` from config.
        #[arg(long, value_name = "URL")]
        proxy_url: Option<String>,
    },

    /// Classify a local file and report its delimiter.
    Classify {
        path: PathBuf,
        /// Filename to treat as user-supplied.
        #[arg(long, value_name = "N")]
        name: Option<String>,
        /// URL the file was downloaded from.
        #[arg(long, value_name = "U")]
        url: Option<String>,
        /// `Content-Disposition` header value of the response.
        #[arg(long, value_name = "H")]
        content_disposition: Option<String>,
    },

    /// Download a share link, classify it and stage it for querying.
    Import {
        url: String,
        #[arg(long)]
        private: bool,
        #[arg(long, value_name = "URL")]
        proxy_url: Option<String>,
        /// Filename hint used before the URL and headers.
        #[arg(long, value_name = "N")]
        name: Option<String>,
    },

    /// Download through a provider API with an access token or PAT.
    ImportToken {
        /// Dropbox, "Google Drive" (or gdrive), GitHub.
        provider: String,
        /// Dropbox path, Drive file id or URL, or GitHub URL.
        input: String,
        /// Authenticated proxy base (GitHub only).
        #[arg(long, value_name = "URL")]
        proxy_url: Option<String>,
        /// Save unprocessed under this filename instead of staging.
        #[arg(long, value_name = "FILENAME")]
        raw: Option<String>,
    },

    /// Import a share link whose inputs come from a TOML sheet snapshot.
    ImportSheet {
        /// Flat TOML table of cell address to value; the status cell is written back.
        snapshot: PathBuf,
    },

    /// Download any file unprocessed and save it under OUTPUT.
    Raw {
        url: String,
        /// Output filename with extension (e.g. report.pdf).
        output: String,
    },

    /// Check the last raw download against its magic bytes.
    Inspect,

    /// Pick the stats module for a dataset.
    Stats {
        /// Table name in the dataset (repeatable).
        #[arg(long = "table", value_name = "T")]
        tables: Vec<String>,
        /// Column name in the dataset (repeatable).
        #[arg(long = "column", value_name = "C")]
        columns: Vec<String>,
    },

    /// Compute SHA-256 of a file.
    Checksum { path: PathBuf },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve {
                url,
                private,
                proxy_url,
            } => run_resolve(&load_config()?, &url, private, proxy_url)?,
            CliCommand::Classify {
                path,
                name,
                url,
                content_disposition,
            } => run_classify(
                &path,
                name.as_deref(),
                url.as_deref(),
                content_disposition.as_deref(),
            )?,
            CliCommand::Import {
                url,
                private,
                proxy_url,
                name,
            } => run_import(&load_config()?, &url, private, proxy_url, name.as_deref()).await?,
            CliCommand::ImportToken {
                provider,
                input,
                proxy_url,
                raw,
            } => {
                let cfg = load_config()?;
                run_import_token(&cfg, &provider, &input, proxy_url, raw.as_deref()).await?
            }
            CliCommand::ImportSheet { snapshot } => {
                run_import_sheet(&load_config()?, &snapshot).await?
            }
            CliCommand::Raw { url, output } => run_raw(&load_config()?, &url, &output).await?,
            CliCommand::Inspect => run_inspect(&load_config()?)?,
            CliCommand::Stats { tables, columns } => run_stats(&load_config()?, tables, columns)?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<config::SheetfetchConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
