//! Tests for the offline subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;

#[test]
fn cli_parse_classify() {
    match parse(&[
        "sheetfetch",
        "classify",
        "/tmp/download",
        "--url",
        "https://example.com/export?filetype=tsv",
        "--content-disposition",
        "attachment; filename=\"a.csv\"",
    ]) {
        CliCommand::Classify {
            path,
            name,
            url,
            content_disposition,
        } => {
            assert_eq!(path, std::path::PathBuf::from("/tmp/download"));
            assert!(name.is_none());
            assert_eq!(url.as_deref(), Some("https://example.com/export?filetype=tsv"));
            assert_eq!(
                content_disposition.as_deref(),
                Some("attachment; filename=\"a.csv\"")
            );
        }
        _ => panic!("expected Classify"),
    }
}

#[test]
fn cli_parse_inspect() {
    assert!(matches!(parse(&["sheetfetch", "inspect"]), CliCommand::Inspect));
}

#[test]
fn cli_parse_stats_repeatable() {
    match parse(&[
        "sheetfetch",
        "stats",
        "--table",
        "deliveries",
        "--column",
        "striker",
        "--column",
        "batting_team",
    ]) {
        CliCommand::Stats { tables, columns } => {
            assert_eq!(tables, vec!["deliveries"]);
            assert_eq!(columns, vec!["striker", "batting_team"]);
        }
        _ => panic!("expected Stats"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["sheetfetch", "checksum", "/tmp/x.csv"]) {
        CliCommand::Checksum { path } => {
            assert_eq!(path, std::path::PathBuf::from("/tmp/x.csv"));
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions_and_man() {
    match parse(&["sheetfetch", "completions", "zsh"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Zsh),
        _ => panic!("expected Completions"),
    }
    assert!(matches!(parse(&["sheetfetch", "man"]), CliCommand::Man));
    assert!(Cli::try_parse_from(["sheetfetch", "completions", "cmd.exe"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
