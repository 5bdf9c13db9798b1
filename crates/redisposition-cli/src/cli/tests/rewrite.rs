//! Tests for rewrite, filter and the global --prefs flag.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use redisposition_core::Mode;
use std::path::PathBuf;

#[test]
fn cli_parse_rewrite_with_saved_mode() {
    match parse(&["redisposition", "rewrite", "attachment; filename=a.txt"]) {
        CliCommand::Rewrite { header, mode } => {
            assert_eq!(header, "attachment; filename=a.txt");
            assert!(mode.is_none());
        }
        _ => panic!("expected Rewrite"),
    }
}

#[test]
fn cli_parse_rewrite_modes() {
    match parse(&["redisposition", "rewrite", "x", "--mode", "inline"]) {
        CliCommand::Rewrite { mode, .. } => assert_eq!(mode, Some(Mode::Inline)),
        _ => panic!("expected Rewrite"),
    }
    match parse(&["redisposition", "rewrite", "x", "--mode", "disabled"]) {
        CliCommand::Rewrite { mode, .. } => assert_eq!(mode, Some(Mode::Disabled)),
        _ => panic!("expected Rewrite"),
    }
    match parse(&["redisposition", "rewrite", "x", "--mode", "BIG5"]) {
        CliCommand::Rewrite { mode, .. } => {
            assert_eq!(mode, Some(Mode::Encode("BIG5".to_string())))
        }
        _ => panic!("expected Rewrite"),
    }
}

#[test]
fn cli_parse_rewrite_requires_header() {
    assert!(Cli::try_parse_from(["redisposition", "rewrite"]).is_err());
}

#[test]
fn cli_parse_filter() {
    match parse(&["redisposition", "filter", "--mode", "GB18030"]) {
        CliCommand::Filter { mode } => {
            assert_eq!(mode, Some(Mode::Encode("GB18030".to_string())))
        }
        _ => panic!("expected Filter"),
    }
}

#[test]
fn cli_parse_global_prefs_after_subcommand() {
    let cli = Cli::try_parse_from(["redisposition", "status", "--prefs", "/tmp/p.toml"]).unwrap();
    assert_eq!(cli.prefs, Some(PathBuf::from("/tmp/p.toml")));
    match cli.command {
        CliCommand::Status { json } => assert!(!json),
        _ => panic!("expected Status"),
    }
}
