//! CLI for the ReDisposition headless host.

mod commands;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use redisposition_core::config;
use redisposition_core::prefs::FilePrefs;
use redisposition_core::ui::UserAction;
use redisposition_core::Mode;

use commands::{
    run_completions, run_encodings, run_filter, run_rewrite, run_status, run_user_action,
};

/// Top-level CLI for the ReDisposition header rewriter.
#[derive(Debug, Parser)]
#[command(name = "redisposition")]
#[command(
    about = "ReDisposition: re-tag Content-Disposition filenames with a charset or force inline display",
    long_about = None
)]
pub struct Cli {
    /// Preference file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Rewrite a single Content-Disposition value and print the outcome.
    Rewrite {
        /// Raw header value, e.g. 'attachment; filename="report.pdf"'.
        header: String,
        /// disabled, inline or an encoding from the catalog (default: saved mode).
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Rewrite header values read from stdin, one per line (empty line = no header).
    Filter {
        /// disabled, inline or an encoding from the catalog (default: saved mode).
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Show saved settings, the encoding catalog and the derived mode.
    Status {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Toggle activation, as clicking the toolbar button does.
    Toggle,

    /// Activate with the saved encoding, as clicking the menu arrow does.
    Arrow,

    /// Select an encoding (or "inline") and activate.
    Select {
        /// Encoding name from the catalog, or "inline".
        encoding: String,
    },

    /// Replace the custom encoding list (comma separated).
    Encodings {
        /// e.g. "GB18030, BIG5, Shift_JIS".
        list: String,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = &cli.command {
            run_completions(*shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let prefs_path = match cli.prefs.or_else(|| cfg.prefs_file.clone()) {
            Some(path) => path,
            None => FilePrefs::default_path()?,
        };

        match cli.command {
            CliCommand::Rewrite { header, mode } => run_rewrite(&cfg, &prefs_path, &header, mode)?,
            CliCommand::Filter { mode } => run_filter(&cfg, &prefs_path, mode)?,
            CliCommand::Status { json } => run_status(&cfg, &prefs_path, json)?,
            CliCommand::Toggle => run_user_action(&cfg, &prefs_path, UserAction::ToggleButton)?,
            CliCommand::Arrow => run_user_action(&cfg, &prefs_path, UserAction::OpenMenu)?,
            CliCommand::Select { encoding } => {
                run_user_action(&cfg, &prefs_path, UserAction::SelectEncoding(encoding))?
            }
            CliCommand::Encodings { list } => run_encodings(&cfg, &prefs_path, &list)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
