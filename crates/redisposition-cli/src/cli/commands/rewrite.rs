//! `redisposition rewrite` – run the header codec on one value.

use std::path::Path;

use anyhow::Result;
use redisposition_core::config::RedispositionConfig;
use redisposition_core::{decide, Mode, RewriteOutcome};

use crate::cli::session::{load_settings, validate_mode};

pub fn run_rewrite(
    cfg: &RedispositionConfig,
    prefs_path: &Path,
    header: &str,
    mode: Option<Mode>,
) -> Result<()> {
    let settings = load_settings(cfg, prefs_path)?;
    let mode = match mode {
        Some(m) => validate_mode(&settings, m)?,
        None => settings.mode().clone(),
    };
    println!("{}", describe(&decide(header, &mode)));
    Ok(())
}

pub(super) fn describe(outcome: &RewriteOutcome) -> String {
    match outcome {
        RewriteOutcome::NoChange => "unchanged".to_string(),
        RewriteOutcome::Replaced(value) => format!("replaced: {value}"),
        RewriteOutcome::ParseFailed(reason) => format!("unchanged ({reason})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redisposition_core::disposition::ParseFailure;

    #[test]
    fn describe_outcomes() {
        assert_eq!(describe(&RewriteOutcome::NoChange), "unchanged");
        assert_eq!(
            describe(&RewriteOutcome::Replaced("inline".to_string())),
            "replaced: inline"
        );
        assert_eq!(
            describe(&RewriteOutcome::ParseFailed(ParseFailure::MissingFilename)),
            "unchanged (no filename parameter)"
        );
    }
}
