//! `redisposition status` – show saved settings and the derived mode.

use std::path::Path;

use anyhow::Result;
use redisposition_core::config::RedispositionConfig;
use redisposition_core::logging;
use redisposition_core::settings::Settings;
use serde::Serialize;

use crate::cli::session::load_settings;

#[derive(Debug, Serialize)]
pub(super) struct StatusReport {
    prefs: String,
    log: Option<String>,
    first_run: bool,
    activated: bool,
    current_encoding: String,
    encodings: Vec<String>,
    mode: String,
}

impl StatusReport {
    pub(super) fn new(settings: &Settings, prefs_path: &Path) -> Self {
        Self {
            prefs: prefs_path.display().to_string(),
            log: logging::log_file_path()
                .ok()
                .map(|p| p.display().to_string()),
            first_run: settings.first_run(),
            activated: settings.activated(),
            current_encoding: settings.current_encoding().to_string(),
            encodings: settings.catalog().entries().to_vec(),
            mode: settings.mode().to_string(),
        }
    }
}

pub fn run_status(cfg: &RedispositionConfig, prefs_path: &Path, json: bool) -> Result<()> {
    let settings = load_settings(cfg, prefs_path)?;
    let report = StatusReport::new(&settings, prefs_path);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    let encoding = if report.current_encoding.is_empty() {
        "-"
    } else {
        report.current_encoding.as_str()
    };
    println!("{:<18} {}", "prefs", report.prefs);
    println!("{:<18} {}", "log", report.log.as_deref().unwrap_or("-"));
    println!("{:<18} {}", "first run", report.first_run);
    println!("{:<18} {}", "activated", report.activated);
    println!("{:<18} {}", "current encoding", encoding);
    println!("{:<18} {}", "encodings", report.encodings.join(", "));
    println!("{:<18} {}", "mode", report.mode);
    Ok(())
}
