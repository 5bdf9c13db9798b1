//! `redisposition toggle|arrow|select` – toolbar actions against saved settings.

use std::path::Path;

use anyhow::{bail, Result};
use redisposition_core::config::RedispositionConfig;
use redisposition_core::ui::UserAction;

use crate::cli::session::Session;

pub fn run_user_action(
    cfg: &RedispositionConfig,
    prefs_path: &Path,
    action: UserAction,
) -> Result<()> {
    let mut session = Session::start(cfg, prefs_path)?;
    if let UserAction::SelectEncoding(name) = &action {
        let catalog = session.ext.settings().catalog();
        if !catalog.accepts(name) {
            bail!(
                "unknown encoding {:?}; known: {}, inline",
                name,
                catalog.entries().join(", ")
            );
        }
    }
    let id = session.window_id();
    session.ext.on_user_action(id, action);
    println!("mode: {}", session.ext.mode());
    session.ext.shutdown();
    Ok(())
}
