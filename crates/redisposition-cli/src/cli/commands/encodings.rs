//! `redisposition encodings` – replace the custom encoding list.

use std::path::Path;

use anyhow::{Context, Result};
use redisposition_core::config::RedispositionConfig;
use redisposition_core::prefs::PreferenceStore;
use redisposition_core::settings::ENCODINGS;

use crate::cli::session::Session;

pub fn run_encodings(cfg: &RedispositionConfig, prefs_path: &Path, list: &str) -> Result<()> {
    let mut session = Session::start(cfg, prefs_path)?;
    let key = session.ext.prefs().full_key(ENCODINGS);
    session
        .prefs
        .borrow_mut()
        .set_string(&key, list)
        .with_context(|| format!("write {key}"))?;
    // Delivered the way the host reports an outside edit.
    session.ext.on_preference_changed(&key);

    let settings = session.ext.settings();
    println!("encodings: {}", settings.catalog().entries().join(", "));
    println!("mode: {}", session.ext.mode());
    session.ext.shutdown();
    Ok(())
}
