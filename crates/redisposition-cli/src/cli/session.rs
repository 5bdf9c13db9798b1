//! Headless host wiring for commands that need a running extension.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use redisposition_core::config::RedispositionConfig;
use redisposition_core::disposition::INLINE;
use redisposition_core::host::headless::{
    HeadlessChannel, HeadlessRegistry, HeadlessStyleSheets, HeadlessWindow,
};
use redisposition_core::host::{Window, WindowId};
use redisposition_core::prefs::{FilePrefs, PrefBranch};
use redisposition_core::settings::Settings;
use redisposition_core::{Extension, HostServices, Mode};

/// An extension started against the preference file, with one browser window.
pub(crate) struct Session {
    pub ext: Extension,
    pub prefs: Rc<RefCell<FilePrefs>>,
    pub channel: HeadlessChannel,
    window: Rc<RefCell<HeadlessWindow>>,
}

impl Session {
    pub fn start(cfg: &RedispositionConfig, prefs_path: &Path) -> Result<Self> {
        let prefs = Rc::new(RefCell::new(open_prefs(prefs_path)?));
        let registry = HeadlessRegistry::new();
        let window = registry.open_browser_window();
        let channel = HeadlessChannel::new();
        let ext = Extension::startup(
            cfg.clone(),
            HostServices {
                responses: Box::new(channel.clone()),
                windows: Box::new(registry),
                stylesheets: Box::new(HeadlessStyleSheets::new()),
                prefs: Box::new(Rc::clone(&prefs)),
            },
        );
        Ok(Self {
            ext,
            prefs,
            channel,
            window,
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window.borrow().id()
    }
}

fn open_prefs(path: &Path) -> Result<FilePrefs> {
    FilePrefs::open(path).with_context(|| format!("open preferences: {}", path.display()))
}

/// Loads settings without starting the extension.
pub(crate) fn load_settings(cfg: &RedispositionConfig, prefs_path: &Path) -> Result<Settings> {
    let store = open_prefs(prefs_path)?;
    let mut branch = PrefBranch::new(cfg.preference_branch.clone(), Box::new(store));
    Ok(Settings::load(&mut branch, &cfg.default_encodings))
}

/// Rejects an encoding that is not in the catalog, and normalises its spelling.
pub(crate) fn validate_mode(settings: &Settings, mode: Mode) -> Result<Mode> {
    match mode {
        Mode::Encode(name) => match settings.catalog().canonical(&name) {
            Some(canonical) if canonical != INLINE => Ok(Mode::Encode(canonical.to_string())),
            _ => bail!(
                "unknown encoding {:?}; known: {}",
                name,
                settings.catalog().entries().join(", ")
            ),
        },
        other => Ok(other),
    }
}
