//! TOML-file preference store, used by the headless CLI host.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{PrefError, PrefValue, PreferenceStore};

/// Preferences persisted to a TOML file. Every mutation rewrites the file.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl FilePrefs {
    /// Default location: `~/.local/state/redisposition/prefs.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("redisposition")?;
        Ok(xdg_dirs
            .get_state_home()
            .join("redisposition")
            .join("prefs.toml"))
    }

    /// Opens the store at `path`. A missing file is an empty store; a file that
    /// does not parse is logged and treated as empty, so every setting falls
    /// back to its default.
    pub fn open(path: &Path) -> Result<Self, PrefError> {
        let mut prefs = Self {
            path: path.to_path_buf(),
            values: BTreeMap::new(),
        };
        prefs.reload()?;
        Ok(prefs)
    }

    /// Re-reads the file, picking up edits made by another process.
    pub fn reload(&mut self) -> Result<(), PrefError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.values.clear();
                return Ok(());
            }
            Err(source) => {
                return Err(PrefError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.values = match toml::from_str(&data) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("ignoring corrupt preference file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        };
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PrefError> {
        let io_err = |source| PrefError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = toml::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, data).map_err(io_err)
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PrefError> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn clear(&mut self, key: &str) -> Result<(), PrefError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
