use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_CUSTOM_ENCODINGS;

/// Global configuration loaded from `~/.config/redisposition/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedispositionConfig {
    /// Prefix of every persisted preference key.
    pub preference_branch: String,
    /// Value written for the `encodings` preference when it is absent or corrupt.
    pub default_encodings: String,
    /// Stylesheet injected into browser windows while the extension runs.
    pub stylesheet_uri: String,
    /// Page opened by the "Preferences" menu entry.
    pub preferences_uri: String,
    /// Preference file for the headless host (None = XDG state dir default).
    #[serde(default)]
    pub prefs_file: Option<PathBuf>,
}

impl Default for RedispositionConfig {
    fn default() -> Self {
        Self {
            preference_branch: "extensions.redisposition.".to_string(),
            default_encodings: DEFAULT_CUSTOM_ENCODINGS.to_string(),
            stylesheet_uri: "chrome://redisposition/skin/browser.css".to_string(),
            preferences_uri: "about:addons".to_string(),
            prefs_file: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("redisposition")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RedispositionConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<RedispositionConfig> {
    if !path.exists() {
        let default_cfg = RedispositionConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RedispositionConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_values() {
        let cfg = RedispositionConfig::default();
        assert_eq!(cfg.preference_branch, "extensions.redisposition.");
        assert_eq!(cfg.default_encodings, "GB18030, BIG5");
        assert_eq!(cfg.preferences_uri, "about:addons");
        assert!(cfg.prefs_file.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RedispositionConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RedispositionConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.preference_branch, cfg.preference_branch);
        assert_eq!(parsed.default_encodings, cfg.default_encodings);
        assert_eq!(parsed.stylesheet_uri, cfg.stylesheet_uri);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            preference_branch = "my.branch."
            default_encodings = "Shift_JIS"
            stylesheet_uri = "chrome://x/skin/x.css"
            preferences_uri = "about:preferences"
            prefs_file = "/tmp/prefs.toml"
        "#;
        let cfg: RedispositionConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.preference_branch, "my.branch.");
        assert_eq!(cfg.default_encodings, "Shift_JIS");
        assert_eq!(cfg.prefs_file, Some(PathBuf::from("/tmp/prefs.toml")));
    }

    #[test]
    fn load_or_init_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("redisposition").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.default_encodings, "GB18030, BIG5");

        fs::write(
            &path,
            "preference_branch = \"a.\"\ndefault_encodings = \"\"\nstylesheet_uri = \"s\"\npreferences_uri = \"p\"\n",
        )
        .unwrap();
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg.preference_branch, "a.");
        assert_eq!(cfg.default_encodings, "");
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "preference_branch = 3").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
