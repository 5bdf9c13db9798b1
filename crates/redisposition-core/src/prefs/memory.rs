//! In-memory preference store.

use std::collections::{BTreeMap, HashSet};

use super::{PrefError, PrefValue, PreferenceStore};

/// Preference store held in memory.
///
/// Like a typed host backend, writing a value of a different type over an
/// existing one fails with [`PrefError::TypeMismatch`] until the key is
/// cleared. Keys can be locked to simulate writes that keep failing.
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, PrefValue>,
    locked: HashSet<String>,
    writes: usize,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write to `key` fail.
    pub fn lock(&mut self, key: &str) {
        self.locked.insert(key.to_string());
    }

    /// Stores `value` directly, bypassing type checks (e.g. a corrupt entry).
    pub fn insert_raw(&mut self, key: &str, value: PrefValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PrefError> {
        if self.locked.contains(key) {
            return Err(PrefError::Locked(key.to_string()));
        }
        if let Some(existing) = self.values.get(key) {
            if existing.type_name() != value.type_name() {
                return Err(PrefError::TypeMismatch {
                    key: key.to_string(),
                    expected: existing.type_name(),
                    found: value.type_name(),
                });
            }
        }
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), PrefError> {
        if self.locked.contains(key) {
            return Err(PrefError::Locked(key.to_string()));
        }
        self.values.remove(key);
        Ok(())
    }
}
