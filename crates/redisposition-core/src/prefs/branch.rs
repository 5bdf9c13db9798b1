//! Prefixed view over a [`PreferenceStore`] with the extension's read/write policy.

use std::collections::HashMap;

use super::{PrefValue, PreferenceStore};

/// All of the extension's preferences live under one key prefix.
///
/// Reads fall back to (and write back) a default when the stored value is
/// absent or unreadable. Writes that fail are retried once after clearing the
/// key; a second failure is logged and the caller keeps its in-memory value.
///
/// Every successful write is remembered so that the change notification it
/// provokes can be recognised with [`PrefBranch::take_own_echo`] instead of
/// being mistaken for an outside edit.
pub struct PrefBranch {
    prefix: String,
    store: Box<dyn PreferenceStore>,
    own_writes: HashMap<String, PrefValue>,
}

impl PrefBranch {
    pub fn new(prefix: impl Into<String>, store: Box<dyn PreferenceStore>) -> Self {
        Self {
            prefix: prefix.into(),
            store,
            own_writes: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full store key for a branch-relative name.
    pub fn full_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Branch-relative name for a full store key, if it belongs to this branch.
    pub fn relative_key<'a>(&self, full_key: &'a str) -> Option<&'a str> {
        full_key.strip_prefix(self.prefix.as_str())
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn PreferenceStore {
        self.store.as_mut()
    }

    /// Reads a bool, writing and returning `default` if absent or corrupt.
    pub fn read_bool(&mut self, name: &str, default: bool) -> bool {
        let key = self.full_key(name);
        match self.store.get_bool(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!("preference {} absent, using default {}", key, default);
                self.write(name, PrefValue::Bool(default));
                default
            }
            Err(e) => {
                tracing::warn!("preference {} unreadable ({}), resetting to {}", key, e, default);
                self.write(name, PrefValue::Bool(default));
                default
            }
        }
    }

    /// Reads a string, writing and returning `default` if absent or corrupt.
    pub fn read_string(&mut self, name: &str, default: &str) -> String {
        let key = self.full_key(name);
        match self.store.get_string(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!("preference {} absent, using default {:?}", key, default);
                self.write(name, PrefValue::String(default.to_string()));
                default.to_string()
            }
            Err(e) => {
                tracing::warn!("preference {} unreadable ({}), resetting to {:?}", key, e, default);
                self.write(name, PrefValue::String(default.to_string()));
                default.to_string()
            }
        }
    }

    /// Reads a string without any default handling (used to inspect outside edits).
    pub fn peek_string(&self, name: &str) -> Option<String> {
        self.store.get_string(&self.full_key(name)).ok().flatten()
    }

    /// Writes `value` under `name`. Returns false if the value could not be
    /// stored even after clearing the key and retrying once.
    ///
    /// Rewriting the stored value changes nothing and provokes no
    /// notification, so it is not remembered as an own write.
    pub fn write(&mut self, name: &str, value: PrefValue) -> bool {
        let key = self.full_key(name);
        let unchanged = matches!(
            self.store.get(&key),
            Ok(Some(ref current)) if *current == value
        );
        let first = match self.store.set(&key, value.clone()) {
            Ok(()) => {
                if !unchanged {
                    self.own_writes.insert(key, value);
                }
                return true;
            }
            Err(e) => e,
        };

        tracing::debug!("write {} failed ({}), clearing and retrying", key, first);
        if let Err(e) = self.store.clear(&key) {
            tracing::debug!("clear {} failed: {}", key, e);
        }
        match self.store.set(&key, value.clone()) {
            Ok(()) => {
                self.own_writes.insert(key, value);
                true
            }
            Err(e) => {
                tracing::warn!("could not persist {}: {}; keeping in-memory value", key, e);
                false
            }
        }
    }

    /// Consumes the record of our last write to `full_key` and reports whether
    /// the stored value still equals it, i.e. whether a change notification for
    /// that key is just the echo of our own write.
    pub fn take_own_echo(&mut self, full_key: &str) -> bool {
        let Some(written) = self.own_writes.remove(full_key) else {
            return false;
        };
        matches!(self.store.get(full_key), Ok(Some(current)) if current == written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPrefs, PreferenceStore};

    const PREFIX: &str = "extensions.redisposition.";

    fn branch(store: MemoryPrefs) -> PrefBranch {
        PrefBranch::new(PREFIX, Box::new(store))
    }

    #[test]
    fn absent_values_write_defaults() {
        let mut b = branch(MemoryPrefs::new());
        assert!(b.read_bool("firstRun", true));
        assert_eq!(b.read_string("encodings", "GB18030, BIG5"), "GB18030, BIG5");
        assert_eq!(
            b.store().get_bool("extensions.redisposition.firstRun").unwrap(),
            Some(true)
        );
        assert_eq!(b.peek_string("encodings").as_deref(), Some("GB18030, BIG5"));
    }

    #[test]
    fn corrupt_value_is_replaced_with_default() {
        let mut store = MemoryPrefs::new();
        store.insert_raw(
            "extensions.redisposition.activated",
            PrefValue::String("yes".to_string()),
        );
        let mut b = branch(store);
        assert!(!b.read_bool("activated", false));
        assert_eq!(
            b.store().get_bool("extensions.redisposition.activated").unwrap(),
            Some(false)
        );
    }

    #[test]
    fn locked_write_reports_failure() {
        let mut store = MemoryPrefs::new();
        store.lock("extensions.redisposition.activated");
        let mut b = branch(store);
        assert!(!b.write("activated", PrefValue::Bool(true)));
        assert!(!b.take_own_echo("extensions.redisposition.activated"));
    }

    #[test]
    fn own_write_echo_is_consumed_once() {
        let mut b = branch(MemoryPrefs::new());
        assert!(b.write("encodings", PrefValue::String("BIG5".to_string())));
        assert!(b.take_own_echo("extensions.redisposition.encodings"));
        assert!(!b.take_own_echo("extensions.redisposition.encodings"));
    }

    #[test]
    fn outside_edit_after_own_write_is_not_an_echo() {
        let mut b = branch(MemoryPrefs::new());
        b.write("encodings", PrefValue::String("BIG5".to_string()));
        b.store_mut()
            .set_string("extensions.redisposition.encodings", "EUC-KR")
            .unwrap();
        assert!(!b.take_own_echo("extensions.redisposition.encodings"));
    }

    #[test]
    fn unchanged_write_leaves_no_echo_record() {
        let mut store = MemoryPrefs::new();
        store.insert_raw(
            "extensions.redisposition.encodings",
            PrefValue::String("BIG5".to_string()),
        );
        let mut b = branch(store);
        assert!(b.write("encodings", PrefValue::String("BIG5".to_string())));
        // A later notification for the key comes from someone else.
        assert!(!b.take_own_echo("extensions.redisposition.encodings"));
    }

    #[test]
    fn relative_key_strips_prefix() {
        let b = branch(MemoryPrefs::new());
        assert_eq!(b.relative_key("extensions.redisposition.encodings"), Some("encodings"));
        assert_eq!(b.relative_key("browser.startup.page"), None);
    }
}
