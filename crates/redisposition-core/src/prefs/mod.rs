//! Preference storage.
//!
//! The host's preference backend is reached through [`PreferenceStore`].
//! [`PrefBranch`] layers the extension's key prefix, default handling, the
//! retry-once write policy and own-write echo detection on top of it.

mod branch;
mod file;
mod memory;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use branch::PrefBranch;
pub use file::FilePrefs;
pub use memory::MemoryPrefs;

/// A stored preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    String(String),
}

impl PrefValue {
    fn type_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::String(_) => "string",
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefError {
    #[error("preference {key} holds a {found}, expected a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("preference {0} is locked")]
    Locked(String),
    #[error("preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Host preference backend, keyed by full preference name.
///
/// `Ok(None)` means the key is absent. A value of the wrong type is reported as
/// [`PrefError::TypeMismatch`] by the typed getters.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError>;
    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PrefError>;
    fn clear(&mut self, key: &str) -> Result<(), PrefError>;

    fn get_bool(&self, key: &str) -> Result<Option<bool>, PrefError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(PrefError::TypeMismatch {
                key: key.to_string(),
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, PrefError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(PrefError::TypeMismatch {
                key: key.to_string(),
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), PrefError> {
        self.set(key, PrefValue::Bool(value))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.set(key, PrefValue::String(value.to_string()))
    }
}

/// A store shared with the host, which may edit it behind the extension's back.
impl<S: PreferenceStore + ?Sized> PreferenceStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PrefError> {
        self.borrow_mut().set(key, value)
    }

    fn clear(&mut self, key: &str) -> Result<(), PrefError> {
        self.borrow_mut().clear(key)
    }
}
