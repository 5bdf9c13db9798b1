//! Load/save [`Settings`] through a [`PrefBranch`].

use crate::catalog::EncodingCatalog;
use crate::prefs::{PrefBranch, PrefValue};

use super::Settings;

pub const FIRST_RUN: &str = "firstRun";
pub const ACTIVATED: &str = "activated";
pub const ENCODINGS: &str = "encodings";
pub const CURRENT_ENCODING: &str = "currentEncoding";

impl Settings {
    /// Reads the four persisted fields (writing defaults for any that are
    /// absent or corrupt), derives the mode and persists any repair.
    pub fn load(prefs: &mut PrefBranch, default_encodings: &str) -> Self {
        let first_run = prefs.read_bool(FIRST_RUN, true);
        let activated = prefs.read_bool(ACTIVATED, false);
        let encodings = prefs.read_string(ENCODINGS, default_encodings);
        let current_encoding = prefs.read_string(CURRENT_ENCODING, "");

        let mut settings = Self {
            first_run,
            activated,
            current_encoding,
            catalog: EncodingCatalog::from_pref(&encodings),
            mode: Default::default(),
        };
        settings.reconcile(prefs);
        tracing::info!(
            "settings loaded: mode={}, catalog={:?}",
            settings.mode,
            settings.catalog.entries()
        );
        settings
    }

    /// Persists `firstRun = false`, `activated` and `currentEncoding`.
    ///
    /// The first run is consumed by the first save that manages to store it.
    /// The catalog is never written back.
    pub fn save(&mut self, prefs: &mut PrefBranch) {
        if prefs.write(FIRST_RUN, PrefValue::Bool(false)) {
            self.first_run = false;
        }
        self.persist_state(prefs);
    }

    /// Recomputes the mode; if that repaired `activated`/`currentEncoding`,
    /// the repair is persisted straight away. Returns true if the mode changed.
    pub fn reconcile(&mut self, prefs: &mut PrefBranch) -> bool {
        let before_state = self.persisted_state();
        let before_mode = self.mode.clone();
        let mode = self.compute_mode();
        if self.persisted_state() != before_state {
            tracing::info!(
                "encoding {:?} is not selectable; deactivating",
                before_state.1
            );
            self.persist_state(prefs);
        }
        mode != before_mode
    }

    /// Turns the extension off when the host would not let it intercept,
    /// and persists the change.
    pub fn deactivate(&mut self, prefs: &mut PrefBranch) {
        self.activated = false;
        self.compute_mode();
        self.persist_state(prefs);
    }

    /// Handles an outside edit of the `encodings` preference.
    ///
    /// Returns false when the stored value is the one the current catalog was
    /// built from (nothing to refresh). Otherwise rebuilds the catalog,
    /// reconciles the mode and returns true.
    pub fn reload_catalog(&mut self, prefs: &mut PrefBranch, default_encodings: &str) -> bool {
        let raw = prefs.read_string(ENCODINGS, default_encodings);
        if raw == self.catalog.source() {
            return false;
        }
        self.set_catalog(EncodingCatalog::from_pref(&raw));
        tracing::info!("encoding catalog changed: {:?}", self.catalog.entries());
        self.reconcile(prefs);
        true
    }

    fn persist_state(&self, prefs: &mut PrefBranch) {
        prefs.write(ACTIVATED, PrefValue::Bool(self.activated));
        prefs.write(
            CURRENT_ENCODING,
            PrefValue::String(self.current_encoding.clone()),
        );
    }
}
