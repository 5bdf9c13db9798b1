//! Extension settings and mode derivation.
//!
//! [`Settings`] is the single configuration record: the persisted
//! `activated`/`currentEncoding` pair, the first-run flag and the
//! encoding catalog. [`Settings::compute_mode`] derives the rewrite
//! [`Mode`] and repairs the record when the chosen encoding is not valid.

mod persist;

use crate::catalog::EncodingCatalog;
use crate::disposition::{Mode, INLINE};
use crate::ui::UserAction;

pub use persist::{ACTIVATED, CURRENT_ENCODING, ENCODINGS, FIRST_RUN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    first_run: bool,
    activated: bool,
    current_encoding: String,
    catalog: EncodingCatalog,
    mode: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_run: true,
            activated: false,
            current_encoding: String::new(),
            catalog: EncodingCatalog::default(),
            mode: Mode::Disabled,
        }
    }
}

impl Settings {
    /// Builds a record from raw values and derives its mode.
    pub fn new(
        first_run: bool,
        activated: bool,
        current_encoding: impl Into<String>,
        catalog: EncodingCatalog,
    ) -> Self {
        let mut settings = Self {
            first_run,
            activated,
            current_encoding: current_encoding.into(),
            catalog,
            mode: Mode::Disabled,
        };
        settings.compute_mode();
        settings
    }

    pub fn first_run(&self) -> bool {
        self.first_run
    }

    pub fn activated(&self) -> bool {
        self.activated
    }

    pub fn current_encoding(&self) -> &str {
        &self.current_encoding
    }

    pub fn catalog(&self) -> &EncodingCatalog {
        &self.catalog
    }

    /// Mode as of the last [`Settings::compute_mode`].
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Derives the mode from `(activated, currentEncoding, catalog)`.
    ///
    /// An empty or unknown `currentEncoding` forces `activated = false` and
    /// clears the encoding. A known encoding is normalised to the catalog's
    /// spelling. Idempotent.
    pub fn compute_mode(&mut self) -> Mode {
        let canonical = self
            .catalog
            .canonical(&self.current_encoding)
            .map(str::to_string);

        self.mode = match canonical {
            None => {
                self.activated = false;
                self.current_encoding.clear();
                Mode::Disabled
            }
            Some(name) => {
                self.current_encoding = name;
                if !self.activated {
                    Mode::Disabled
                } else if self.current_encoding == INLINE {
                    Mode::Inline
                } else {
                    Mode::Encode(self.current_encoding.clone())
                }
            }
        };
        self.mode.clone()
    }

    /// Applies a toolbar event to the record. The caller recomputes the mode.
    pub fn apply_action(&mut self, action: &UserAction) {
        match action {
            UserAction::ToggleButton => {
                self.activated = !self.activated && !self.current_encoding.is_empty();
            }
            UserAction::OpenMenu => {
                self.activated = true;
            }
            UserAction::SelectEncoding(name) => {
                self.current_encoding = name.clone();
                self.activated = true;
            }
            UserAction::OpenPreferences => {}
        }
    }

    pub(crate) fn set_catalog(&mut self, catalog: EncodingCatalog) {
        self.catalog = catalog;
    }

    fn persisted_state(&self) -> (bool, String) {
        (self.activated, self.current_encoding.clone())
    }
}
