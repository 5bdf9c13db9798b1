//! Encoding catalog: the charset labels a user can pick from.

use crate::disposition::INLINE;

/// Fixed first entry of every catalog.
pub const UTF_8: &str = "UTF-8";

/// Default value of the `encodings` preference.
pub const DEFAULT_CUSTOM_ENCODINGS: &str = "GB18030, BIG5";

/// Ordered list of selectable encodings: `UTF-8` followed by the user's custom
/// entries (trimmed, empty entries dropped, duplicates removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingCatalog {
    entries: Vec<String>,
    /// Raw preference value this catalog was built from.
    source: String,
}

impl EncodingCatalog {
    /// Builds a catalog from the comma-separated `encodings` preference.
    ///
    /// Labels compare ASCII case-insensitively; the first spelling wins.
    /// `inline` is reserved for inline mode and never becomes an entry.
    pub fn from_pref(raw: &str) -> Self {
        let mut entries = vec![UTF_8.to_string()];
        for name in raw.split(',').map(str::trim) {
            if name.is_empty() || name.eq_ignore_ascii_case(INLINE) {
                continue;
            }
            if entries.iter().any(|e| e.eq_ignore_ascii_case(name)) {
                continue;
            }
            entries.push(name.to_string());
        }
        Self {
            entries,
            source: raw.to_string(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The preference value this catalog was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.eq_ignore_ascii_case(name))
    }

    /// Whether `name` is a valid `currentEncoding`: a catalog entry or `inline`.
    pub fn accepts(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    /// The catalog's own spelling of `name` (or `inline`), if it is accepted.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case(INLINE) {
            return Some(INLINE);
        }
        self.entries
            .iter()
            .find(|e| e.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl Default for EncodingCatalog {
    fn default() -> Self {
        Self::from_pref(DEFAULT_CUSTOM_ENCODINGS)
    }
}
