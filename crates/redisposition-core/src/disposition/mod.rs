//! Content-Disposition rewriting.
//!
//! Decides, for a raw `Content-Disposition` value and the current [`Mode`],
//! whether the header should be replaced and with what. Pure: no I/O and no
//! state, so it is safe to call inline with the response pipeline.

mod parse;

use std::fmt;
use std::str::FromStr;

pub use parse::{parse_attachment_filename, ParseFailure};

/// Name of the response header this crate rewrites.
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// Value written in inline mode (and the pseudo-encoding that selects it).
pub const INLINE: &str = "inline";

/// Current rewrite behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Disabled,
    /// Replace every disposition with `inline`.
    Inline,
    /// Re-tag the attachment filename with this charset label.
    Encode(String),
}

impl Mode {
    /// True when responses should be observed at all.
    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::Disabled)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Disabled => write!(f, "disabled"),
            Mode::Inline => write!(f, "{INLINE}"),
            Mode::Encode(charset) => write!(f, "{charset}"),
        }
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    /// `disabled` (or an empty string) and `inline` are keywords; anything
    /// else is taken as an encoding name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.is_empty() || s.eq_ignore_ascii_case("disabled") {
            Mode::Disabled
        } else if s.eq_ignore_ascii_case(INLINE) {
            Mode::Inline
        } else {
            Mode::Encode(s.to_string())
        })
    }
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    NoChange,
    Replaced(String),
    ParseFailed(ParseFailure),
}

/// Decides how to rewrite a present `Content-Disposition` value.
///
/// - `Disabled` never changes anything.
/// - `Inline` replaces any present value with `inline`, discarding the filename.
/// - `Encode(charset)` turns `attachment; filename="X"` into
///   `attachment; filename*=<charset>''X`. The filename is copied as-is, without
///   percent-encoding, so that existing users see the same output as before.
///   Values that are not `attachment; filename=...` are reported as
///   [`RewriteOutcome::ParseFailed`] and must be left untouched by the caller.
///
/// The charset must already have been validated against the encoding catalog.
pub fn decide(raw_header: &str, mode: &Mode) -> RewriteOutcome {
    match mode {
        Mode::Disabled => RewriteOutcome::NoChange,
        Mode::Inline => RewriteOutcome::Replaced(INLINE.to_string()),
        Mode::Encode(charset) => match parse_attachment_filename(raw_header) {
            Ok(filename) => {
                RewriteOutcome::Replaced(format!("attachment; filename*={charset}''{filename}"))
            }
            Err(reason) => RewriteOutcome::ParseFailed(reason),
        },
    }
}
