//! Attachment filename extraction from a raw Content-Disposition value.

use std::fmt;

/// Why a header value could not be read as `attachment; filename=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// The value does not start with the `attachment;` disposition type.
    NotAttachment,
    /// `attachment;` is not followed by a `filename=` parameter.
    MissingFilename,
    /// The `filename=` parameter is present but empty.
    EmptyFilename,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NotAttachment => write!(f, "not an attachment disposition"),
            ParseFailure::MissingFilename => write!(f, "no filename parameter"),
            ParseFailure::EmptyFilename => write!(f, "empty filename parameter"),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Extracts the filename from `attachment; filename=<rest>`.
///
/// The disposition type and the parameter name are matched case-insensitively
/// and surrounding whitespace is tolerated. Everything after `filename=` is the
/// value; when it is wrapped in double quotes (optionally followed by `;`) the
/// quotes are stripped, otherwise the value is returned as captured.
///
/// `filename*=` is deliberately not matched: such headers already carry an
/// explicit charset and are left alone.
pub fn parse_attachment_filename(header_value: &str) -> Result<&str, ParseFailure> {
    let rest = strip_prefix_ignore_case(header_value.trim_start(), "attachment")
        .ok_or(ParseFailure::NotAttachment)?;
    let rest = rest
        .trim_start()
        .strip_prefix(';')
        .ok_or(ParseFailure::NotAttachment)?;

    let rest = strip_prefix_ignore_case(rest.trim_start(), "filename")
        .ok_or(ParseFailure::MissingFilename)?;
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or(ParseFailure::MissingFilename)?;

    let filename = trim_quotes(value.trim());
    if filename.is_empty() {
        return Err(ParseFailure::EmptyFilename);
    }
    Ok(filename)
}

/// `"name";` and `"name"` become `name`; anything else is returned unchanged.
fn trim_quotes(value: &str) -> &str {
    let body = value
        .strip_suffix(';')
        .map(str::trim_end)
        .unwrap_or(value);
    match body.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner,
        None => value,
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
