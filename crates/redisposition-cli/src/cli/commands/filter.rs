//! `redisposition filter` – pass header values from stdin through the interceptor.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use redisposition_core::config::RedispositionConfig;
use redisposition_core::disposition::CONTENT_DISPOSITION;
use redisposition_core::host::headless::{HeadlessChannel, HeadlessResponse};
use redisposition_core::interceptor::ResponseInterceptor;
use redisposition_core::Mode;

use crate::cli::session::{load_settings, validate_mode, Session};

pub fn run_filter(cfg: &RedispositionConfig, prefs_path: &Path, mode: Option<Mode>) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match mode {
        Some(m) => {
            let settings = load_settings(cfg, prefs_path)?;
            let mode = validate_mode(&settings, m)?;
            let channel = HeadlessChannel::new();
            let mut interceptor = ResponseInterceptor::new(Box::new(channel.clone()));
            interceptor.apply_mode(&mode);
            filter_lines(&channel, stdin.lock(), &mut stdout.lock())
        }
        None => {
            let session = Session::start(cfg, prefs_path)?;
            filter_lines(&session.channel, stdin.lock(), &mut stdout.lock())
        }
    }
}

/// One output line per input line: the resulting header value, or `-` when
/// the response carries no Content-Disposition.
pub(super) fn filter_lines(
    channel: &HeadlessChannel,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let mut response = HeadlessResponse::new();
        if !line.trim().is_empty() {
            response = response.with_header(CONTENT_DISPOSITION, &line);
        }
        channel.deliver(&mut response);
        writeln!(out, "{}", response.get(CONTENT_DISPOSITION).unwrap_or("-"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rewrites_each_line() {
        let channel = HeadlessChannel::new();
        let mut interceptor = ResponseInterceptor::new(Box::new(channel.clone()));
        interceptor.apply_mode(&Mode::Encode("BIG5".to_string()));

        let input = "attachment; filename=\"a.txt\"\n\nattachment; foo=bar\n";
        let mut out = Vec::new();
        filter_lines(&channel, input.as_bytes(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "attachment; filename*=BIG5''a.txt\n-\nattachment; foo=bar\n"
        );
    }

    #[test]
    fn filter_passes_through_when_disabled() {
        let channel = HeadlessChannel::new();
        let mut out = Vec::new();
        filter_lines(&channel, "attachment; filename=a\n".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "attachment; filename=a\n");
    }
}
