//! Response interceptor: rewrites `Content-Disposition` on observed responses.

use std::cell::RefCell;
use std::rc::Rc;

use crate::disposition::{decide, Mode, RewriteOutcome, CONTENT_DISPOSITION};
use crate::host::{HostError, HttpResponse, ResponseChannel, ResponseObserver};

/// The observer handed to the host. Holds the mode in effect for rewrites.
#[derive(Debug, Default)]
pub struct HeaderRewriter {
    mode: RefCell<Mode>,
}

impl HeaderRewriter {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: RefCell::new(mode),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.borrow().clone()
    }

    fn rewrite(&self, response: &mut dyn HttpResponse) -> Result<(), HostError> {
        let Some(raw) = response.header(CONTENT_DISPOSITION)? else {
            return Ok(());
        };
        let outcome = decide(&raw, &self.mode.borrow());
        match outcome {
            RewriteOutcome::Replaced(value) => {
                if value.chars().any(char::is_control) {
                    tracing::warn!(
                        "rewritten disposition contains control characters: {:?}",
                        value
                    );
                }
                tracing::debug!("rewriting {:?} -> {:?}", raw, value);
                response.set_header(CONTENT_DISPOSITION, &value)
            }
            RewriteOutcome::ParseFailed(reason) => {
                tracing::debug!("leaving {:?} untouched: {}", raw, reason);
                Ok(())
            }
            RewriteOutcome::NoChange => Ok(()),
        }
    }
}

impl ResponseObserver for HeaderRewriter {
    /// Never fails: a response whose headers cannot be read or written is
    /// logged and skipped, and the next response is handled normally.
    fn observe(&self, response: &mut dyn HttpResponse) {
        if let Err(e) = self.rewrite(response) {
            tracing::warn!("skipping response: {}", e);
        }
    }
}

/// Keeps the host subscription in step with the current mode.
pub struct ResponseInterceptor {
    channel: Box<dyn ResponseChannel>,
    rewriter: Rc<HeaderRewriter>,
    subscribed: bool,
}

impl ResponseInterceptor {
    pub fn new(channel: Box<dyn ResponseChannel>) -> Self {
        Self {
            channel,
            rewriter: Rc::new(HeaderRewriter::default()),
            subscribed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscribed
    }

    pub fn mode(&self) -> Mode {
        self.rewriter.mode()
    }

    /// Installs `mode` and subscribes or unsubscribes to match it.
    ///
    /// Returns false when `mode` needs a subscription the host refused.
    pub fn apply_mode(&mut self, mode: &Mode) -> bool {
        *self.rewriter.mode.borrow_mut() = mode.clone();
        self.set_active(mode.is_active())
    }

    /// Subscribes (`true`) or unsubscribes (`false`); repeated calls are no-ops.
    ///
    /// Returns whether the interceptor ended up in the requested state. If the
    /// host refuses the subscription the interceptor stays inactive.
    pub fn set_active(&mut self, active: bool) -> bool {
        if active == self.subscribed {
            return true;
        }
        let observer: Rc<dyn ResponseObserver> = self.rewriter.clone();
        let result = if active {
            self.channel.subscribe(observer)
        } else {
            self.channel.unsubscribe()
        };
        match result {
            Ok(()) => {
                self.subscribed = active;
                let state = if active { "active" } else { "inactive" };
                tracing::info!("response interceptor {}", state);
            }
            Err(e) if active => {
                tracing::warn!("could not subscribe to responses: {}", e);
            }
            Err(e) => {
                tracing::warn!("unsubscribe failed, dropping subscription: {}", e);
                self.subscribed = false;
            }
        }
        self.subscribed == active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::headless::{HeadlessChannel, HeadlessResponse};

    fn interceptor() -> (ResponseInterceptor, HeadlessChannel) {
        let channel = HeadlessChannel::new();
        (ResponseInterceptor::new(Box::new(channel.clone())), channel)
    }

    #[test]
    fn active_state_follows_mode() {
        let (mut icpt, channel) = interceptor();
        icpt.apply_mode(&Mode::Encode("BIG5".to_string()));
        assert!(icpt.is_active());
        assert!(channel.is_subscribed());

        icpt.apply_mode(&Mode::Inline);
        assert_eq!(channel.subscription_count(), 1);

        icpt.apply_mode(&Mode::Disabled);
        assert!(!icpt.is_active());
        assert!(!channel.is_subscribed());
        icpt.set_active(false);
    }

    #[test]
    fn refused_subscription_is_reported() {
        let (mut icpt, channel) = interceptor();
        let other = Rc::new(HeaderRewriter::new(Mode::Inline));
        channel.clone().subscribe(other).unwrap();

        assert!(!icpt.apply_mode(&Mode::Encode("BIG5".to_string())));
        assert!(!icpt.is_active());
        assert!(icpt.apply_mode(&Mode::Disabled));
        assert!(icpt.set_active(false));
    }

    #[test]
    fn rewrites_attachment_filename() {
        let (mut icpt, channel) = interceptor();
        icpt.apply_mode(&Mode::Encode("UTF-8".to_string()));
        let mut response = HeadlessResponse::new()
            .with_header("content-disposition", "attachment; filename=\"测试.pdf\"");
        assert!(channel.deliver(&mut response));
        assert_eq!(
            response.get(CONTENT_DISPOSITION),
            Some("attachment; filename*=UTF-8''测试.pdf")
        );
    }

    #[test]
    fn absent_header_is_not_written() {
        let (mut icpt, channel) = interceptor();
        icpt.apply_mode(&Mode::Inline);
        let mut response = HeadlessResponse::new().with_header("Content-Type", "text/plain");
        channel.deliver(&mut response);
        assert_eq!(response.write_count(), 0);
        assert_eq!(response.get(CONTENT_DISPOSITION), None);
    }

    #[test]
    fn parse_failure_leaves_header() {
        let (mut icpt, channel) = interceptor();
        icpt.apply_mode(&Mode::Encode("GB18030".to_string()));
        let mut response =
            HeadlessResponse::new().with_header(CONTENT_DISPOSITION, "attachment; foo=bar");
        channel.deliver(&mut response);
        assert_eq!(response.write_count(), 0);
        assert_eq!(response.get(CONTENT_DISPOSITION), Some("attachment; foo=bar"));
    }

    #[test]
    fn read_error_does_not_stop_later_responses() {
        let (mut icpt, channel) = interceptor();
        icpt.apply_mode(&Mode::Inline);

        let mut broken = HeadlessResponse::failing();
        channel.deliver(&mut broken);
        assert!(icpt.is_active());

        let mut ok =
            HeadlessResponse::new().with_header(CONTENT_DISPOSITION, "attachment; filename=a");
        channel.deliver(&mut ok);
        assert_eq!(ok.get(CONTENT_DISPOSITION), Some("inline"));
    }
}
