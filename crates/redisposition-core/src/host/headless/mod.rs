//! In-process host used by the CLI and by tests.
//!
//! Each service is a cheap clonable handle over shared state, so the caller
//! can keep one copy to drive events while the extension owns another.

mod window;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::{
    HostError, HttpResponse, ResponseChannel, ResponseObserver, StyleSheetService, Window,
    WindowHandle, WindowId, WindowRegistry, BROWSER_URI,
};

pub use window::HeadlessWindow;

/// Response with an in-memory header list.
#[derive(Debug, Default, Clone)]
pub struct HeadlessResponse {
    headers: Vec<(String, String)>,
    fail_reads: bool,
    writes: usize,
}

impl HeadlessResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Makes every header read fail, as a broken channel would.
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of `set_header` calls made on this response.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl HttpResponse for HeadlessResponse {
    fn header(&self, name: &str) -> Result<Option<String>, HostError> {
        if self.fail_reads {
            return Err(HostError::Header(format!("cannot read {name}")));
        }
        Ok(self.get(name).map(str::to_string))
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        self.writes += 1;
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }
}

#[derive(Default)]
struct ChannelState {
    observer: Option<Rc<dyn ResponseObserver>>,
    subscriptions: usize,
}

/// Response feed that hands each delivered response to the subscribed observer.
#[derive(Clone, Default)]
pub struct HeadlessChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl HeadlessChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().observer.is_some()
    }

    /// Total number of `subscribe` calls accepted.
    pub fn subscription_count(&self) -> usize {
        self.state.borrow().subscriptions
    }

    /// Passes `response` to the observer, if any. Returns whether it was observed.
    pub fn deliver(&self, response: &mut dyn HttpResponse) -> bool {
        let observer = self.state.borrow().observer.clone();
        match observer {
            Some(observer) => {
                observer.observe(response);
                true
            }
            None => false,
        }
    }
}

impl ResponseChannel for HeadlessChannel {
    fn subscribe(&mut self, observer: Rc<dyn ResponseObserver>) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if state.observer.is_some() {
            return Err(HostError::Observer("already subscribed".to_string()));
        }
        state.observer = Some(observer);
        state.subscriptions += 1;
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), HostError> {
        match self.state.borrow_mut().observer.take() {
            Some(_) => Ok(()),
            None => Err(HostError::Observer("not subscribed".to_string())),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    windows: Vec<Rc<RefCell<HeadlessWindow>>>,
    watching: bool,
    next_id: u64,
}

/// Window list plus the window-open notification switch.
#[derive(Clone, Default)]
pub struct HeadlessRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl HeadlessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new browser window and returns it.
    pub fn open_browser_window(&self) -> Rc<RefCell<HeadlessWindow>> {
        self.open_window_at(BROWSER_URI)
    }

    /// Opens a window showing `location`.
    pub fn open_window_at(&self, location: &str) -> Rc<RefCell<HeadlessWindow>> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let window = Rc::new(RefCell::new(HeadlessWindow::new(
            WindowId(state.next_id),
            location,
        )));
        state.windows.push(Rc::clone(&window));
        window
    }

    /// Marks a window closed and forgets it.
    pub fn close_window(&self, id: WindowId) {
        let mut state = self.state.borrow_mut();
        if let Some(pos) = state.windows.iter().position(|w| w.borrow().id() == id) {
            let window = state.windows.remove(pos);
            window.borrow_mut().close();
        }
    }

    pub fn is_watching(&self) -> bool {
        self.state.borrow().watching
    }
}

impl WindowRegistry for HeadlessRegistry {
    fn open_windows(&self) -> Vec<WindowHandle> {
        self.state
            .borrow()
            .windows
            .iter()
            .map(|w| Rc::clone(w) as WindowHandle)
            .collect()
    }

    fn watch_openings(&mut self) -> Result<(), HostError> {
        self.state.borrow_mut().watching = true;
        Ok(())
    }

    fn unwatch_openings(&mut self) -> Result<(), HostError> {
        self.state.borrow_mut().watching = false;
        Ok(())
    }
}

/// Set of registered stylesheet URIs.
#[derive(Clone, Default)]
pub struct HeadlessStyleSheets {
    registered: Rc<RefCell<BTreeSet<String>>>,
}

impl HeadlessStyleSheets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StyleSheetService for HeadlessStyleSheets {
    fn is_registered(&self, uri: &str) -> bool {
        self.registered.borrow().contains(uri)
    }

    fn register(&mut self, uri: &str) -> Result<(), HostError> {
        self.registered.borrow_mut().insert(uri.to_string());
        Ok(())
    }

    fn unregister(&mut self, uri: &str) -> Result<(), HostError> {
        if self.registered.borrow_mut().remove(uri) {
            Ok(())
        } else {
            Err(HostError::StyleSheet(uri.to_string(), "not registered".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ResponseObserver for Upper {
        fn observe(&self, response: &mut dyn HttpResponse) {
            if let Ok(Some(v)) = response.header("X-Test") {
                response.set_header("X-Test", &v.to_uppercase()).unwrap();
            }
        }
    }

    #[test]
    fn channel_delivers_only_while_subscribed() {
        let mut channel = HeadlessChannel::new();
        let mut response = HeadlessResponse::new().with_header("x-test", "abc");
        assert!(!channel.deliver(&mut response));

        channel.subscribe(Rc::new(Upper)).unwrap();
        assert!(channel.subscribe(Rc::new(Upper)).is_err());
        assert!(channel.deliver(&mut response));
        assert_eq!(response.get("X-Test"), Some("ABC"));
        assert_eq!(response.write_count(), 1);

        channel.unsubscribe().unwrap();
        assert!(channel.unsubscribe().is_err());
        assert!(!channel.is_subscribed());
        assert_eq!(channel.subscription_count(), 1);
    }

    #[test]
    fn registry_tracks_open_windows() {
        let registry = HeadlessRegistry::new();
        let a = registry.open_browser_window();
        let _b = registry.open_window_at("about:blank");
        assert_eq!(registry.open_windows().len(), 2);

        let id = a.borrow().id();
        registry.close_window(id);
        assert_eq!(registry.open_windows().len(), 1);
        assert!(a.borrow().is_closed());
    }

    #[test]
    fn stylesheet_register_is_tracked() {
        let mut sheets = HeadlessStyleSheets::new();
        assert!(!sheets.is_registered("chrome://x.css"));
        sheets.register("chrome://x.css").unwrap();
        assert!(sheets.is_registered("chrome://x.css"));
        sheets.unregister("chrome://x.css").unwrap();
        assert!(sheets.unregister("chrome://x.css").is_err());
    }
}
