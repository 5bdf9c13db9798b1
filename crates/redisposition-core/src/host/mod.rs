//! Interfaces to the host browser.
//!
//! The browser owns windows, responses and observer lists; the extension only
//! sees them through these traits. Everything here is driven from the host's
//! single callback context, so shared handles are `Rc`/`RefCell`.

pub mod headless;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Location of a main browser window; only these get a toolbar button.
pub const BROWSER_URI: &str = "chrome://browser/content/browser.xul";

/// Errors reported by host services.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no such element: {0}")]
    NoSuchElement(String),
    #[error("window {0} is closed")]
    WindowClosed(WindowId),
    #[error("header access failed: {0}")]
    Header(String),
    #[error("observer registration failed: {0}")]
    Observer(String),
    #[error("stylesheet {0}: {1}")]
    StyleSheet(String, String),
}

/// One HTTP response as seen by the response observer.
pub trait HttpResponse {
    /// Value of `name`, or `None` if the response has no such header.
    fn header(&self, name: &str) -> Result<Option<String>, HostError>;
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), HostError>;
}

/// Receives every HTTP response while subscribed.
pub trait ResponseObserver {
    fn observe(&self, response: &mut dyn HttpResponse);
}

/// The host's response-observation feed.
pub trait ResponseChannel {
    fn subscribe(&mut self, observer: Rc<dyn ResponseObserver>) -> Result<(), HostError>;
    fn unsubscribe(&mut self) -> Result<(), HostError>;
}

/// Injects the extension's fixed stylesheet.
pub trait StyleSheetService {
    fn is_registered(&self, uri: &str) -> bool;
    fn register(&mut self, uri: &str) -> Result<(), HostError>;
    fn unregister(&mut self, uri: &str) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to an element in a window's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// One open browser window and the parts of its document the toolbar needs.
pub trait Window {
    fn id(&self) -> WindowId;
    fn is_closed(&self) -> bool;
    /// URI of the window's top-level document.
    fn location(&self) -> String;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    fn remove_children(&mut self, parent: NodeId) -> Result<(), HostError>;
    fn remove_element(&mut self, node: NodeId) -> Result<(), HostError>;
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// All toolbars of the window, in document order.
    fn toolbars(&self) -> Vec<NodeId>;
    /// The toolbar customization palette.
    fn palette(&self) -> Result<NodeId, HostError>;
    /// Moves `item` into `toolbar`, before `before` when given.
    fn insert_toolbar_item(
        &mut self,
        toolbar: NodeId,
        item: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), HostError>;
    /// Comma-separated ids of the items currently in `toolbar`.
    fn live_toolbar_set(&self, toolbar: NodeId) -> String;
    /// Stores `name` of `node` so it survives a restart.
    fn persist_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError>;
    fn open_dialog(&mut self, uri: &str) -> Result<(), HostError>;
}

/// Shared handle to a host-owned window.
pub type WindowHandle = Rc<RefCell<dyn Window>>;

/// Enumerates windows and controls delivery of window-open notifications.
pub trait WindowRegistry {
    fn open_windows(&self) -> Vec<WindowHandle>;
    fn watch_openings(&mut self) -> Result<(), HostError>;
    fn unwatch_openings(&mut self) -> Result<(), HostError>;
}
