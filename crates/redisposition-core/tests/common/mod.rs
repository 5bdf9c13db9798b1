//! Headless host wiring shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use redisposition_core::config::RedispositionConfig;
use redisposition_core::host::headless::{
    HeadlessChannel, HeadlessRegistry, HeadlessResponse, HeadlessStyleSheets, HeadlessWindow,
};
use redisposition_core::host::Window;
use redisposition_core::prefs::{MemoryPrefs, PrefValue};
use redisposition_core::ui::BUTTON_ID;
use redisposition_core::{Extension, HostServices};

pub const PREFIX: &str = "extensions.redisposition.";

pub fn key(name: &str) -> String {
    format!("{PREFIX}{name}")
}

pub struct Harness {
    pub ext: Extension,
    pub channel: HeadlessChannel,
    pub registry: HeadlessRegistry,
    pub sheets: HeadlessStyleSheets,
    pub prefs: Rc<RefCell<MemoryPrefs>>,
    pub config: RedispositionConfig,
}

pub fn prefs_with(values: &[(&str, PrefValue)]) -> Rc<RefCell<MemoryPrefs>> {
    let mut store = MemoryPrefs::new();
    for (name, value) in values {
        store.insert_raw(&key(name), value.clone());
    }
    Rc::new(RefCell::new(store))
}

/// Starts an extension against `prefs` and the windows already open in `registry`.
pub fn start(prefs: Rc<RefCell<MemoryPrefs>>, registry: HeadlessRegistry) -> Harness {
    start_on(prefs, registry, HeadlessChannel::new())
}

/// Like [`start`], but responses come through `channel`.
pub fn start_on(
    prefs: Rc<RefCell<MemoryPrefs>>,
    registry: HeadlessRegistry,
    channel: HeadlessChannel,
) -> Harness {
    let config = RedispositionConfig::default();
    let sheets = HeadlessStyleSheets::new();
    let ext = Extension::startup(
        config.clone(),
        HostServices {
            responses: Box::new(channel.clone()),
            windows: Box::new(registry.clone()),
            stylesheets: Box::new(sheets.clone()),
            prefs: Box::new(Rc::clone(&prefs)),
        },
    );
    Harness {
        ext,
        channel,
        registry,
        sheets,
        prefs,
        config,
    }
}

impl Harness {
    /// Sends one response through the host feed; `None` means no disposition header.
    pub fn respond(&self, disposition: Option<&str>) -> HeadlessResponse {
        let mut response = HeadlessResponse::new().with_header("Content-Type", "application/pdf");
        if let Some(value) = disposition {
            response = response.with_header("Content-Disposition", value);
        }
        self.channel.deliver(&mut response);
        response
    }
}

pub fn window_id(window: &Rc<RefCell<HeadlessWindow>>) -> redisposition_core::host::WindowId {
    window.borrow().id()
}

pub fn button_attr(window: &Rc<RefCell<HeadlessWindow>>, name: &str) -> Option<String> {
    let w = window.borrow();
    let button = w.element_by_id(BUTTON_ID)?;
    w.attribute(button, name)
}

/// `(label, checked)` of every menu item in the window's button menu.
pub fn menu_items(window: &Rc<RefCell<HeadlessWindow>>) -> Vec<(String, bool)> {
    let w = window.borrow();
    let Some(button) = w.element_by_id(BUTTON_ID) else {
        return Vec::new();
    };
    let popup = w.children(button)[0];
    w.children(popup)
        .into_iter()
        .filter_map(|item| {
            let label = w.attribute(item, "label")?;
            let checked = w.attribute(item, "checked").as_deref() == Some("true");
            Some((label, checked))
        })
        .collect()
}
