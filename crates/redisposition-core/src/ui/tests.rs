use std::rc::Rc;

use super::*;
use crate::catalog::EncodingCatalog;
use crate::host::headless::{HeadlessRegistry, HeadlessWindow};

fn settings(activated: bool, encoding: &str) -> Settings {
    Settings::new(true, activated, encoding, EncodingCatalog::default())
}

fn button_attr(window: &Rc<RefCell<HeadlessWindow>>, name: &str) -> Option<String> {
    let w = window.borrow();
    let button = w.element_by_id(BUTTON_ID)?;
    w.attribute(button, name)
}

fn menu_labels(window: &Rc<RefCell<HeadlessWindow>>) -> Vec<String> {
    let w = window.borrow();
    let button = w.element_by_id(BUTTON_ID).unwrap();
    let popup = w.children(button)[0];
    w.children(popup)
        .into_iter()
        .filter_map(|item| w.attribute(item, "label"))
        .collect()
}

fn handle(window: &Rc<RefCell<HeadlessWindow>>) -> WindowHandle {
    Rc::clone(window) as WindowHandle
}

#[test]
fn attach_builds_button_and_menu() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");

    ui.attach(&handle(&window), &settings(true, "GB18030"));

    assert_eq!(ui.widget_count(), 1);
    assert_eq!(button_attr(&window, "type").as_deref(), Some("menu-button"));
    assert_eq!(button_attr(&window, "enabled").as_deref(), Some("yes"));
    assert_eq!(
        button_attr(&window, "tooltiptext").as_deref(),
        Some("ReDisposition: GB18030")
    );
    assert_eq!(
        menu_labels(&window),
        ["UTF-8", "GB18030", "BIG5", "inline", "Preferences"]
    );
    assert_eq!(
        window.borrow().parent_id(BUTTON_ID).as_deref(),
        Some("nav-bar")
    );
}

#[test]
fn attach_twice_is_a_no_op() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");
    ui.attach(&handle(&window), &settings(false, ""));
    ui.attach(&handle(&window), &settings(false, ""));
    assert_eq!(ui.widget_count(), 1);
}

#[test]
fn non_browser_windows_are_skipped() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_window_at("chrome://global/content/console.xul");
    let mut ui = UiController::new("about:addons");
    ui.attach(&handle(&window), &settings(false, ""));
    assert_eq!(ui.widget_count(), 0);
    assert_eq!(window.borrow().element_by_id(BUTTON_ID), None);
}

#[test]
fn broken_window_does_not_block_others() {
    let registry = HeadlessRegistry::new();
    let broken = registry.open_browser_window();
    broken.borrow_mut().break_document();
    let ok = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");

    let s = settings(false, "");
    ui.attach(&handle(&broken), &s);
    ui.attach(&handle(&ok), &s);

    assert_eq!(ui.widget_count(), 1);
    assert!(ui.is_attached(ok.borrow().id()));
}

#[test]
fn refresh_updates_every_window_and_prunes_closed() {
    let registry = HeadlessRegistry::new();
    let a = registry.open_browser_window();
    let b = registry.open_browser_window();
    let c = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");
    for w in [&a, &b, &c] {
        ui.attach(&handle(w), &settings(false, "BIG5"));
    }
    let c_id = c.borrow().id();
    registry.close_window(c_id);

    let updated = Settings::new(
        false,
        true,
        "EUC-KR",
        EncodingCatalog::from_pref("EUC-KR"),
    );
    ui.refresh_all(&updated);

    assert_eq!(ui.widget_count(), 2);
    for w in [&a, &b] {
        assert_eq!(button_attr(w, "enabled").as_deref(), Some("yes"));
        assert_eq!(menu_labels(w), ["UTF-8", "EUC-KR", "inline", "Preferences"]);
    }
}

#[test]
fn repeated_refresh_does_not_grow_document() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");
    ui.attach(&handle(&window), &settings(true, "BIG5"));
    ui.refresh_all(&settings(false, "BIG5"));
    let slots = window.borrow().node_slots();

    for i in 0..200 {
        ui.refresh_all(&settings(i % 2 == 0, "BIG5"));
    }
    assert_eq!(window.borrow().node_slots(), slots);
    assert_eq!(
        menu_labels(&window),
        ["UTF-8", "GB18030", "BIG5", "inline", "Preferences"]
    );
}

#[test]
fn dropped_window_is_pruned() {
    let registry = HeadlessRegistry::new();
    let mut ui = UiController::new("about:addons");
    {
        let window = registry.open_browser_window();
        ui.attach(&handle(&window), &settings(false, ""));
        let id = window.borrow().id();
        registry.close_window(id);
    }
    ui.refresh_all(&settings(false, ""));
    assert_eq!(ui.widget_count(), 0);
}

#[test]
fn detach_removes_button() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");
    ui.attach(&handle(&window), &settings(false, ""));

    let id = window.borrow().id();
    ui.detach(id);
    assert_eq!(ui.widget_count(), 0);
    assert_eq!(window.borrow().element_by_id(BUTTON_ID), None);
    ui.detach(id);
}

#[test]
fn preferences_open_in_requesting_window() {
    let registry = HeadlessRegistry::new();
    let window = registry.open_browser_window();
    let mut ui = UiController::new("about:addons");
    ui.attach(&handle(&window), &settings(false, ""));

    let id = window.borrow().id();
    ui.open_preferences(id);
    assert_eq!(window.borrow().dialogs(), ["about:addons"]);
}
