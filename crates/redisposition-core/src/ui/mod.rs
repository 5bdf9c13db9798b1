//! Toolbar UI: one button with an encoding menu per browser window.
//!
//! The controller keeps a weak `(widget, window)` pair per window it decorated.
//! Windows belong to the host; entries whose window was dropped or closed are
//! pruned on the next refresh.

mod action;
mod layout;
mod widget;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::{HostError, NodeId, Window, WindowHandle, WindowId, BROWSER_URI};
use crate::settings::Settings;

pub use action::UserAction;
pub use layout::Placement;
pub use widget::{
    menu_entries, state_attributes, tooltip, MenuEntry, BUTTON_ID, PREFERENCES_ITEM_ID,
};

struct Widget {
    window_id: WindowId,
    window: Weak<RefCell<dyn Window>>,
    button: NodeId,
    popup: NodeId,
}

pub struct UiController {
    widgets: Vec<Widget>,
    preferences_uri: String,
}

impl UiController {
    pub fn new(preferences_uri: impl Into<String>) -> Self {
        Self {
            widgets: Vec::new(),
            preferences_uri: preferences_uri.into(),
        }
    }

    /// Number of windows currently carrying a widget.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_attached(&self, id: WindowId) -> bool {
        self.widgets.iter().any(|w| w.window_id == id)
    }

    /// Builds the button and menu in `handle` and remembers the pair.
    ///
    /// Non-browser windows are ignored. A failure leaves that one window
    /// without a button.
    pub fn attach(&mut self, handle: &WindowHandle, settings: &Settings) {
        let mut window = handle.borrow_mut();
        let id = window.id();
        if window.location() != BROWSER_URI || self.is_attached(id) {
            return;
        }
        match build_widget(&mut *window, settings) {
            Ok((button, popup, placement)) => {
                tracing::debug!("toolbar button added to window {} ({:?})", id, placement);
                self.widgets.push(Widget {
                    window_id: id,
                    window: Rc::downgrade(handle),
                    button,
                    popup,
                });
            }
            Err(e) => tracing::warn!("could not add toolbar button to window {}: {}", id, e),
        }
    }

    /// Removes the widget from window `id`, if it has one.
    pub fn detach(&mut self, id: WindowId) {
        let Some(pos) = self.widgets.iter().position(|w| w.window_id == id) else {
            return;
        };
        let widget = self.widgets.remove(pos);
        remove_widget(&widget);
    }

    /// Removes every widget.
    pub fn detach_all(&mut self) {
        for widget in self.widgets.drain(..) {
            remove_widget(&widget);
        }
    }

    /// Rebuilds every live window's menu and updates its button from `settings`.
    pub fn refresh_all(&mut self, settings: &Settings) {
        self.widgets.retain(|w| match w.window.upgrade() {
            Some(window) => !window.borrow().is_closed(),
            None => false,
        });
        for widget in &self.widgets {
            let Some(window) = widget.window.upgrade() else {
                continue;
            };
            let mut window = window.borrow_mut();
            if let Err(e) = refresh_widget(&mut *window, widget, settings) {
                tracing::warn!("could not refresh window {}: {}", widget.window_id, e);
            }
        }
    }

    /// Opens the preferences page from window `id`.
    pub fn open_preferences(&self, id: WindowId) {
        let Some(window) = self
            .widgets
            .iter()
            .find(|w| w.window_id == id)
            .and_then(|w| w.window.upgrade())
        else {
            tracing::debug!("preferences requested from unknown window {}", id);
            return;
        };
        let result = window.borrow_mut().open_dialog(&self.preferences_uri);
        if let Err(e) = result {
            tracing::warn!("could not open preferences: {}", e);
        }
    }
}

fn build_widget(
    window: &mut dyn Window,
    settings: &Settings,
) -> Result<(NodeId, NodeId, Placement), HostError> {
    let button = widget::create_button(window, settings)?;
    let placement = layout::place_button(window, button, settings.first_run())?;
    let popup = window.create_element("menupopup")?;
    widget::fill_menu(window, popup, settings)?;
    window.append_child(button, popup)?;
    Ok((button, popup, placement))
}

fn refresh_widget(
    window: &mut dyn Window,
    widget: &Widget,
    settings: &Settings,
) -> Result<(), HostError> {
    widget::fill_menu(window, widget.popup, settings)?;
    widget::apply_attributes(window, widget.button, &widget::state_attributes(settings))
}

fn remove_widget(widget: &Widget) {
    let Some(window) = widget.window.upgrade() else {
        return;
    };
    let mut window = window.borrow_mut();
    if window.is_closed() {
        return;
    }
    let node = window.element_by_id(BUTTON_ID).unwrap_or(widget.button);
    if let Err(e) = window.remove_element(node) {
        tracing::warn!("could not remove toolbar button from window {}: {}", widget.window_id, e);
    }
}

#[cfg(test)]
mod tests;
