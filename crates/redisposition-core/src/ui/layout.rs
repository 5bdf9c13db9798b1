//! Toolbar placement that remembers where the user put the button.

use crate::host::{HostError, NodeId, Window};

use super::widget::BUTTON_ID;

const DEFAULT_TOOLBAR: &str = "nav-bar";
const CURRENT_SET: &str = "currentset";
const EMPTY_SET: &str = "__empty";

/// Where [`place_button`] put the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Toolbar(NodeId),
    /// Only in the customization palette (the user removed it from toolbars).
    Palette,
}

/// Adds `button` to the palette, then into the toolbar whose saved layout lists
/// it (before the next listed item that exists). With no such toolbar the
/// button goes to the navigation bar on first run, and stays in the palette
/// otherwise. A toolbar that did not list the button yet gets its new layout
/// saved and persisted.
pub(crate) fn place_button(
    window: &mut dyn Window,
    button: NodeId,
    first_run: bool,
) -> Result<Placement, HostError> {
    let palette = window.palette()?;
    window.append_child(palette, button)?;

    let saved_container = window
        .toolbars()
        .into_iter()
        .filter(|toolbar| saved_ids(&*window, *toolbar).iter().any(|id| id == BUTTON_ID))
        .last();

    let container = match saved_container {
        Some(toolbar) => toolbar,
        None if first_run => window
            .element_by_id(DEFAULT_TOOLBAR)
            .ok_or_else(|| HostError::NoSuchElement(DEFAULT_TOOLBAR.to_string()))?,
        None => return Ok(Placement::Palette),
    };

    let ids = saved_ids(&*window, container);
    let position = ids.iter().position(|id| id == BUTTON_ID);
    let next = position.and_then(|idx| {
        ids[idx + 1..]
            .iter()
            .find_map(|id| window.element_by_id(id))
    });
    window.insert_toolbar_item(container, button, next)?;

    if position.is_none() {
        let layout = window.live_toolbar_set(container);
        window.set_attribute(container, CURRENT_SET, &layout)?;
        window.persist_attribute(container, CURRENT_SET)?;
    }
    Ok(Placement::Toolbar(container))
}

fn saved_ids(window: &dyn Window, toolbar: NodeId) -> Vec<String> {
    match window.attribute(toolbar, CURRENT_SET) {
        Some(set) if !set.is_empty() && set != EMPTY_SET => {
            set.split(',').map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}
