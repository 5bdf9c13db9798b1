//! Toolbar button and menu construction.

use crate::disposition::{Mode, INLINE};
use crate::host::{HostError, NodeId, Window};
use crate::settings::Settings;

pub const BUTTON_ID: &str = "redisposition-button";
pub const PREFERENCES_ITEM_ID: &str = "redisposition-preferences";
const ENCODING_GROUP: &str = "redisposition-encoding";
const LABEL: &str = "ReDisposition";

/// One entry of the button's dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Radio item selecting an encoding or `inline`.
    Encoding { name: String, checked: bool },
    Separator,
    Preferences,
}

/// Menu for the current settings: every catalog entry, `inline`, then Preferences.
pub fn menu_entries(settings: &Settings) -> Vec<MenuEntry> {
    let current = settings.current_encoding();
    let mut entries: Vec<MenuEntry> = settings
        .catalog()
        .entries()
        .iter()
        .map(|name| MenuEntry::Encoding {
            name: name.clone(),
            checked: name == current,
        })
        .collect();
    entries.push(MenuEntry::Encoding {
        name: INLINE.to_string(),
        checked: current == INLINE,
    });
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::Preferences);
    entries
}

/// Tooltip text describing the mode.
pub fn tooltip(mode: &Mode) -> String {
    format!("{LABEL}: {mode}")
}

/// Attributes that track settings; reapplied on every refresh.
pub fn state_attributes(settings: &Settings) -> Vec<(&'static str, String)> {
    vec![
        ("enabled", yes_no(settings.activated()).to_string()),
        ("checked", settings.mode().is_active().to_string()),
        ("tooltiptext", tooltip(settings.mode())),
    ]
}

fn button_attributes(settings: &Settings) -> Vec<(&'static str, String)> {
    let mut attrs = vec![
        ("id", BUTTON_ID.to_string()),
        ("class", "toolbarbutton-1 chromeclass-toolbar-additional".to_string()),
        ("type", "menu-button".to_string()),
        ("removable", "true".to_string()),
        ("label", LABEL.to_string()),
    ];
    attrs.extend(state_attributes(settings));
    attrs
}

fn entry_element(entry: &MenuEntry) -> (&'static str, Vec<(&'static str, String)>) {
    match entry {
        MenuEntry::Encoding { name, checked } => (
            "menuitem",
            vec![
                ("value", name.clone()),
                ("label", name.clone()),
                ("checked", checked.to_string()),
                ("name", ENCODING_GROUP.to_string()),
                ("type", "radio".to_string()),
            ],
        ),
        MenuEntry::Separator => ("menuseparator", Vec::new()),
        MenuEntry::Preferences => (
            "menuitem",
            vec![
                ("id", PREFERENCES_ITEM_ID.to_string()),
                ("label", "Preferences".to_string()),
            ],
        ),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn apply_attributes(
    window: &mut dyn Window,
    node: NodeId,
    attrs: &[(&str, String)],
) -> Result<(), HostError> {
    for (name, value) in attrs {
        window.set_attribute(node, name, value)?;
    }
    Ok(())
}

/// Creates the (unplaced) toolbar button.
pub(crate) fn create_button(
    window: &mut dyn Window,
    settings: &Settings,
) -> Result<NodeId, HostError> {
    let button = window.create_element("toolbarbutton")?;
    apply_attributes(window, button, &button_attributes(settings))?;
    Ok(button)
}

/// Replaces the contents of `popup` with the menu for `settings`.
pub(crate) fn fill_menu(
    window: &mut dyn Window,
    popup: NodeId,
    settings: &Settings,
) -> Result<(), HostError> {
    window.remove_children(popup)?;
    for entry in menu_entries(settings) {
        let (tag, attrs) = entry_element(&entry);
        let item = window.create_element(tag)?;
        apply_attributes(window, item, &attrs)?;
        window.append_child(popup, item)?;
    }
    Ok(())
}
