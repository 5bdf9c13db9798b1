//! User-driven toolbar events.

/// What the user did with a window's button or menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Clicked the button body: toggle activation.
    ToggleButton,
    /// Clicked the dropdown arrow: always activate.
    OpenMenu,
    /// Picked an encoding (or `inline`) from the menu.
    SelectEncoding(String),
    /// Picked the "Preferences" menu entry.
    OpenPreferences,
}
