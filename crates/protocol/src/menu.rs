//! Menu and menu item shapes, plus the checked-marker rule.
//!
//! Some tray backends have no native checkable menu items. On those
//! platforms a checked item is rendered by appending [`CHECKED_MARKER`] to
//! its title, and an unchecked item has that marker stripped again.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix appended to the title of a checked item on platforms that
/// emulate checkboxes.
pub const CHECKED_MARKER: &str = " (√)";

/// Host platform, as far as menu rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
    Other,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Whether the renderer on this platform lacks native checkable items.
    pub fn emulates_checkbox(self) -> bool {
        matches!(self, Platform::Linux)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// A single entry of the tray menu.
///
/// Items have no identifier of their own; they are addressed by their
/// position in [`Menu::items`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl MenuItem {
    /// Creates an enabled, unchecked item with no tooltip.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tooltip: String::new(),
            checked: false,
            enabled: true,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Applies the checked-marker rule to this item in place.
    ///
    /// Idempotent: a trailing marker is always stripped first, then
    /// re-appended only when the item is checked.
    pub fn apply_checked_marker(&mut self, platform: Platform) {
        if !platform.emulates_checkbox() {
            return;
        }
        if let Some(stripped) = self.title.strip_suffix(CHECKED_MARKER) {
            let len = stripped.len();
            self.title.truncate(len);
        }
        if self.checked {
            self.title.push_str(CHECKED_MARKER);
        }
    }

    /// Title with any trailing checked marker removed.
    pub fn plain_title(&self) -> &str {
        self.title
            .strip_suffix(CHECKED_MARKER)
            .unwrap_or(&self.title)
    }
}

/// The whole tray menu: icon, title, tooltip and ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Menu {
    /// Opaque icon reference (path or base64-encoded image), passed through
    /// to the renderer untouched.
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Applies the checked-marker rule to every item.
    pub fn apply_checked_marker(&mut self, platform: Platform) {
        for item in &mut self.items {
            item.apply_checked_marker(platform);
        }
    }
}

/// Returns a copy of `item` with the checked-marker rule applied.
pub fn render_checked(item: &MenuItem, platform: Platform) -> MenuItem {
    let mut rendered = item.clone();
    rendered.apply_checked_marker(platform);
    rendered
}

fn default_true() -> bool {
    true
}
