//! Inbound notifications, renderer to controller.

use serde::{Deserialize, Serialize};

use crate::action::SeqId;
use crate::menu::MenuItem;

/// Tag values accepted on inbound lines.
pub const EVENT_TYPES: &[&str] = &["ready", "clicked"];

/// A user interaction reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// State of the clicked item as the renderer last knew it.
    pub item: MenuItem,
    pub seq_id: SeqId,
}

/// A notification from the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// Renderer finished initializing and accepts its first menu.
    Ready,
    /// A menu item was clicked.
    Clicked(ClickEvent),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Ready => "ready",
            Event::Clicked(_) => "clicked",
        }
    }
}
