//! Wire protocol between the tray controller and the renderer process.
//!
//! The renderer reads one JSON object per line on stdin ([`Action`]s) and
//! writes one JSON object per line on stdout ([`Event`]s). Both unions are
//! tagged by a `type` field.

pub mod action;
pub mod codec;
pub mod event;
pub mod menu;

// Re-export primary types for convenience.
pub use action::{Action, SeqId};
pub use codec::{
    DecodeError, decode_action, decode_event, decode_event_bytes, encode_action, encode_event,
    encode_menu,
};
pub use event::{ClickEvent, Event};
pub use menu::{CHECKED_MARKER, Menu, MenuItem, Platform, render_checked};
