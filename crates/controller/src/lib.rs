//! Controller for an out-of-process system tray.
//!
//! A [`SysTray`] launches a small native renderer, waits for it to report
//! `ready`, pushes the initial [`Menu`], and from then on forwards
//! [`Action`]s to it as JSON lines. Clicks, readiness, exit and errors are
//! reported to listeners.
//!
//! ```no_run
//! use traybridge::{Conf, Menu, MenuItem, SysTray};
//!
//! # async fn run() -> Result<(), traybridge::TrayError> {
//! let menu = Menu {
//!     icon: String::new(),
//!     title: "Demo".into(),
//!     tooltip: "Demo tray".into(),
//!     items: vec![MenuItem::new("Quit")],
//! };
//! let tray = SysTray::new(Conf::new(menu))?;
//! let handle = tray.clone();
//! tray.on_click(move |click| {
//!     if click.item.plain_title() == "Quit" {
//!         handle.kill(true);
//!     }
//! });
//! # Ok(())
//! # }
//! ```

pub mod conf;
mod engine;
pub mod error;
mod pump;
pub mod tray;

pub use conf::{BOOTSTRAP_SEQ_ID, Bootstrap, Conf};
pub use engine::EngineState;
pub use error::TrayError;
pub use tray::{ListenerId, ListenerKind, SysTray};

pub use traybridge_binary::{BinaryError, CopyDir, RendererTarget};
pub use traybridge_process::{ExitInfo, ProcessError, SpawnConfig};
pub use traybridge_protocol::{
    Action, CHECKED_MARKER, ClickEvent, DecodeError, Event, Menu, MenuItem, Platform, SeqId,
    render_checked,
};
