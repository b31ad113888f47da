//! Child-process session for the tray renderer.
//!
//! Spawns the renderer with piped stdin/stdout, writes newline-terminated
//! lines to it through a single write pump, hands its output back as a
//! stream of lines, and reports exit and process errors to observers.

pub mod codec;
pub mod error;
pub mod exit;
pub mod observers;
mod pumps;
pub mod session;
pub mod task;

pub use codec::{RawLine, RawLineCodec};
pub use error::ProcessError;
pub use exit::ExitInfo;
pub use observers::{ObserverId, Observers, Replay};
pub use session::{LineStream, MAX_LINE_LENGTH, ProcessSession, SpawnConfig};
