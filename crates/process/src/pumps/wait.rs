//! Waits for the renderer to exit and reports how it went.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::process::Child;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ProcessError;
use crate::exit::ExitInfo;
use crate::observers::Observers;

/// Owns the child until it exits.
///
/// `kill` requests termination. Once the exit is observed, `exited` is
/// cancelled (which stops the write pump) and the exit observers fire.
pub(crate) async fn wait_pump(
    mut child: Child,
    killed: Arc<AtomicBool>,
    exits: Arc<Observers<ExitInfo>>,
    errors: Arc<Observers<ProcessError>>,
    kill: CancellationToken,
    exited: CancellationToken,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill.cancelled() => {
            if let Err(e) = child.start_kill() {
                debug!("renderer already gone: {e}");
            }
            child.wait().await
        }
    };

    killed.store(true, Ordering::SeqCst);
    exited.cancel();

    let info = match status {
        Ok(status) => ExitInfo::from(status),
        Err(e) => {
            warn!("could not collect renderer exit status: {e}");
            errors.emit(ProcessError::Wait(Arc::new(e)));
            ExitInfo::default()
        }
    };
    info!(code = ?info.code, signal = ?info.signal, "renderer exited");
    exits.emit(info);
}
