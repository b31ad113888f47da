//! Renderer write pump: serialises outbound lines onto stdin.

use std::sync::Arc;

use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio_util::codec::LinesCodecError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use crate::error::ProcessError;
use crate::observers::Observers;

/// Writes queued lines to the renderer, one at a time, in queue order.
///
/// Stops on cancellation, when every sender is dropped, or on the first
/// write failure. Closes the sink on the way out so the renderer sees EOF.
pub(crate) async fn write_pump<S>(
    mut write: S,
    mut write_rx: mpsc::UnboundedReceiver<String>,
    errors: Arc<Observers<ProcessError>>,
    cancel: CancellationToken,
) where
    S: Sink<String, Error = LinesCodecError> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = write_rx.recv() => {
                match line {
                    Some(line) => {
                        trace!(len = line.len(), "writing line to renderer");
                        if let Err(e) = write.send(line).await {
                            error!("renderer write error: {e}");
                            errors.emit(ProcessError::Write(Arc::new(e)));
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    if let Err(e) = write.close().await {
        debug!("closing renderer input failed: {e}");
    }
}
