//! Forwards renderer stderr into the log.

use std::io;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::RawLine;

/// Logs each stderr line of the renderer at debug level until EOF.
pub(crate) async fn stderr_pump<S>(mut lines: S, cancel: CancellationToken)
where
    S: Stream<Item = Result<RawLine, io::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next() => match line {
                Some(Ok(RawLine::Line(line))) => {
                    debug!(target: "traybridge::renderer", "{}", String::from_utf8_lossy(&line));
                }
                Some(Ok(RawLine::TooLong)) => {
                    debug!(target: "traybridge::renderer", "<over-long stderr line skipped>");
                }
                Some(Err(e)) => {
                    debug!("renderer stderr unreadable: {e}");
                    break;
                }
                None => break,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures_util::stream;

    #[tokio::test]
    async fn stderr_pump_ends_with_stream() {
        let lines = stream::iter(vec![
            Ok(RawLine::Line(Bytes::from_static(b"warning: no icon"))),
            Ok(RawLine::Line(Bytes::from_static(b"\xff\xfe"))),
            Ok(RawLine::TooLong),
            Ok(RawLine::Line(Bytes::new())),
        ]);
        tokio::time::timeout(
            std::time::Duration::from_secs(2),
            stderr_pump(lines, CancellationToken::new()),
        )
        .await
        .expect("should finish at end of stream");
    }
}
