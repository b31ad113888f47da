//! Renderer read pump: decodes and dispatches inbound lines.

use std::io;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use traybridge_process::{ProcessError, RawLine};

use crate::engine::Engine;
use crate::error::TrayError;

/// Reads lines until the renderer closes its output, the stream fails,
/// or the session is cancelled.
///
/// Lines are handled one at a time, so listener invocations never overlap
/// and follow arrival order. A line that fails to decode (bad UTF-8,
/// over-long, bad JSON) is reported and skipped; only I/O failures end
/// the loop.
pub(crate) async fn read_pump<S>(mut lines: S, engine: Arc<Engine>, cancel: CancellationToken)
where
    S: Stream<Item = Result<RawLine, io::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("read side released");
                break;
            }
            line = lines.next() => {
                match line {
                    Some(Ok(line)) => engine.handle_raw(line),
                    Some(Err(e)) => {
                        warn!("renderer read error: {e}");
                        engine.errors.emit(TrayError::Process(ProcessError::read(e)));
                        break;
                    }
                    None => {
                        debug!("renderer output closed");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use bytes::Bytes;
    use futures_util::stream;
    use traybridge_process::ProcessSession;
    use traybridge_protocol::{DecodeError, Menu, MenuItem, Platform};

    use crate::conf::Conf;
    use crate::engine::EngineState;

    fn engine() -> (Arc<Engine>, tokio::io::DuplexStream) {
        let (input, _) = tokio::io::duplex(64);
        let (output, renderer_in) = tokio::io::duplex(64 * 1024);
        let (session, _lines) = ProcessSession::from_io(input, output, None);
        let menu = Menu {
            items: vec![MenuItem::new("A")],
            ..Menu::default()
        };
        let conf = Conf::new(menu).with_platform(Platform::Linux);
        (Arc::new(Engine::new(conf, session)), renderer_in)
    }

    fn line(s: &'static [u8]) -> io::Result<RawLine> {
        Ok(RawLine::Line(Bytes::from_static(s)))
    }

    fn collect_errors(engine: &Engine) -> Arc<Mutex<Vec<TrayError>>> {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = errors.clone();
        engine.errors.subscribe(move |err| e.lock().unwrap().push(err.clone()));
        errors
    }

    #[tokio::test]
    async fn over_long_and_non_utf8_lines_do_not_stop_reading() {
        let (engine, _renderer_in) = engine();
        engine.mark_awaiting_ready();
        let errors = collect_errors(&engine);

        let lines = stream::iter(vec![
            Ok(RawLine::TooLong),
            line(b"\xff\xfe garbage"),
            line(br#"{"type":"ready"}"#),
        ]);
        read_pump(lines, engine.clone(), CancellationToken::new()).await;

        assert_eq!(engine.state(), EngineState::Ready);
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            TrayError::Decode(DecodeError::LineTooLong { .. })
        ));
        assert!(matches!(
            errors[1],
            TrayError::Decode(DecodeError::InvalidUtf8 { .. })
        ));
    }

    #[tokio::test]
    async fn io_error_ends_the_loop() {
        let (engine, _renderer_in) = engine();
        engine.mark_awaiting_ready();
        let errors = collect_errors(&engine);

        let lines = stream::iter(vec![
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")),
            line(br#"{"type":"ready"}"#),
        ]);
        read_pump(lines, engine.clone(), CancellationToken::new()).await;

        assert_eq!(engine.state(), EngineState::AwaitingReady);
        assert!(matches!(
            errors.lock().unwrap()[0],
            TrayError::Process(ProcessError::Read(_))
        ));
    }
}
