//! Renderer process session.
//!
//! A session owns the renderer child process and its two pipes. Outbound
//! lines are queued on an unbounded channel and written by a single write
//! pump, so writes never block the caller and keep their issue order. The
//! channel is also where bounded queueing would go: with no bound, a caller
//! that outpaces the renderer grows this queue (and the OS pipe buffer)
//! without limit.
//!
//! Inbound lines are handed back to the caller as a [`LineStream`]; the
//! session does not interpret them, not even as UTF-8.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{Dispatch, debug, info, warn};

use crate::codec::RawLineCodec;
use crate::error::ProcessError;
use crate::exit::ExitInfo;
use crate::observers::{ObserverId, Observers, Replay};
use crate::pumps::{stderr::stderr_pump, wait::wait_pump, write::write_pump};
use crate::task::{in_scope, spawn_logged};

/// Longest inbound line accepted (16 MB). Icons travel inline, so menus
/// can be large.
pub const MAX_LINE_LENGTH: usize = 16 * 1024 * 1024;

/// Boxed reader behind a [`LineStream`].
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Inbound renderer output split into raw lines, without terminators.
pub type LineStream = FramedRead<BoxedReader, RawLineCodec>;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// How to launch the renderer.
#[derive(Debug, Clone, Default)]
pub struct SpawnConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Pipe the renderer's stderr into the log instead of discarding it.
    pub capture_stderr: bool,
    /// Dispatcher the session's background tasks log to.
    pub log_dispatch: Option<Dispatch>,
}

impl SpawnConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn capture_stderr(mut self, capture: bool) -> Self {
        self.capture_stderr = capture;
        self
    }

    pub fn log_dispatch(mut self, dispatch: Option<Dispatch>) -> Self {
        self.log_dispatch = dispatch;
        self
    }
}

/// A live connection to one renderer.
pub struct ProcessSession {
    write_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
    killed: Arc<AtomicBool>,
    pid: Option<u32>,
    has_child: bool,
    exits: Arc<Observers<ExitInfo>>,
    errors: Arc<Observers<ProcessError>>,
    log_dispatch: Option<Dispatch>,
}

impl ProcessSession {
    /// Launches the renderer and returns the session with its output lines.
    ///
    /// Never fails synchronously: a spawn failure is delivered to the error
    /// observers (buffered until one subscribes) and the returned line
    /// stream is empty. Must be called within a tokio runtime.
    pub fn spawn(config: &SpawnConfig) -> (Self, LineStream) {
        in_scope(config.log_dispatch.as_ref(), || Self::spawn_inner(config))
    }

    fn spawn_inner(config: &SpawnConfig) -> (Self, LineStream) {
        let dispatch = config.log_dispatch.as_ref();
        let exits = Arc::new(Observers::new(Replay::Latest));
        let errors = Arc::new(Observers::new(Replay::Buffered));
        let killed = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();
        let (write_tx, write_rx) = mpsc::unbounded_channel();

        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(if config.capture_stderr {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let mut session = Self {
            write_tx,
            cancel: cancel.clone(),
            killed: killed.clone(),
            pid: None,
            has_child: false,
            exits: exits.clone(),
            errors: errors.clone(),
            log_dispatch: config.log_dispatch.clone(),
        };

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(path = %config.program.display(), "failed to spawn renderer: {e}");
                errors.emit(ProcessError::spawn(&config.program, e));
                return (session, empty_lines());
            }
        };

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            errors.emit(ProcessError::MissingPipe("stdin/stdout"));
            // Dropping the child kills it (kill_on_drop).
            return (session, empty_lines());
        };

        session.pid = child.id();
        session.has_child = true;
        info!(pid = ?session.pid, path = %config.program.display(), "renderer started");

        let exited = cancel.child_token();
        spawn_logged(
            dispatch,
            write_pump(
                FramedWrite::new(stdin, LinesCodec::new()),
                write_rx,
                errors.clone(),
                exited.clone(),
            ),
        );
        if let Some(stderr) = child.stderr.take() {
            spawn_logged(
                dispatch,
                stderr_pump(
                    FramedRead::new(stderr, RawLineCodec::new_with_max_length(MAX_LINE_LENGTH)),
                    exited.clone(),
                ),
            );
        }
        spawn_logged(
            dispatch,
            wait_pump(child, killed, exits, errors, cancel, exited),
        );

        (session, line_stream(Box::new(stdout)))
    }

    /// Builds a session over arbitrary byte streams, with no child process.
    ///
    /// `reader` plays the renderer's stdout and `writer` its stdin. Background
    /// logging goes to `log_dispatch` when given. Must be called within a
    /// tokio runtime.
    pub fn from_io<R, W>(
        reader: R,
        writer: W,
        log_dispatch: Option<Dispatch>,
    ) -> (Self, LineStream)
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let errors = Arc::new(Observers::new(Replay::Buffered));
        let cancel = CancellationToken::new();
        let (write_tx, write_rx) = mpsc::unbounded_channel();

        spawn_logged(
            log_dispatch.as_ref(),
            write_pump(
                FramedWrite::new(writer, LinesCodec::new()),
                write_rx,
                errors.clone(),
                cancel.clone(),
            ),
        );

        let session = Self {
            write_tx,
            cancel,
            killed: Arc::new(AtomicBool::new(false)),
            pid: None,
            has_child: false,
            exits: Arc::new(Observers::new(Replay::Latest)),
            errors,
            log_dispatch,
        };
        (session, line_stream(Box::new(reader)))
    }

    /// Queues `text` for the renderer, trimmed and newline-terminated.
    ///
    /// Blank input writes nothing. Fire-and-forget: returns once queued.
    pub fn write_line(&self, text: &str) -> Result<(), ProcessError> {
        let line = text.trim();
        if line.is_empty() {
            return Ok(());
        }
        if self.is_killed() {
            return Err(ProcessError::Closed);
        }
        self.write_tx
            .send(line.to_string())
            .map_err(|_| ProcessError::Closed)
    }

    /// Terminates the renderer and releases the read side. Idempotent.
    pub fn kill(&self) {
        in_scope(self.log_dispatch.as_ref(), || {
            if !self.killed.swap(true, Ordering::SeqCst) {
                debug!(pid = ?self.pid, "killing renderer");
            }
            self.cancel.cancel();
        });
    }

    /// True once [`kill`](Self::kill) was called or the exit was observed.
    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    /// Cancelled when the session is torn down by [`kill`](Self::kill).
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether a child process was actually started.
    pub fn has_child(&self) -> bool {
        self.has_child
    }

    /// Observes the renderer's exit. Late observers get the recorded exit.
    pub fn on_exit<F>(&self, f: F) -> ObserverId
    where
        F: Fn(&ExitInfo) + Send + Sync + 'static,
    {
        self.exits.subscribe(f)
    }

    /// Observes the renderer's exit once.
    pub fn on_exit_once<F>(&self, f: F) -> ObserverId
    where
        F: FnOnce(&ExitInfo) + Send + 'static,
    {
        self.exits.subscribe_once(f)
    }

    /// Observes process-level errors such as spawn and pipe failures.
    pub fn on_error<F>(&self, f: F) -> ObserverId
    where
        F: Fn(&ProcessError) + Send + Sync + 'static,
    {
        self.errors.subscribe(f)
    }

    pub fn exit_observers(&self) -> &Observers<ExitInfo> {
        &self.exits
    }

    pub fn error_observers(&self) -> &Observers<ProcessError> {
        &self.errors
    }
}

fn line_stream(reader: BoxedReader) -> LineStream {
    FramedRead::new(reader, RawLineCodec::new_with_max_length(MAX_LINE_LENGTH))
}

fn empty_lines() -> LineStream {
    line_stream(Box::new(tokio::io::empty()))
}
