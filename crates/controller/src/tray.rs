//! Public tray handle.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;
use traybridge_binary::resolve_renderer;
use traybridge_process::task::{in_scope, spawn_logged};
use traybridge_process::{ExitInfo, LineStream, ObserverId, ProcessSession, SpawnConfig};
use traybridge_protocol::{Action, ClickEvent, Menu, Platform};

use crate::conf::Conf;
use crate::engine::{Engine, EngineState};
use crate::error::TrayError;
use crate::pump::read_pump;

/// Which listener registry a [`ListenerId`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Ready,
    Click,
    Exit,
    Error,
}

/// Handle for removing a listener with [`SysTray::remove_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    kind: ListenerKind,
    id: ObserverId,
}

impl ListenerId {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Controller for one tray renderer process.
///
/// Cheap to clone; clones share the same renderer. Every method returns
/// immediately. Listeners run on the session's read task, one line at a
/// time and in arrival order.
#[derive(Clone)]
pub struct SysTray {
    engine: Arc<Engine>,
}

impl SysTray {
    /// Locates the renderer for this host and starts it.
    ///
    /// Fails only if no renderer can be selected or found. A renderer that
    /// is found but cannot be started is reported to the error listeners.
    /// Must be called within a tokio runtime.
    pub fn new(conf: Conf) -> Result<Self, TrayError> {
        let path = in_scope(conf.log_dispatch.as_ref(), || {
            resolve_renderer(&conf.renderer_options())
        })?;
        Ok(Self::with_executable(conf, path))
    }

    /// Starts the renderer at `path`, skipping discovery.
    pub fn with_executable(conf: Conf, path: impl AsRef<Path>) -> Self {
        let spawn = SpawnConfig::new(path.as_ref())
            .capture_stderr(conf.debug)
            .log_dispatch(conf.log_dispatch.clone());
        Self::with_spawn_config(conf, &spawn)
    }

    /// Starts the renderer described by `spawn`.
    pub fn with_spawn_config(conf: Conf, spawn: &SpawnConfig) -> Self {
        let (session, lines) = ProcessSession::spawn(spawn);
        Self::start(conf, session, lines)
    }

    /// Talks to a renderer over arbitrary byte streams instead of a child
    /// process. `reader` is the renderer's output, `writer` its input.
    pub fn with_io<R, W>(conf: Conf, reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let dispatch = conf.log_dispatch.clone();
        let (session, lines) = ProcessSession::from_io(reader, writer, dispatch);
        Self::start(conf, session, lines)
    }

    fn start(conf: Conf, session: ProcessSession, lines: LineStream) -> Self {
        let engine = Arc::new(Engine::new(conf, session));
        let cancel = engine.session.cancel_token();
        spawn_logged(
            engine.log_dispatch.as_ref(),
            read_pump(lines, engine.clone(), cancel),
        );
        engine.mark_awaiting_ready();
        Self { engine }
    }

    fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        in_scope(self.engine.log_dispatch.as_ref(), f)
    }

    /// Sends an action to the renderer.
    ///
    /// The checked-marker rule is applied to every contained item just
    /// before encoding. Actions issued before the renderer is ready are
    /// held and delivered, in order, right after the initial menu. A menu
    /// replaced before that point is only sent once, as the initial menu.
    pub fn send_action(&self, action: Action) -> Result<(), TrayError> {
        self.in_scope(|| self.engine.send_action(action))
    }

    /// Registers a listener for item clicks.
    pub fn on_click<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&ClickEvent) + Send + Sync + 'static,
    {
        ListenerId {
            kind: ListenerKind::Click,
            id: self.engine.clicked.subscribe(f),
        }
    }

    /// Registers a listener for renderer readiness. Runs immediately if
    /// the renderer is already ready.
    ///
    /// That immediate run happens on the calling thread, so it can overlap
    /// with a click listener running on the read task. Listeners that share
    /// state with click listeners must synchronize it.
    pub fn on_ready<F>(&self, f: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        ListenerId {
            kind: ListenerKind::Ready,
            id: self.engine.ready.subscribe(move |_| f()),
        }
    }

    /// Registers a listener for renderer exit. Runs immediately if the exit
    /// was already observed.
    pub fn on_exit<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&ExitInfo) + Send + Sync + 'static,
    {
        ListenerId {
            kind: ListenerKind::Exit,
            id: self.engine.session.on_exit(f),
        }
    }

    /// Registers a listener for process and protocol errors. Errors raised
    /// before the first error listener exists are delivered to it.
    pub fn on_error<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&TrayError) + Send + Sync + 'static,
    {
        ListenerId {
            kind: ListenerKind::Error,
            id: self.engine.errors.subscribe(f),
        }
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn remove_listener(&self, listener: ListenerId) -> bool {
        match listener.kind {
            ListenerKind::Ready => self.engine.ready.unsubscribe(listener.id),
            ListenerKind::Click => self.engine.clicked.unsubscribe(listener.id),
            ListenerKind::Exit => self.engine.session.exit_observers().unsubscribe(listener.id),
            ListenerKind::Error => self.engine.errors.unsubscribe(listener.id),
        }
    }

    /// Tears the session down: releases the read side and kills the
    /// renderer. With `exit_node`, the host process exits (code 0) once
    /// the renderer's exit is observed, or right away if no renderer
    /// process was ever started. Safe to call repeatedly.
    pub fn kill(&self, exit_node: bool) {
        self.in_scope(|| {
            self.engine.close();
            if exit_node {
                if self.engine.session.has_child() {
                    self.engine.session.on_exit_once(|exit| {
                        info!(%exit, "renderer gone, exiting host process");
                        std::process::exit(0);
                    });
                } else {
                    info!("no renderer process, exiting host process");
                    std::process::exit(0);
                }
            }
            self.engine.session.kill();
        });
    }

    /// True once `kill` was called or the renderer exit was observed.
    pub fn killed(&self) -> bool {
        self.engine.session.is_killed()
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Snapshot of the menu as last sent (or about to be sent).
    pub fn menu(&self) -> Menu {
        self.engine.menu()
    }

    pub fn platform(&self) -> Platform {
        self.engine.platform
    }

    /// Renderer process id, if a process is running.
    pub fn pid(&self) -> Option<u32> {
        self.engine.session.pid()
    }
}
