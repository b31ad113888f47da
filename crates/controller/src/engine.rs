//! Controller state shared between the public handle and the read pump.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{Dispatch, debug, info, trace, warn};
use traybridge_process::{
    MAX_LINE_LENGTH, Observers, ProcessError, ProcessSession, RawLine, Replay,
};
use traybridge_protocol::{
    Action, ClickEvent, DecodeError, Event, Menu, Platform, decode_event_bytes, encode_action,
    encode_menu,
};

use crate::conf::{BOOTSTRAP_SEQ_ID, Bootstrap, Conf};
use crate::error::TrayError;

/// Lifecycle of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Session being set up.
    Starting,
    /// Renderer launched; waiting for its `ready` event.
    AwaitingReady,
    /// Initial menu delivered; actions go straight to the renderer.
    Ready,
    /// Torn down, by `kill` or because the renderer exited.
    Killed,
}

struct Gate {
    state: EngineState,
    /// Encoded actions issued before `ready`, flushed after the bootstrap.
    deferred: Vec<String>,
}

pub(crate) struct Engine {
    pub(crate) session: ProcessSession,
    pub(crate) platform: Platform,
    pub(crate) debug: bool,
    pub(crate) log_dispatch: Option<Dispatch>,
    bootstrap: Bootstrap,
    gate: Mutex<Gate>,
    menu: Mutex<Menu>,
    pub(crate) ready: Observers<()>,
    pub(crate) clicked: Observers<ClickEvent>,
    pub(crate) errors: Arc<Observers<TrayError>>,
}

impl Engine {
    /// Wraps a freshly started session. The initial menu gets the
    /// checked-marker rule here, once, before anything is sent.
    pub(crate) fn new(conf: Conf, session: ProcessSession) -> Self {
        let mut menu = conf.menu;
        menu.apply_checked_marker(conf.platform);

        let errors = Arc::new(Observers::new(Replay::Buffered));
        let forward = errors.clone();
        session.on_error(move |e: &ProcessError| {
            forward.emit(TrayError::Process(e.clone()));
        });

        Self {
            session,
            platform: conf.platform,
            debug: conf.debug,
            log_dispatch: conf.log_dispatch,
            bootstrap: conf.bootstrap,
            gate: Mutex::new(Gate {
                state: EngineState::Starting,
                deferred: Vec::new(),
            }),
            menu: Mutex::new(menu),
            ready: Observers::new(Replay::Latest),
            clicked: Observers::new(Replay::Never),
            errors,
        }
    }

    fn gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn menu_guard(&self) -> MutexGuard<'_, Menu> {
        self.menu.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn mark_awaiting_ready(&self) {
        let mut gate = self.gate();
        if gate.state == EngineState::Starting {
            gate.state = EngineState::AwaitingReady;
        }
    }

    pub(crate) fn state(&self) -> EngineState {
        if self.session.is_killed() {
            return EngineState::Killed;
        }
        self.gate().state
    }

    pub(crate) fn menu(&self) -> Menu {
        self.menu_guard().clone()
    }

    /// Applies the marker rule, encodes and writes (or defers) an action.
    ///
    /// Before `ready`, a menu-carrying action supersedes everything deferred
    /// so far, and its menu goes out with the bootstrap line instead of
    /// being sent twice.
    pub(crate) fn send_action(&self, mut action: Action) -> Result<(), TrayError> {
        action.apply_checked_marker(self.platform);
        let line = encode_action(&action)?;

        if let Some(menu) = action.menu() {
            *self.menu_guard() = menu.clone();
        }
        if self.debug {
            debug!(kind = action.kind(), seq_id = action.seq_id(), line = line.trim_end(), "sending action");
        } else {
            trace!(kind = action.kind(), seq_id = action.seq_id(), "sending action");
        }

        let mut gate = self.gate();
        match gate.state {
            EngineState::Starting | EngineState::AwaitingReady => {
                match action {
                    Action::UpdateItem { .. } => gate.deferred.push(line),
                    Action::UpdateMenu { .. } => gate.deferred.clear(),
                    Action::UpdateMenuAndItem { item, seq_id, .. } => {
                        gate.deferred.clear();
                        gate.deferred.push(encode_action(&Action::UpdateItem { item, seq_id })?);
                    }
                }
                trace!(queued = gate.deferred.len(), "renderer not ready, deferring action");
                Ok(())
            }
            EngineState::Ready => Ok(self.session.write_line(&line)?),
            EngineState::Killed => Err(ProcessError::Closed.into()),
        }
    }

    /// Dispatches one framed unit of renderer output.
    pub(crate) fn handle_raw(&self, raw: RawLine) {
        match raw {
            RawLine::Line(line) => self.handle_line(&line),
            RawLine::TooLong => {
                warn!(limit = MAX_LINE_LENGTH, "over-long line from renderer skipped");
                self.errors.emit(TrayError::Decode(DecodeError::LineTooLong {
                    limit: MAX_LINE_LENGTH,
                }));
            }
        }
    }

    /// Decodes one inbound line and dispatches the event.
    pub(crate) fn handle_line(&self, line: &[u8]) {
        if line.iter().all(u8::is_ascii_whitespace) {
            trace!("skipping blank line from renderer");
            return;
        }
        if self.debug {
            debug!(line = %String::from_utf8_lossy(line), "received line");
        }

        match decode_event_bytes(line) {
            Ok(Event::Ready) => self.handle_ready(),
            Ok(Event::Clicked(click)) => {
                debug!(seq_id = click.seq_id, title = %click.item.title, "item clicked");
                if self.clicked.emit(click) == 0 {
                    trace!("no click listeners registered");
                }
            }
            Err(e) => {
                warn!("undecodable line from renderer: {e}");
                self.errors.emit(TrayError::Decode(e));
            }
        }
    }

    /// Sends the initial menu, flushes deferred actions, then fires the
    /// ready listeners. Only the first `ready` counts.
    fn handle_ready(&self) {
        let mut failures = Vec::new();
        {
            let mut gate = self.gate();
            match gate.state {
                EngineState::Starting | EngineState::AwaitingReady => {}
                EngineState::Ready => {
                    warn!("duplicate ready event ignored");
                    return;
                }
                EngineState::Killed => {
                    debug!("ready after kill ignored");
                    return;
                }
            }

            match self.bootstrap_line() {
                Ok(line) => {
                    if let Err(e) = self.session.write_line(&line) {
                        failures.push(TrayError::from(e));
                    }
                }
                Err(e) => failures.push(e),
            }
            for line in gate.deferred.drain(..) {
                if let Err(e) = self.session.write_line(&line) {
                    failures.push(TrayError::from(e));
                }
            }
            gate.state = EngineState::Ready;
        }

        for e in failures {
            self.errors.emit(e);
        }
        info!("renderer ready");
        self.ready.emit(());
    }

    fn bootstrap_line(&self) -> Result<String, TrayError> {
        let mut menu = self.menu();
        menu.apply_checked_marker(self.platform);
        let line = match self.bootstrap {
            Bootstrap::Tagged => encode_action(&Action::UpdateMenu {
                menu,
                seq_id: BOOTSTRAP_SEQ_ID,
            })?,
            Bootstrap::LegacyRawMenu => encode_menu(&menu)?,
        };
        Ok(line)
    }

    /// Stops accepting actions. The session itself is killed by the caller.
    pub(crate) fn close(&self) {
        let mut gate = self.gate();
        gate.state = EngineState::Killed;
        gate.deferred.clear();
    }
}
