//! Construction-time configuration.

use std::path::PathBuf;

use tracing::Dispatch;
use traybridge_binary::{CopyDir, RendererOptions, RendererTarget};
use traybridge_protocol::{Menu, Platform, SeqId};

/// `seq_id` carried by the tagged bootstrap message.
pub const BOOTSTRAP_SEQ_ID: SeqId = -1;

/// Shape of the initial menu message sent after `ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bootstrap {
    /// `{"type":"update-menu","menu":…,"seq_id":-1}`, like every later update.
    #[default]
    Tagged,
    /// The bare menu object, for renderers built against the untagged
    /// bootstrap.
    LegacyRawMenu,
}

/// Configuration for a [`SysTray`](crate::SysTray).
#[derive(Debug, Clone)]
pub struct Conf {
    /// Initial menu, pushed once the renderer reports ready.
    pub menu: Menu,
    /// Use the debug renderer build, log every wire line and capture the
    /// renderer's stderr.
    pub debug: bool,
    /// Copy the renderer into a cache directory before launching it.
    pub copy_dir: CopyDir,
    /// Extra directory searched first for the renderer.
    pub bin_dir: Option<PathBuf>,
    /// Platform whose checked-marker rule applies.
    pub platform: Platform,
    pub bootstrap: Bootstrap,
    /// Where this tray's diagnostics go. `None` uses the global subscriber.
    pub log_dispatch: Option<Dispatch>,
}

impl Conf {
    pub fn new(menu: Menu) -> Self {
        Self {
            menu,
            debug: false,
            copy_dir: CopyDir::Disabled,
            bin_dir: None,
            platform: Platform::current(),
            bootstrap: Bootstrap::default(),
            log_dispatch: None,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_copy_dir(mut self, copy_dir: CopyDir) -> Self {
        self.copy_dir = copy_dir;
        self
    }

    pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(dir.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_log_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.log_dispatch = Some(dispatch);
        self
    }

    /// Options for locating the renderer on this host.
    pub fn renderer_options(&self) -> RendererOptions {
        RendererOptions {
            target: RendererTarget::detect(),
            debug: self.debug,
            bin_dir: self.bin_dir.clone(),
            copy_dir: self.copy_dir.clone(),
        }
    }
}
