//! Error types for the renderer process session.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::codec::LinesCodecError;

/// Errors produced by a [`ProcessSession`](crate::ProcessSession).
///
/// Cloneable so one error can be fanned out to every error observer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn renderer {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("renderer did not expose its {0} pipe")]
    MissingPipe(&'static str),

    #[error("failed to read from renderer: {0}")]
    Read(#[source] Arc<io::Error>),

    #[error("failed to write to renderer: {0}")]
    Write(#[source] Arc<LinesCodecError>),

    #[error("failed to wait for renderer exit: {0}")]
    Wait(#[source] Arc<io::Error>),

    #[error("renderer input is closed")]
    Closed,
}

impl ProcessError {
    pub(crate) fn spawn(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProcessError::Spawn {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Failure reading the renderer's output stream.
    pub fn read(source: io::Error) -> Self {
        ProcessError::Read(Arc::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_names_path() {
        let err = ProcessError::spawn(
            "/opt/tray/tray_linux_release",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/opt/tray/tray_linux_release"));
        assert!(msg.contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn read_error_keeps_source() {
        let err = ProcessError::read(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(matches!(err, ProcessError::Read(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
