//! Error types for renderer binary resolution.

use std::io;
use std::path::PathBuf;

/// Errors produced while selecting or preparing the renderer binary.
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    #[error("no tray renderer for platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("tray renderer {name} not found (searched {} locations)", searched.len())]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("failed to cache renderer at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
