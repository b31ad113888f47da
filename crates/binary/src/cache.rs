//! Versioned cache copy of the renderer.
//!
//! Some install locations are not executable in place (read-only or
//! `noexec` mounts, app bundles). Copying the renderer into a per-user
//! cache directory keyed by crate version works around that.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BinaryError;

/// Version component of the cache path.
pub const CACHE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the platform-specific cache root.
///
/// - Linux/macOS: `$XDG_CACHE_HOME/traybridge` or `~/.cache/traybridge`
/// - Windows: `%LOCALAPPDATA%\traybridge`
pub fn default_cache_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let local = std::env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| "C:\\Users\\Default\\AppData\\Local".into());
        PathBuf::from(local).join("traybridge")
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg).join("traybridge");
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".cache").join("traybridge")
    }
}

/// Copies `src` to `<root>/<version>/<file name>` unless it is already
/// there, and returns the cached path.
pub fn copy_to_cache(src: &Path, root: &Path) -> Result<PathBuf, BinaryError> {
    let dir = root.join(CACHE_VERSION);
    let file_name = src.file_name().ok_or_else(|| BinaryError::Cache {
        path: src.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dest = dir.join(file_name);

    if dest.is_file() {
        debug!(path = %dest.display(), "renderer already cached");
        return Ok(dest);
    }

    let cache_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| BinaryError::Cache { path, source }
    };

    fs::create_dir_all(&dir).map_err(cache_err(&dir))?;
    fs::copy(src, &dest).map_err(cache_err(&dest))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).map_err(cache_err(&dest))?;
    }

    debug!(from = %src.display(), to = %dest.display(), "renderer copied to cache");
    Ok(dest)
}
