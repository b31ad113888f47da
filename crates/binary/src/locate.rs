//! Renderer lookup across the usual install locations.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::BinaryError;

/// Environment variable naming an extra renderer directory.
pub const BIN_DIR_ENV: &str = "TRAYBRIDGE_BIN_DIR";

/// Subdirectory renderers are shipped in next to the application.
pub const BIN_SUBDIR: &str = "traybin";

/// Directories searched for the renderer, in priority order: the explicit
/// directory, `$TRAYBRIDGE_BIN_DIR`, the executable's directory, its
/// `traybin/` subdirectory, then `./traybin`.
pub fn search_dirs(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = explicit {
        dirs.push(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(BIN_DIR_ENV).filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let shipped = exe_dir.join(BIN_SUBDIR);
        dirs.push(exe_dir);
        dirs.push(shipped);
    }
    dirs.push(PathBuf::from(BIN_SUBDIR));
    dirs
}

/// Returns the first `dir/name` that exists as a file.
pub fn locate(name: &str, dirs: &[PathBuf]) -> Result<PathBuf, BinaryError> {
    for dir in dirs {
        let candidate = dir.join(name);
        trace!(path = %candidate.display(), "probing for renderer");
        if candidate.is_file() {
            debug!(path = %candidate.display(), "renderer found");
            return Ok(candidate);
        }
    }
    Err(BinaryError::NotFound {
        name: name.to_string(),
        searched: dirs.iter().map(|d| d.join(name)).collect(),
    })
}
