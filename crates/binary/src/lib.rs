//! Renderer binary selection, lookup and cache copy.
//!
//! Picks the renderer file name for the host platform, finds it in the
//! usual install locations and optionally copies it into a versioned
//! cache directory before launch.

pub mod cache;
pub mod error;
pub mod locate;
pub mod target;

use std::path::PathBuf;

use tracing::info;

pub use cache::{copy_to_cache, default_cache_root};
pub use error::BinaryError;
pub use locate::{BIN_DIR_ENV, locate, search_dirs};
pub use target::RendererTarget;

/// Where, if anywhere, to copy the renderer before launching it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CopyDir {
    /// Launch the renderer from where it was found.
    #[default]
    Disabled,
    /// Copy into [`default_cache_root`].
    DefaultCache,
    /// Copy into the given root.
    Path(PathBuf),
}

/// Inputs to [`resolve_renderer`].
#[derive(Debug, Clone, Default)]
pub struct RendererOptions {
    pub target: RendererTarget,
    pub debug: bool,
    /// Directory searched before the standard locations.
    pub bin_dir: Option<PathBuf>,
    pub copy_dir: CopyDir,
}

/// Selects, locates and (optionally) caches the renderer executable.
pub fn resolve_renderer(opts: &RendererOptions) -> Result<PathBuf, BinaryError> {
    let name = opts.target.binary_name(opts.debug)?;
    let found = locate(&name, &search_dirs(opts.bin_dir.as_deref()))?;

    let path = match &opts.copy_dir {
        CopyDir::Disabled => found,
        CopyDir::DefaultCache => copy_to_cache(&found, &default_cache_root())?,
        CopyDir::Path(root) => copy_to_cache(&found, root)?,
    };
    info!(path = %path.display(), "renderer resolved");
    Ok(path)
}
