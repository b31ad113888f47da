//! Maps the host platform to a renderer binary name.

use crate::error::BinaryError;

/// OS/architecture pair the renderer is selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererTarget {
    pub os: &'static str,
    pub arch: &'static str,
}

impl RendererTarget {
    pub fn new(os: &'static str, arch: &'static str) -> Self {
        Self { os, arch }
    }

    /// The platform this binary was compiled for.
    pub fn detect() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// File name of the renderer for this target.
    ///
    /// Release builds carry a `_release` suffix; `debug` selects the
    /// unsuffixed debug build.
    pub fn binary_name(&self, debug: bool) -> Result<String, BinaryError> {
        let stem = match self.os {
            "windows" => "tray_windows",
            "macos" => "tray_darwin",
            "linux" => "tray_linux",
            _ => return Err(self.unsupported()),
        };
        if !matches!(self.arch, "x86_64" | "aarch64") {
            return Err(self.unsupported());
        }
        let suffix = if debug { "" } else { "_release" };
        let ext = if self.os == "windows" { ".exe" } else { "" };
        Ok(format!("{stem}{suffix}{ext}"))
    }

    fn unsupported(&self) -> BinaryError {
        BinaryError::UnsupportedPlatform {
            os: self.os.into(),
            arch: self.arch.into(),
        }
    }
}

impl Default for RendererTarget {
    fn default() -> Self {
        Self::detect()
    }
}
