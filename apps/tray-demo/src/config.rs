//! Demo configuration.
//!
//! Stored as TOML at `$TRAYBRIDGE_DEMO_CONFIG` when set, otherwise:
//! - Linux: `~/.config/traybridge/demo.toml`
//! - Windows: `%APPDATA%/traybridge/demo.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use traybridge::{Conf, CopyDir, Menu, MenuItem};

/// Overrides the configuration file location.
pub const CONFIG_ENV: &str = "TRAYBRIDGE_DEMO_CONFIG";

/// Title of the item that shuts the demo down.
pub const QUIT_TITLE: &str = "Quit";

/// One menu entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub title: String,

    #[serde(default)]
    pub tooltip: String,

    #[serde(default)]
    pub checked: bool,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<&ItemConfig> for MenuItem {
    fn from(item: &ItemConfig) -> Self {
        MenuItem::new(item.title.as_str())
            .with_tooltip(item.tooltip.as_str())
            .with_checked(item.checked)
            .with_enabled(item.enabled)
    }
}

/// Demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    /// Base64-encoded icon handed to the renderer untouched.
    #[serde(default)]
    pub icon: String,

    /// Use the debug renderer build and log every wire line.
    #[serde(default)]
    pub debug: bool,

    /// Extra directory searched for the renderer.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,

    /// Copy the renderer into the user cache before launching it.
    #[serde(default)]
    pub copy_to_cache: bool,

    #[serde(default = "default_items")]
    pub items: Vec<ItemConfig>,
}

fn default_title() -> String {
    "traybridge".into()
}

fn default_tooltip() -> String {
    "traybridge demo".into()
}

fn default_true() -> bool {
    true
}

fn default_items() -> Vec<ItemConfig> {
    vec![
        ItemConfig {
            title: "Notifications".into(),
            tooltip: "Toggle notifications".into(),
            checked: true,
            enabled: true,
        },
        ItemConfig {
            title: "Dark mode".into(),
            tooltip: String::new(),
            checked: false,
            enabled: true,
        },
        ItemConfig {
            title: QUIT_TITLE.into(),
            tooltip: "Exit the demo".into(),
            checked: false,
            enabled: true,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            tooltip: default_tooltip(),
            icon: String::new(),
            debug: false,
            bin_dir: None,
            copy_to_cache: false,
            items: default_items(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or writes and returns the default.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn menu(&self) -> Menu {
        Menu {
            icon: self.icon.clone(),
            title: self.title.clone(),
            tooltip: self.tooltip.clone(),
            items: self.items.iter().map(MenuItem::from).collect(),
        }
    }

    /// Controller configuration for this demo.
    pub fn tray_conf(&self) -> Conf {
        let mut conf = Conf::new(self.menu()).with_debug(self.debug);
        if let Some(dir) = &self.bin_dir {
            conf = conf.with_bin_dir(dir);
        }
        if self.copy_to_cache {
            conf = conf.with_copy_dir(CopyDir::DefaultCache);
        }
        conf
    }
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("traybridge").join("demo.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("traybridge")
            .join("demo.toml")
    }
}
