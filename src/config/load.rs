//! The main config loading module for kaser.
//!
//! Handles loading and deserializing settings from `kaser.toml`.
//!
//! Provides the main [Config] struct, as well as the internal [RawConfig] used for parsing.
//! The engine receives a [Config] at construction and never writes it back.
//!
//! Also implements default config generation for `kaser --init`.

use crate::config::{General, Keys, Theme, ThemeOverrides};
use crate::utils::get_home;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file.
/// Converted into the main [Config] struct once the theme palette is resolved.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct RawConfig {
    general: General,
    theme: ThemeOverrides,
    keys: Keys,
}

/// Main configuration struct for kaser.
#[derive(Debug, Clone)]
pub struct Config {
    general: General,
    theme: Theme,
    keys: Keys,
    path: Option<PathBuf>,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let theme = Theme::named(raw.general.theme()).with_overrides(&raw.theme);
        Self {
            general: raw.general,
            theme,
            keys: raw.keys,
            path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl Config {
    /// Load configuration from the default path.
    /// If the file does not exist or fails to parse, returns the default configuration.
    ///
    /// Called by the entry point at startup.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("[kaser] Error parsing config: {}", e);
                tracing::warn!(path = %path.display(), error = %e, "config rejected");
                Self::default()
            }
        }
    }

    /// Parses the config at `path`.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: RawConfig = toml::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let mut cfg = Config::from(raw);
        cfg.path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), theme = cfg.theme.name(), "config loaded");
        Ok(cfg)
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &General {
        &self.general
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Directory holding the loaded config file, used to find `translations.toml`.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| Self::default_path().parent().map(Path::to_path_buf))
    }

    /// Determine the default configuration file path.
    /// Checks the KASER_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME, then ~/.config/kaser/kaser.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("KASER_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("kaser/kaser.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/kaser/kaser.toml");
        }
        PathBuf::from("kaser.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = r##"# kaser.toml - default configuration for kaser

# Commented values are the internal defaults.
# Colors take hex codes ("#RRGGBB") or terminal color names ("cyan").

[general]
# language = "en"
# theme = "default"          # "default", "dark", "light" or "plain"
# show_hidden = false
# sort_by = "name"           # "name", "size" or "modified"
# dirs_first = true
# allow_recursive_delete = true
# move_to_trash = false
# backup_on_save = true

# [theme]
# accent = "#444444"
# selection = "#303030"
# directory = "blue"
# executable = "green"
# symlink = "cyan"
# path = "magenta"
# heading = "yellow"

# [keys]
# go_up = ["Up", "k"]
# go_down = ["Down", "j"]
# open = ["Enter"]
# quit = ["Esc"]
# go_home = ["h"]
# view = ["v"]
# copy = ["c"]
# move_file = ["m"]
# delete = ["d"]
# rename = ["r"]
# create = ["n"]
# create_directory = ["g"]
# toggle_filter = ["f"]
# choose_filter = ["/"]
# keybind_help = ["?"]
"##;
        fs::write(path, content)?;
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}
