//! Configuration loaded once at startup and handed to the store and renderer.

use crate::error::{JotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "JOT_CONFIG";

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "jot.sqlite";

/// Default summary column width.
pub const DEFAULT_SUMMARY_WIDTH: usize = 48;

/// User configuration persisted as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the database (overrides the default location).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_dir: Option<PathBuf>,

    /// Database filename (overrides `jot.sqlite`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// Width of the summary column in listings.
    pub summary_width: usize,

    /// Decorate listings with ANSI colors.
    pub colorize: bool,

    /// Editor command for long-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Pager command for single-note view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pager: Option<String>,

    /// Where this config was loaded from (not serialized).
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_dir: None,
            db_name: None,
            summary_width: DEFAULT_SUMMARY_WIDTH,
            colorize: !cfg!(windows),
            editor: None,
            pager: None,
            source: None,
        }
    }
}

impl Config {
    /// Load the config from `$JOT_CONFIG` or the platform config directory.
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Config::default()
        };
        if config.summary_width == 0 {
            return Err(JotError::ConfigError(
                "summary_width must be at least 1".to_string(),
            ));
        }
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Location of the config file.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("jot").join("config.toml"))
            .ok_or_else(|| {
                JotError::ConfigError(format!(
                    "could not determine config directory; set {} explicitly",
                    CONFIG_ENV
                ))
            })
    }

    /// Path this config was loaded from, or the default location.
    pub fn path(&self) -> Result<PathBuf> {
        match &self.source {
            Some(path) => Ok(path.clone()),
            None => Self::default_path(),
        }
    }

    /// Write the config back to where it was loaded from.
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        log::debug!("wrote config to {}", path.display());
        Ok(path)
    }

    /// Directory holding the database.
    pub fn db_dir(&self) -> PathBuf {
        if let Some(dir) = &self.db_dir {
            return dir.clone();
        }
        // Beside the program, like a portable install.
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| dirs::data_dir().map(|d| d.join("jot")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Full path to the database file.
    pub fn db_path(&self) -> PathBuf {
        let name = self.db_name.as_deref().unwrap_or(DEFAULT_DB_NAME);
        self.db_dir().join(name)
    }

    /// Editor command: config, then `$EDITOR`, then a platform default.
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| if cfg!(windows) { "notepad" } else { "nvim" }.to_string())
    }

    /// Pager command: config, then `$PAGER`, then a platform default.
    pub fn pager_command(&self) -> String {
        self.pager
            .clone()
            .or_else(|| std::env::var("PAGER").ok().filter(|p| !p.trim().is_empty()))
            .unwrap_or_else(|| if cfg!(windows) { "more" } else { "less -R" }.to_string())
    }
}
