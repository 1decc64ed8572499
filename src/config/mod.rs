use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{Result, WishError},
    storage::{json_backend::DEFAULT_RETENTION, DocumentLimits, DEFAULT_MAX_DEPTH},
    utils::{paths, persistence::replace_file},
};

pub const MAX_RECENT_FILES: usize = 10;

/// User preferences shared by every front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Most recently opened files, newest last.
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<PathBuf>,
    #[serde(default)]
    pub export_human_readable: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            last_opened: None,
            export_human_readable: false,
            backup_retention: Self::default_backup_retention(),
            max_nesting_depth: Self::default_max_nesting_depth(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        DEFAULT_RETENTION
    }

    pub fn default_max_nesting_depth() -> usize {
        DEFAULT_MAX_DEPTH
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Records `path` as opened: it moves to the end of the recent list and
    /// the oldest entries fall off past [`MAX_RECENT_FILES`].
    pub fn touch_recent(&mut self, path: &Path) {
        self.recent_files.retain(|existing| existing != path);
        self.recent_files.push(path.to_path_buf());
        if self.recent_files.len() > MAX_RECENT_FILES {
            let excess = self.recent_files.len() - MAX_RECENT_FILES;
            self.recent_files.drain(..excess);
        }
        self.last_opened = Some(path.to_path_buf());
    }

    pub fn forget_recent(&mut self, path: &Path) {
        self.recent_files.retain(|existing| existing != path);
        if self.last_opened.as_deref() == Some(path) {
            self.last_opened = None;
        }
    }

    pub fn document_limits(&self) -> DocumentLimits {
        DocumentLimits {
            max_depth: self.max_nesting_depth.max(1),
        }
    }
}

/// Loads and saves [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for the default location (see [`paths::app_dir`]).
    pub fn from_env() -> Self {
        Self::with_base_dir(paths::app_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self::new(paths::config_file_in(&base))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the configuration; a missing file yields defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&data).map_err(|err| {
            WishError::ConfigError(format!("{}: {}", self.config_path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| WishError::ConfigError(err.to_string()))?;
        replace_file(&self.config_path, &json)
    }
}
