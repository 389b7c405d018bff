//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Manages the user-editable settings of the directory browser. Settings are
//! stored as TOML in the platform config directory resolved by the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clipr::ClipboardConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::AppError;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "dirview";
const APPLICATION: &str = "dirview";

/// Remote directory API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; endpoints are `{base}/categories`, `{base}/list/{file}`,
    /// `{base}/search?q=`.
    pub base_url: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.messblocker.com/api".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Browsing and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Usernames per page
    pub page_size: usize,

    /// Quiet period before a typed query is sent
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,

    /// How long copy confirmations stay on screen
    #[serde(with = "humantime_serde")]
    pub notification_duration: Duration,

    /// Redraw / housekeeping interval of the event loop
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,

    /// Command used to open profile links
    pub opener_cmd: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce: Duration::from_millis(300),
            notification_duration: Duration::from_secs(2),
            tick_rate: Duration::from_millis(250),
            opener_cmd: default_opener().to_string(),
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for log files; relative paths resolve against the data dir
    pub log_dir: PathBuf,

    pub log_file_prefix: String,

    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    pub rotation: LogRotation,

    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file_prefix: "dirview".to_string(),
            level: "info".to_string(),
            rotation: LogRotation::Daily,
            max_log_files: 7,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,

    pub ui: UiConfig,

    pub logging: LoggingConfig,

    pub clipboard: ClipboardConfig,
}

impl Config {
    /// Loads config from the platform config dir, creating a default file
    /// when none exists yet.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path)
            .await
            .map_err(|e| AppError::file_io(path, e))?
        {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|e| AppError::file_io(path, e))?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    pub async fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str)
            .await
            .map_err(|e| AppError::file_io(path, e))?;

        Ok(())
    }

    /// Resolve the log directory, anchoring relative paths in the data dir.
    pub fn resolved_log_dir(&self) -> Result<PathBuf, AppError> {
        if self.logging.log_dir.is_absolute() {
            Ok(self.logging.log_dir.clone())
        } else {
            Ok(Self::data_dir()?.join(&self.logging.log_dir))
        }
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(project_dirs("config")?.config_dir().join("config.toml"))
    }

    /// Directory for preferences and logs.
    pub fn data_dir() -> Result<PathBuf, AppError> {
        Ok(project_dirs("data")?.data_dir().to_path_buf())
    }
}

fn project_dirs(kind: &'static str) -> Result<ProjectDirs, AppError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(AppError::NoProjectDirs(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_browsing_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.ui.page_size, 20);
        assert_eq!(cfg.ui.search_debounce, Duration::from_millis(300));
        assert_eq!(cfg.ui.notification_duration, Duration::from_secs(2));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080/api"

            [ui]
            page_size = 50
            search_debounce = "150ms"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api.base_url, "http://localhost:8080/api");
        assert_eq!(cfg.api.timeout, Duration::from_secs(15));
        assert_eq!(cfg.ui.page_size, 50);
        assert_eq!(cfg.ui.search_debounce, Duration::from_millis(150));
        assert_eq!(cfg.logging.rotation, LogRotation::Daily);
    }

    #[tokio::test]
    async fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(cfg.ui.page_size, 20);

        let reloaded = Config::load_from(&path).await.unwrap();
        assert_eq!(reloaded.api.base_url, cfg.api.base_url);
    }
}
