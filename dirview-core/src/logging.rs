//! src/logging.rs
//! ============================================================================
//! # Logger: file-backed structured tracing
//!
//! The terminal belongs to the UI, so every log line goes to a JSON-lines file
//! written by a non-blocking `tracing-appender` worker. `RUST_LOG` overrides
//! the configured level.

use std::{
    path::{Component, Path},
    str::FromStr,
};

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, filter::Directive, fmt::time::ChronoUtc, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{LogRotation, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log directory: {0}")]
    InvalidLogDirectory(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. Keep the returned guard alive until
    /// shutdown or buffered lines are lost.
    pub fn init(config: &LoggingConfig, log_dir: &Path) -> Result<WorkerGuard> {
        validate_config(config)?;
        validate_log_directory(log_dir)?;

        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix("jsonl")
            .max_log_files(config.max_log_files)
            .build(log_dir)
            .context("Failed to create file appender")?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let directive =
            Directive::from_str(&config.level).context("Invalid log level in config")?;
        let filter = EnvFilter::builder()
            .with_default_directive(directive)
            .from_env_lossy();

        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(json_layer)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

fn validate_config(config: &LoggingConfig) -> Result<()> {
    if config.log_file_prefix.trim().is_empty() {
        return Err(LoggingError::ConfigError("Log file prefix must not be empty".to_string()).into());
    }

    if config.max_log_files == 0 {
        return Err(
            LoggingError::ConfigError("max_log_files must be greater than 0".to_string()).into(),
        );
    }

    Ok(())
}

fn validate_log_directory(path: &Path) -> Result<()> {
    if path.components().count() == 0 {
        return Err(LoggingError::InvalidLogDirectory("Empty path".to_string()).into());
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(LoggingError::InvalidLogDirectory(
            "Path contains parent directory references".to_string(),
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rejects_parent_references() {
        let err = validate_log_directory(&PathBuf::from("/tmp/../etc")).unwrap_err();
        assert!(err.to_string().contains("parent directory"));
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let config = LoggingConfig {
            log_file_prefix: "  ".to_string(),
            ..LoggingConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LoggingConfig::default()).is_ok());
        assert!(validate_log_directory(&PathBuf::from("logs")).is_ok());
    }
}
