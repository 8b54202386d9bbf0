//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! JSON format, and stdout/stderr/file destinations. Results intended for
//! the user go to stdout; diagnostics default to stderr so piped output
//! stays clean.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::SyncError;

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is file; None means the platform default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Resolve the log file path with precedence: SPECSYNC_LOG_FILE env,
/// config file value, platform state directory default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, SyncError> {
    if let Ok(env_path) = std::env::var("SPECSYNC_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "specsync", "specsync").ok_or_else(
        || {
            SyncError::ConfigError(
                "Could not determine platform state directory for log file".to_string(),
            )
        },
    )?;
    let state_dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(state_dir.join("specsync.log"))
}

/// Initialize the logging system.
///
/// Priority order (highest to lowest): CLI flags (already folded into
/// `config` by the caller), SPECSYNC_LOG* environment variables,
/// configuration file, defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), SyncError> {
    let disabled = config.map(|c| !c.enabled).unwrap_or(false);
    if disabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(|| std::io::sink()))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    match (format.as_str(), output.as_str()) {
        ("json", "file") => {
            let writer = open_log_file(config)?;
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(writer),
                )
                .init();
        }
        ("json", "stdout") => {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        ("json", _) => {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        (_, "file") => {
            let writer = open_log_file(config)?;
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
        (_, "stdout") => {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(use_color)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        _ => {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(use_color)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<std::fs::File, SyncError> {
    let path = resolve_log_file_path(config.and_then(|c| c.file.clone()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SyncError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| SyncError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Build environment filter from SPECSYNC_LOG or config.
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, SyncError> {
    if let Ok(filter) = EnvFilter::try_from_env("SPECSYNC_LOG") {
        return Ok(filter);
    }
    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::try_new(level)
        .map_err(|e| SyncError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<String, SyncError> {
    if let Ok(format) = std::env::var("SPECSYNC_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(SyncError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<String, SyncError> {
    let output = match std::env::var("SPECSYNC_LOG_OUTPUT") {
        Ok(value) => value,
        Err(_) => config
            .map(|c| c.output.clone())
            .unwrap_or_else(default_output),
    };
    match output.as_str() {
        "stdout" | "stderr" | "file" => Ok(output),
        _ => Err(SyncError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
            output
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert_eq!(config.file, None);
        assert!(config.color);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(determine_format(Some(&config)).is_err());
    }

    #[test]
    fn test_invalid_output_rejected() {
        let config = LoggingConfig {
            output: "syslog".to_string(),
            ..Default::default()
        };
        assert!(determine_output(Some(&config)).is_err());
    }

    #[test]
    fn test_resolve_log_file_path_config_value_wins_over_default() {
        let path = resolve_log_file_path(Some(PathBuf::from("/tmp/config.log"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/config.log"));
    }

    #[test]
    fn test_resolve_log_file_path_default_fallback() {
        let path = resolve_log_file_path(None).unwrap();
        assert!(path.ends_with("specsync.log"));
    }
}
