//! Configuration model and validation.
//!
//! Values compose with precedence: defaults (lowest), config file,
//! `SPECSYNC__*` environment, CLI flags (applied by the CLI layer,
//! highest). Validation runs before any network work.

pub mod facade;
mod sources;

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use crate::merge::MergePolicy;
use crate::remote::DEFAULT_BASE_URL;
use crate::spec::SpecSource;

pub use facade::ConfigLoader;

/// Full configuration for a synchronization run.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Hosted collection name to sync into.
    #[serde(default)]
    pub collection_name: String,

    /// Workspace name scoping collection lookup and creation.
    #[serde(default)]
    pub workspace_name: Option<String>,

    /// Specification URL; mutually exclusive with `spec_file`.
    #[serde(default)]
    pub spec_url: Option<String>,

    /// Local specification path; mutually exclusive with `spec_url`.
    #[serde(default)]
    pub spec_file: Option<PathBuf>,

    /// Merge strategy name; parsed case-insensitively.
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Hosted collection API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Hosted collection API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_strategy() -> String {
    MergePolicy::default().to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection_name: String::new(),
            workspace_name: None,
            spec_url: None,
            spec_file: None,
            strategy: default_strategy(),
            api_key: None,
            base_url: default_base_url(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Validate presence, mutual exclusivity, URL scheme, and file
    /// existence. Fatal before the engine runs.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.collection_name.is_empty() {
            return Err(SyncError::ConfigError(
                "collection_name is required".to_string(),
            ));
        }
        match (&self.spec_url, &self.spec_file) {
            (Some(_), Some(_)) => {
                return Err(SyncError::ConfigError(
                    "spec_url and spec_file are mutually exclusive".to_string(),
                ))
            }
            (None, None) => {
                return Err(SyncError::ConfigError(
                    "one of spec_url or spec_file is required".to_string(),
                ))
            }
            (Some(url), None) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(SyncError::ConfigError(format!(
                        "spec_url must be an http(s) URL, got '{}'",
                        url
                    )));
                }
            }
            (None, Some(path)) => {
                if !path.exists() {
                    return Err(SyncError::ConfigError(format!(
                        "spec_file '{}' does not exist",
                        path.display()
                    )));
                }
            }
        }
        self.policy()?;
        self.api_key()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<MergePolicy, SyncError> {
        self.strategy.parse()
    }

    pub fn spec_source(&self) -> Result<SpecSource, SyncError> {
        match (&self.spec_url, &self.spec_file) {
            (Some(url), None) => Ok(SpecSource::Url(url.clone())),
            (None, Some(path)) => Ok(SpecSource::File(path.clone())),
            _ => Err(SyncError::ConfigError(
                "exactly one of spec_url or spec_file is required".to_string(),
            )),
        }
    }

    pub fn api_key(&self) -> Result<&str, SyncError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SyncError::ConfigError("api_key is required".to_string()))
    }
}
