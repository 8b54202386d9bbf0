//! CLI Tooling
//!
//! Command-line interface for collection synchronization. Flags override
//! values loaded from the configuration file and environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config::{ConfigLoader, SyncConfig};
use crate::error::SyncError;
use crate::remote::PostmanClient;
use crate::sync::{SyncOutcome, SyncService};

/// Specsync CLI - keep a hosted API-documentation collection in sync with
/// an API specification
#[derive(Parser)]
#[command(name = "specsync")]
#[command(about = "Keep a hosted API-documentation collection in sync with an API specification")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the specification into the hosted collection and push the result
    Sync {
        /// Hosted collection name
        #[arg(long)]
        collection: Option<String>,

        /// Workspace name scoping collection lookup and creation
        #[arg(long)]
        workspace: Option<String>,

        /// Specification URL
        #[arg(long, conflicts_with = "spec_file")]
        spec_url: Option<String>,

        /// Local specification file path
        #[arg(long)]
        spec_file: Option<PathBuf>,

        /// Merge strategy (preserve-authoritative, preserve-incoming, replace)
        #[arg(long)]
        strategy: Option<String>,

        /// API key for the hosted collection store
        #[arg(long)]
        api_key: Option<String>,

        /// Compute the merge without pushing anything
        #[arg(long)]
        dry_run: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate configuration and remote connectivity
    Check {
        /// API key for the hosted collection store
        #[arg(long)]
        api_key: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context holding the effective configuration.
pub struct CliContext {
    config: SyncConfig,
}

impl CliContext {
    /// Create a new CLI context from the configured sources.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Execute a CLI command, returning its user-facing output.
    pub async fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Sync {
                collection,
                workspace,
                spec_url,
                spec_file,
                strategy,
                api_key,
                dry_run,
                format,
            } => {
                let config = self.effective_config(
                    collection.as_deref(),
                    workspace.as_deref(),
                    spec_url.as_deref(),
                    spec_file.as_deref(),
                    strategy.as_deref(),
                    api_key.as_deref(),
                );
                config.validate()?;
                let client = PostmanClient::new(config.api_key()?, config.base_url.clone());
                let outcome = SyncService::new(&client).run(&config, *dry_run).await?;
                format_sync_outcome(&outcome, format)
            }
            Commands::Check { api_key, format } => {
                let config = self.effective_config(
                    None,
                    None,
                    None,
                    None,
                    None,
                    api_key.as_deref(),
                );
                self.handle_check(&config, format).await
            }
        }
    }

    /// Fold command flags over the loaded configuration.
    fn effective_config(
        &self,
        collection: Option<&str>,
        workspace: Option<&str>,
        spec_url: Option<&str>,
        spec_file: Option<&std::path::Path>,
        strategy: Option<&str>,
        api_key: Option<&str>,
    ) -> SyncConfig {
        let mut config = self.config.clone();
        if let Some(name) = collection {
            config.collection_name = name.to_string();
        }
        if let Some(name) = workspace {
            config.workspace_name = Some(name.to_string());
        }
        if let Some(url) = spec_url {
            config.spec_url = Some(url.to_string());
            config.spec_file = None;
        }
        if let Some(path) = spec_file {
            config.spec_file = Some(path.to_path_buf());
            config.spec_url = None;
        }
        if let Some(name) = strategy {
            config.strategy = name.to_string();
        }
        if let Some(key) = api_key {
            config.api_key = Some(key.to_string());
        }
        config
    }

    async fn handle_check(&self, config: &SyncConfig, format: &str) -> Result<String, SyncError> {
        let validation = config.validate();
        let config_valid = validation.is_ok();
        let config_error = validation.err().map(|e| e.to_string());

        let remote_reachable = match config.api_key() {
            Ok(key) => PostmanClient::new(key, config.base_url.clone())
                .ping()
                .await
                .is_ok(),
            Err(_) => false,
        };

        if format == "json" {
            serde_json::to_string_pretty(&json!({
                "config_valid": config_valid,
                "config_error": config_error,
                "remote_reachable": remote_reachable,
            }))
            .map_err(|e| SyncError::ConfigError(e.to_string()))
        } else {
            let mut lines = vec![format!(
                "Configuration: {}",
                if config_valid { "valid" } else { "invalid" }
            )];
            if let Some(error) = config_error {
                lines.push(format!("  {}", error));
            }
            lines.push(format!(
                "Remote API:    {}",
                if remote_reachable {
                    "reachable"
                } else {
                    "unreachable"
                }
            ));
            Ok(lines.join("\n"))
        }
    }
}

fn format_sync_outcome(outcome: &SyncOutcome, format: &str) -> Result<String, SyncError> {
    if format == "json" {
        return serde_json::to_string_pretty(outcome)
            .map_err(|e| SyncError::ConfigError(e.to_string()));
    }
    let action = match (outcome.created, outcome.dry_run) {
        (true, false) => "Created",
        (true, true) => "Would create",
        (false, false) => "Updated",
        (false, true) => "Would update",
    };
    let uid = outcome
        .collection_uid
        .as_deref()
        .map(|uid| format!(" ({})", uid))
        .unwrap_or_default();
    Ok(format!(
        "{} collection '{}'{}: {} nodes, strategy {}",
        action, outcome.collection_name, uid, outcome.node_count, outcome.strategy
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(config: SyncConfig) -> CliContext {
        CliContext { config }
    }

    #[test]
    fn test_flags_override_loaded_config() {
        let context = context_with(SyncConfig {
            collection_name: "from-file".to_string(),
            spec_url: Some("https://example.com/a.json".to_string()),
            ..Default::default()
        });
        let effective = context.effective_config(
            Some("from-flag"),
            Some("team"),
            None,
            Some(std::path::Path::new("/tmp/spec.yaml")),
            Some("replace"),
            Some("key"),
        );
        assert_eq!(effective.collection_name, "from-flag");
        assert_eq!(effective.workspace_name.as_deref(), Some("team"));
        // A spec-file flag displaces a configured URL.
        assert_eq!(effective.spec_url, None);
        assert_eq!(
            effective.spec_file.as_deref(),
            Some(std::path::Path::new("/tmp/spec.yaml"))
        );
        assert_eq!(effective.strategy, "replace");
        assert_eq!(effective.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_format_sync_outcome_text() {
        let outcome = SyncOutcome {
            collection_name: "api".to_string(),
            collection_uid: Some("u-1".to_string()),
            created: false,
            strategy: "preserve-authoritative".to_string(),
            node_count: 7,
            dry_run: false,
            completed_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let text = format_sync_outcome(&outcome, "text").unwrap();
        assert_eq!(
            text,
            "Updated collection 'api' (u-1): 7 nodes, strategy preserve-authoritative"
        );
    }

    #[test]
    fn test_format_sync_outcome_json_contract() {
        let outcome = SyncOutcome {
            collection_name: "api".to_string(),
            collection_uid: None,
            created: true,
            strategy: "replace".to_string(),
            node_count: 3,
            dry_run: true,
            completed_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&format_sync_outcome(&outcome, "json").unwrap()).unwrap();
        assert_eq!(parsed["collection_name"], "api");
        assert_eq!(parsed["created"], true);
        assert_eq!(parsed["dry_run"], true);
        assert_eq!(parsed["node_count"], 3);
        assert!(parsed["collection_uid"].is_null());
    }
}
