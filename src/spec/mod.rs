//! Specification loading: fetch and parse into an incoming tree.

pub mod openapi;

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::tree::Tree;

/// Where the API specification lives. URL and file are mutually exclusive;
/// configuration validation enforces exactly one before this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Url(String),
    File(PathBuf),
}

impl SpecSource {
    /// Fetch the raw specification document.
    pub async fn fetch(&self) -> Result<String, SyncError> {
        match self {
            SpecSource::Url(url) => {
                debug!(url = %url, "fetching specification");
                let response = reqwest::get(url).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SyncError::SpecError(format!(
                        "fetching {} returned {}",
                        url, status
                    )));
                }
                Ok(response.text().await?)
            }
            SpecSource::File(path) => {
                debug!(path = %path.display(), "reading specification");
                Ok(std::fs::read_to_string(path)?)
            }
        }
    }
}

/// Parse a raw specification document: JSON first, YAML fallback.
pub fn parse_document(raw: &str) -> Result<Value, SyncError> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(raw).map_err(|yaml_err| {
            SyncError::SpecError(format!(
                "document is neither valid JSON ({}) nor valid YAML ({})",
                json_err, yaml_err
            ))
        }),
    }
}

/// Load the incoming tree from a specification source.
pub async fn load_incoming_tree(source: &SpecSource) -> Result<Tree, SyncError> {
    let raw = source.fetch().await?;
    let document = parse_document(&raw)?;
    openapi::to_tree(&document)
}
