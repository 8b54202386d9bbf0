//! HTTP client for the Postman collection API.
//!
//! Thin typed wrapper over the REST endpoints the synchronization flow
//! uses. All methods return [`SyncError`]; 401/403 responses map to
//! [`SyncError::PermissionError`] so the binary can print the permission
//! hint.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::SyncError;

use super::contract::{CollectionStore, CollectionSummary, WorkspaceResolver};

/// Base URL for the hosted collection API.
pub const DEFAULT_BASE_URL: &str = "https://api.getpostman.com";

/// API-key authenticated client.
#[derive(Debug, Clone)]
pub struct PostmanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostmanClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Api-Key", &self.api_key)
    }

    /// Check the response status, draining the body into the error message
    /// on failure.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::from_status(status.as_u16(), body))
    }

    /// Connectivity probe: lists collections and discards the result.
    pub async fn ping(&self) -> Result<(), SyncError> {
        let response = self
            .request(reqwest::Method::GET, "/collections")
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn list_workspaces(&self) -> Result<Vec<Value>, SyncError> {
        let response = self
            .request(reqwest::Method::GET, "/workspaces")
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        Ok(body
            .get("workspaces")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_workspace(&self, name: &str) -> Result<String, SyncError> {
        let response = self
            .request(reqwest::Method::POST, "/workspaces")
            .json(&json!({ "workspace": { "name": name, "type": "personal" } }))
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        body.pointer("/workspace/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SyncError::RemoteError {
                status: 200,
                message: "workspace creation response carried no id".to_string(),
            })
    }

    async fn create_in(
        &self,
        collection: &Value,
        workspace_id: Option<&str>,
    ) -> Result<String, SyncError> {
        let path = match workspace_id {
            Some(id) => format!("/collections?workspace={}", id),
            None => "/collections".to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&json!({ "collection": collection }))
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        body.pointer("/collection/uid")
            .or_else(|| body.pointer("/collection/id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SyncError::RemoteError {
                status: 200,
                message: "collection creation response carried no identifier".to_string(),
            })
    }
}

#[async_trait]
impl CollectionStore for PostmanClient {
    async fn find_by_name(
        &self,
        name: &str,
        workspace_id: Option<&str>,
    ) -> Result<Option<CollectionSummary>, SyncError> {
        let path = match workspace_id {
            Some(id) => format!("/collections?workspace={}", id),
            None => "/collections".to_string(),
        };
        let response = self.request(reqwest::Method::GET, &path).send().await?;
        let body: Value = Self::check(response).await?.json().await?;
        let summary = body
            .get("collections")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|c| c.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|c| {
                let uid = c
                    .get("uid")
                    .or_else(|| c.get("id"))
                    .and_then(Value::as_str)?;
                Some(CollectionSummary {
                    uid: uid.to_string(),
                    name: name.to_string(),
                })
            });
        Ok(summary)
    }

    async fn fetch(&self, uid: &str) -> Result<Value, SyncError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/collections/{}", uid))
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        Ok(body.get("collection").cloned().unwrap_or(body))
    }

    async fn create(
        &self,
        collection: &Value,
        workspace_id: Option<&str>,
    ) -> Result<String, SyncError> {
        match self.create_in(collection, workspace_id).await {
            Err(SyncError::PermissionError(message)) if workspace_id.is_some() => {
                // Creation in the requested workspace was denied; retry in
                // the account's default location.
                warn!(
                    workspace_id = workspace_id.unwrap_or_default(),
                    error = %message,
                    "collection creation denied in workspace, retrying in default location"
                );
                self.create_in(collection, None).await
            }
            result => result,
        }
    }

    async fn update(&self, uid: &str, collection: &Value) -> Result<(), SyncError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/collections/{}", uid))
            .json(&json!({ "collection": collection }))
            .send()
            .await?;
        Self::check(response).await?;
        debug!(uid = uid, "collection updated");
        Ok(())
    }
}

#[async_trait]
impl WorkspaceResolver for PostmanClient {
    async fn resolve_workspace(&self, name: &str) -> Option<String> {
        match self.list_workspaces().await {
            Ok(workspaces) => {
                if let Some(id) = workspaces
                    .iter()
                    .find(|w| w.get("name").and_then(Value::as_str) == Some(name))
                    .and_then(|w| w.get("id").and_then(Value::as_str))
                {
                    return Some(id.to_string());
                }
            }
            Err(e) => {
                warn!(workspace = name, error = %e, "workspace lookup failed, using default location");
                return None;
            }
        }
        match self.create_workspace(name).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(workspace = name, error = %e, "workspace creation failed, using default location");
                None
            }
        }
    }
}
