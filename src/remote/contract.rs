//! Boundary contracts for the hosted collection store.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SyncError;

/// Summary of a remote collection as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub uid: String,
    pub name: String,
}

/// Operations the synchronization flow needs from the hosted store.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Find a collection by exact name, optionally scoped to a workspace.
    async fn find_by_name(
        &self,
        name: &str,
        workspace_id: Option<&str>,
    ) -> Result<Option<CollectionSummary>, SyncError>;

    /// Fetch a collection's full content by identifier.
    async fn fetch(&self, uid: &str) -> Result<Value, SyncError>;

    /// Create a collection, returning its identifier. Implementations fall
    /// back to the default location when creation in the requested
    /// workspace is denied.
    async fn create(
        &self,
        collection: &Value,
        workspace_id: Option<&str>,
    ) -> Result<String, SyncError>;

    /// Replace a collection's full content by identifier.
    async fn update(&self, uid: &str, collection: &Value) -> Result<(), SyncError>;
}

/// Maps a human-readable workspace name to an identifier.
#[async_trait]
pub trait WorkspaceResolver: Send + Sync {
    /// Resolve a workspace name to its identifier, creating the workspace
    /// when absent. Returns `None` (default location) when both lookup and
    /// creation fail.
    async fn resolve_workspace(&self, name: &str) -> Option<String>;
}
