//! Synchronization orchestrator.
//!
//! Drives one run end to end: load the specification, convert it to the
//! incoming tree, fetch the authoritative collection, merge, and push the
//! result back. All failures come back as [`SyncError`] values; the
//! orchestrator never terminates the process.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::merge::{merge, MergePolicy};
use crate::remote::{collection, CollectionStore, WorkspaceResolver};
use crate::spec;
use crate::tree::Tree;

/// Result summary of one synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub collection_name: String,
    /// Identifier of the collection written to; None on a dry run that
    /// would have created a new collection.
    pub collection_uid: Option<String>,
    /// True when the collection did not exist and was (or would be) created.
    pub created: bool,
    pub strategy: String,
    pub node_count: usize,
    pub dry_run: bool,
    /// RFC 3339 completion timestamp.
    pub completed_at: String,
}

/// One-shot synchronization service over a collection store.
pub struct SyncService<'a, S: CollectionStore + WorkspaceResolver> {
    store: &'a S,
}

impl<'a, S: CollectionStore + WorkspaceResolver> SyncService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run one synchronization. With `dry_run`, everything up to and
    /// including the merge happens, but nothing is written remotely.
    pub async fn run(&self, config: &SyncConfig, dry_run: bool) -> Result<SyncOutcome, SyncError> {
        let policy = config.policy()?;
        let source = config.spec_source()?;

        let incoming = spec::load_incoming_tree(&source).await?;
        debug!(nodes = incoming.nodes.len(), "incoming tree ready");

        let workspace_id = match &config.workspace_name {
            Some(name) => self.store.resolve_workspace(name).await,
            None => None,
        };

        let existing = self
            .store
            .find_by_name(&config.collection_name, workspace_id.as_deref())
            .await?;

        let outcome = match existing {
            Some(summary) => {
                let stored = self.store.fetch(&summary.uid).await?;
                let authoritative = collection::tree_from_collection(&stored);
                let merged = merge(&incoming, &authoritative, policy);
                let payload = collection::collection_to_json(&config.collection_name, &merged);
                if !dry_run {
                    self.store.update(&summary.uid, &payload).await?;
                }
                info!(
                    collection = %config.collection_name,
                    uid = %summary.uid,
                    strategy = %policy,
                    dry_run = dry_run,
                    "collection synchronized"
                );
                self.outcome(config, policy, Some(summary.uid), false, merged.node_count(), dry_run)
            }
            None => {
                // Nothing stored yet; the incoming tree is pushed as-is,
                // still routed through the engine for sorting and
                // identifier normalization.
                let authoritative = Tree::authoritative(Vec::new());
                let merged = merge(&incoming, &authoritative, policy);
                let payload = collection::collection_to_json(&config.collection_name, &merged);
                let uid = if dry_run {
                    None
                } else {
                    Some(self.store.create(&payload, workspace_id.as_deref()).await?)
                };
                info!(
                    collection = %config.collection_name,
                    strategy = %policy,
                    dry_run = dry_run,
                    "collection created"
                );
                self.outcome(config, policy, uid, true, merged.node_count(), dry_run)
            }
        };

        Ok(outcome)
    }

    fn outcome(
        &self,
        config: &SyncConfig,
        policy: MergePolicy,
        collection_uid: Option<String>,
        created: bool,
        node_count: usize,
        dry_run: bool,
    ) -> SyncOutcome {
        SyncOutcome {
            collection_name: config.collection_name.clone(),
            collection_uid,
            created,
            strategy: policy.to_string(),
            node_count,
            dry_run,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
