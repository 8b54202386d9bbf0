//! Structural merge engine.
//!
//! Reconciles an incoming tree (freshly derived from the current API
//! specification) with an authoritative tree (previously stored, possibly
//! hand-edited) into one tree under a selectable conflict-resolution
//! policy. The engine is pure: it borrows both inputs, performs no I/O,
//! and builds fresh output nodes.

mod attributes;
mod engine;
mod normalize;

use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;
use crate::tree::{MergedTree, Tree};

/// Conflict-resolution policy for a single merge invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Authoritative content wins on conflicting leaf attributes; incoming
    /// contributes only nodes absent from authoritative.
    #[default]
    PreserveAuthoritative,
    /// Incoming content wins on conflicting leaf attributes; authoritative
    /// contributes only nodes absent from incoming.
    PreserveIncoming,
    /// Output equals the incoming tree; authoritative is discarded in full.
    Replace,
}

impl FromStr for MergePolicy {
    type Err = SyncError;

    /// Policy names parse case-insensitively; `-` and `_` separators are
    /// accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "preserveauthoritative" => Ok(MergePolicy::PreserveAuthoritative),
            "preserveincoming" => Ok(MergePolicy::PreserveIncoming),
            "replace" => Ok(MergePolicy::Replace),
            _ => Err(SyncError::ConfigError(format!(
                "Unknown merge strategy '{}' (expected preserve-authoritative, \
                 preserve-incoming, or replace)",
                s
            ))),
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePolicy::PreserveAuthoritative => "preserve-authoritative",
            MergePolicy::PreserveIncoming => "preserve-incoming",
            MergePolicy::Replace => "replace",
        };
        write!(f, "{}", name)
    }
}

/// Merge `incoming` and `authoritative` under `policy`.
///
/// Never fails: malformed child collections have already been degraded to
/// empty lists at the parse boundary, and the engine itself has no error
/// paths. Output siblings are sorted by name at every level; identifiers
/// are normalized from the stable identifier in a final post-order pass.
pub fn merge(incoming: &Tree, authoritative: &Tree, policy: MergePolicy) -> MergedTree {
    let mut nodes = match policy {
        MergePolicy::Replace => engine::replace_level(&incoming.nodes),
        _ => engine::reconcile_level(&incoming.nodes, &authoritative.nodes, policy),
    };
    normalize::normalize_identifiers(&mut nodes);
    MergedTree { nodes }
}
