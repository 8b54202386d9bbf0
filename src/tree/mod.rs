//! Collection tree model.
//!
//! Mirrors the hosted collection's item hierarchy: a node is either a leaf
//! (one API operation) or a folder of child nodes. Names are the merge
//! keys; identifiers ride along for continuity across merges.

pub mod index;

use serde_json::Value;

/// Which source tree a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Freshly derived from the current API specification.
    Incoming,
    /// Previously stored, potentially containing manual edits.
    Authoritative,
}

/// Payload of a leaf node: one API operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafPayload {
    /// Opaque request document (method, url, query, headers, body).
    pub request: Option<Value>,
    /// Saved response examples.
    pub response: Vec<Value>,
    pub description: Option<String>,
}

/// Node body: leaf or folder. A node is a folder iff it carries a child
/// collection; an explicitly empty child collection is still a folder.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Leaf(LeafPayload),
    Folder(Vec<Node>),
}

/// One node of a collection tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Merge key; case-sensitive, unique among siblings within one source.
    pub name: String,
    /// Stable identifier persisted by the hosted store.
    pub postman_id: Option<String>,
    /// Generic identifier; overwritten from `postman_id` after merging.
    pub id: Option<String>,
    pub body: NodeBody,
    /// Source branch this node originated from (set on merge output).
    pub origin: Option<Provenance>,
    /// True when the node was produced by combining both sides.
    pub merged: bool,
}

impl Node {
    pub fn leaf(name: impl Into<String>, payload: LeafPayload) -> Self {
        Self {
            name: name.into(),
            postman_id: None,
            id: None,
            body: NodeBody::Leaf(payload),
            origin: None,
            merged: false,
        }
    }

    pub fn folder(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            postman_id: None,
            id: None,
            body: NodeBody::Folder(children),
            origin: None,
            merged: false,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.body, NodeBody::Folder(_))
    }

    pub fn children(&self) -> Option<&[Node]> {
        match &self.body {
            NodeBody::Folder(children) => Some(children),
            NodeBody::Leaf(_) => None,
        }
    }

    /// Total node count of this node's subtree, itself included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(Node::subtree_size).sum())
            .unwrap_or(0)
    }
}

/// A source tree: root node sequence with a provenance label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub origin: Provenance,
}

impl Tree {
    pub fn incoming(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            origin: Provenance::Incoming,
        }
    }

    pub fn authoritative(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            origin: Provenance::Authoritative,
        }
    }
}

/// Output of the merge engine. Structurally a tree, but every node carries
/// its provenance tag and `merged` flag, and identifiers are normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTree {
    pub nodes: Vec<Node>,
}

impl MergedTree {
    /// Total node count across the whole tree.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_size).sum()
    }
}
