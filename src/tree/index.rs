//! Per-level name indexing used by the merge engine.

use std::collections::HashMap;

use super::Node;

/// Direct children of one tree level, split by kind and keyed by name.
///
/// Sibling names are expected to be unique within one source; when a source
/// violates that, the later-indexed duplicate overwrites the earlier one.
/// This is implementation-defined and intentionally not strengthened.
#[derive(Debug)]
pub struct LevelIndex<'a> {
    pub leaves: HashMap<&'a str, &'a Node>,
    pub folders: HashMap<&'a str, &'a Node>,
}

impl<'a> LevelIndex<'a> {
    pub fn build(nodes: &'a [Node]) -> Self {
        let mut leaves = HashMap::new();
        let mut folders = HashMap::new();
        for node in nodes {
            if node.is_folder() {
                folders.insert(node.name.as_str(), node);
            } else {
                leaves.insert(node.name.as_str(), node);
            }
        }
        Self { leaves, folders }
    }
}
