//! Identifier normalization over the merged tree.

use crate::tree::{Node, NodeBody};

/// Post-order pass, independent of policy: when a node carries a stable
/// identifier, copy it into the generic `id`, overriding whatever value
/// attribute merging produced. Identifier continuity across merges is
/// driven by the stable field, not by copy order.
pub(super) fn normalize_identifiers(nodes: &mut [Node]) {
    for node in nodes {
        if let NodeBody::Folder(children) = &mut node.body {
            normalize_identifiers(children);
        }
        if let Some(stable) = &node.postman_id {
            node.id = Some(stable.clone());
        }
    }
}
