//! Per-level reconciliation and recursive descent.
//!
//! Applied independently at the root and inside every matched folder. The
//! authoritative index is walked first (matched leaves are attribute-merged,
//! matched folders recursed into, unmatched nodes kept), then incoming-only
//! nodes are appended, and the level is sorted by name.

use std::collections::HashSet;

use crate::tree::index::LevelIndex;
use crate::tree::{Node, NodeBody, Provenance};

use super::attributes;
use super::MergePolicy;

/// Reconcile the direct children of one level from both sources.
pub(super) fn reconcile_level(
    incoming: &[Node],
    authoritative: &[Node],
    policy: MergePolicy,
) -> Vec<Node> {
    let inc = LevelIndex::build(incoming);
    let auth = LevelIndex::build(authoritative);

    let mut out = Vec::new();
    let mut merged_leaves: HashSet<&str> = HashSet::new();
    let mut merged_folders: HashSet<&str> = HashSet::new();

    for (name, auth_leaf) in &auth.leaves {
        match inc.leaves.get(name) {
            Some(inc_leaf) => {
                out.push(attributes::merge_leaf(inc_leaf, auth_leaf, policy));
                merged_leaves.insert(*name);
            }
            None => out.push(keep(auth_leaf, Provenance::Authoritative, policy)),
        }
    }

    for (name, auth_folder) in &auth.folders {
        match inc.folders.get(name) {
            Some(inc_folder) => {
                let children = reconcile_level(
                    inc_folder.children().unwrap_or(&[]),
                    auth_folder.children().unwrap_or(&[]),
                    policy,
                );
                // Identity comes from the authoritative side; the origin
                // tag follows the policy winner, matching merged leaves.
                let origin = match policy {
                    MergePolicy::PreserveIncoming => Provenance::Incoming,
                    _ => Provenance::Authoritative,
                };
                out.push(Node {
                    name: auth_folder.name.clone(),
                    postman_id: auth_folder
                        .postman_id
                        .clone()
                        .or_else(|| inc_folder.postman_id.clone()),
                    id: auth_folder.id.clone().or_else(|| inc_folder.id.clone()),
                    body: NodeBody::Folder(children),
                    origin: Some(origin),
                    merged: true,
                });
                merged_folders.insert(*name);
            }
            None => out.push(keep(auth_folder, Provenance::Authoritative, policy)),
        }
    }

    for (name, inc_leaf) in &inc.leaves {
        if !merged_leaves.contains(name) {
            out.push(keep(inc_leaf, Provenance::Incoming, policy));
        }
    }

    for (name, inc_folder) in &inc.folders {
        if !merged_folders.contains(name) {
            out.push(keep(inc_folder, Provenance::Incoming, policy));
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Keep a one-sided node, tagging it with its provenance. Folder subtrees
/// are reconciled against an empty level so sibling ordering and
/// provenance tagging hold at every depth.
fn keep(node: &Node, origin: Provenance, policy: MergePolicy) -> Node {
    let body = match &node.body {
        NodeBody::Leaf(payload) => NodeBody::Leaf(payload.clone()),
        NodeBody::Folder(children) => NodeBody::Folder(match origin {
            Provenance::Incoming => reconcile_level(children, &[], policy),
            Provenance::Authoritative => reconcile_level(&[], children, policy),
        }),
    };
    Node {
        name: node.name.clone(),
        postman_id: node.postman_id.clone(),
        id: node.id.clone(),
        body,
        origin: Some(origin),
        merged: false,
    }
}

/// Replace-policy path: emit the incoming level only, recursively sorted.
/// Authoritative content never participates.
pub(super) fn replace_level(incoming: &[Node]) -> Vec<Node> {
    let inc = LevelIndex::build(incoming);

    let mut out = Vec::new();
    for leaf in inc.leaves.into_values() {
        out.push(Node {
            name: leaf.name.clone(),
            postman_id: leaf.postman_id.clone(),
            id: leaf.id.clone(),
            body: leaf.body.clone(),
            origin: Some(Provenance::Incoming),
            merged: false,
        });
    }
    for folder in inc.folders.into_values() {
        out.push(Node {
            name: folder.name.clone(),
            postman_id: folder.postman_id.clone(),
            id: folder.id.clone(),
            body: NodeBody::Folder(replace_level(folder.children().unwrap_or(&[]))),
            origin: Some(Provenance::Incoming),
            merged: false,
        });
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LeafPayload;

    fn leaf(name: &str) -> Node {
        Node::leaf(name, LeafPayload::default())
    }

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_reconcile_keeps_authoritative_only_leaves() {
        let incoming = vec![leaf("b")];
        let authoritative = vec![leaf("a")];
        let out = reconcile_level(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
        assert_eq!(names(&out), vec!["a", "b"]);
        assert_eq!(out[0].origin, Some(Provenance::Authoritative));
        assert_eq!(out[1].origin, Some(Provenance::Incoming));
        assert!(!out[0].merged);
    }

    #[test]
    fn test_reconcile_marks_matched_leaves_merged() {
        let incoming = vec![leaf("a")];
        let authoritative = vec![leaf("a")];
        let out = reconcile_level(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
        assert_eq!(out.len(), 1);
        assert!(out[0].merged);
    }

    #[test]
    fn test_matched_folders_recurse_and_union_children() {
        let incoming = vec![Node::folder("Users", vec![leaf("DELETE /users/1")])];
        let authoritative = vec![Node::folder("Users", vec![leaf("GET /users")])];
        let out = reconcile_level(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
        assert_eq!(out.len(), 1);
        assert!(out[0].merged);
        assert_eq!(
            names(out[0].children().unwrap()),
            vec!["DELETE /users/1", "GET /users"]
        );
    }

    #[test]
    fn test_merged_folder_origin_follows_the_policy_winner() {
        let incoming = vec![Node::folder("Users", vec![leaf("a")])];
        let authoritative = vec![Node::folder("Users", vec![leaf("b")])];

        let auth_wins =
            reconcile_level(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
        assert_eq!(auth_wins[0].origin, Some(Provenance::Authoritative));

        let inc_wins = reconcile_level(&incoming, &authoritative, MergePolicy::PreserveIncoming);
        assert_eq!(inc_wins[0].origin, Some(Provenance::Incoming));
        assert!(inc_wins[0].merged);
    }

    #[test]
    fn test_kept_folder_subtree_is_sorted_and_tagged() {
        let authoritative = vec![Node::folder("Users", vec![leaf("z"), leaf("a")])];
        let out = reconcile_level(&[], &authoritative, MergePolicy::PreserveAuthoritative);
        let children = out[0].children().unwrap();
        assert_eq!(names(children), vec!["a", "z"]);
        assert!(children
            .iter()
            .all(|c| c.origin == Some(Provenance::Authoritative)));
    }

    #[test]
    fn test_leaf_and_folder_sharing_a_name_both_survive() {
        let incoming = vec![leaf("Users")];
        let authoritative = vec![Node::folder("Users", Vec::new())];
        let out = reconcile_level(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_replace_ignores_authoritative_entirely() {
        let incoming = vec![leaf("b"), Node::folder("A", vec![leaf("z"), leaf("a")])];
        let out = replace_level(&incoming);
        assert_eq!(names(&out), vec!["A", "b"]);
        assert_eq!(names(out[0].children().unwrap()), vec!["a", "z"]);
        assert!(out.iter().all(|n| n.origin == Some(Provenance::Incoming)));
    }
}
