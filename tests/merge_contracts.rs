//! Merge engine contracts: the literal behaviors promised to users.

use serde_json::json;
use specsync::merge::{merge, MergePolicy};
use specsync::tree::{LeafPayload, Node, NodeBody, Provenance, Tree};

fn leaf(name: &str) -> Node {
    Node::leaf(name, LeafPayload::default())
}

fn leaf_with(name: &str, payload: LeafPayload) -> Node {
    Node::leaf(name, payload)
}

fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

fn payload(node: &Node) -> &LeafPayload {
    match &node.body {
        NodeBody::Leaf(p) => p,
        _ => panic!("expected leaf"),
    }
}

#[test]
fn manual_only_endpoint_survives_under_preserve_policies() {
    // Authoritative has `GET /users` with a manual description and no
    // incoming counterpart.
    let authoritative = Tree::authoritative(vec![leaf_with(
        "GET /users",
        LeafPayload {
            description: Some("list all".to_string()),
            ..Default::default()
        },
    )]);
    let incoming = Tree::incoming(vec![]);

    for policy in [
        MergePolicy::PreserveAuthoritative,
        MergePolicy::PreserveIncoming,
    ] {
        let merged = merge(&incoming, &authoritative, policy);
        assert_eq!(names(&merged.nodes), vec!["GET /users"]);
        assert_eq!(
            payload(&merged.nodes[0]).description.as_deref(),
            Some("list all")
        );
        assert_eq!(merged.nodes[0].origin, Some(Provenance::Authoritative));
    }

    // Replace drops it.
    let merged = merge(&incoming, &authoritative, MergePolicy::Replace);
    assert!(merged.nodes.is_empty());
}

#[test]
fn new_incoming_endpoint_appears_under_every_policy() {
    let incoming = Tree::incoming(vec![leaf("DELETE /users/{id}")]);
    let authoritative = Tree::authoritative(vec![]);

    for policy in [
        MergePolicy::PreserveAuthoritative,
        MergePolicy::PreserveIncoming,
        MergePolicy::Replace,
    ] {
        let merged = merge(&incoming, &authoritative, policy);
        assert_eq!(names(&merged.nodes), vec!["DELETE /users/{id}"]);
        assert_eq!(merged.nodes[0].origin, Some(Provenance::Incoming));
    }
}

#[test]
fn matched_leaf_query_parameters_take_the_union() {
    let authoritative = Tree::authoritative(vec![leaf_with(
        "POST /login",
        LeafPayload {
            request: Some(json!({"query": [{"key": "debug", "value": "auth"}]})),
            ..Default::default()
        },
    )]);
    let incoming = Tree::incoming(vec![leaf_with(
        "POST /login",
        LeafPayload {
            request: Some(json!({
                "query": [
                    {"key": "debug", "value": "inc"},
                    {"key": "redirect", "value": "/"}
                ]
            })),
            ..Default::default()
        },
    )]);

    let merged = merge(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
    assert_eq!(merged.nodes.len(), 1);
    assert!(merged.nodes[0].merged);
    let request = payload(&merged.nodes[0]).request.as_ref().unwrap();
    assert_eq!(
        request["query"],
        json!([
            {"key": "debug", "value": "auth"},
            {"key": "redirect", "value": "/"}
        ])
    );
}

#[test]
fn matched_folders_union_their_children_recursively() {
    let authoritative = Tree::authoritative(vec![Node::folder(
        "Users",
        vec![leaf("GET /users"), leaf("PATCH /users/{id}")],
    )]);
    let incoming = Tree::incoming(vec![Node::folder(
        "Users",
        vec![leaf("GET /users"), leaf("DELETE /users/{id}")],
    )]);

    let merged = merge(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
    assert_eq!(names(&merged.nodes), vec!["Users"]);
    let children = merged.nodes[0].children().unwrap();
    assert_eq!(
        names(children),
        vec!["DELETE /users/{id}", "GET /users", "PATCH /users/{id}"]
    );
    assert!(children.iter().find(|c| c.name == "GET /users").unwrap().merged);
}

#[test]
fn replace_output_is_the_sorted_incoming_tree_regardless_of_authoritative() {
    let incoming = Tree::incoming(vec![
        leaf("z"),
        Node::folder("Folder", vec![leaf("b"), leaf("a")]),
    ]);
    let other = Tree::authoritative(vec![leaf("kept-nowhere"), Node::folder("Old", vec![])]);

    let merged = merge(&incoming, &other, MergePolicy::Replace);
    let against_empty = merge(
        &incoming,
        &Tree::authoritative(vec![]),
        MergePolicy::Replace,
    );
    assert_eq!(merged, against_empty);
    assert_eq!(names(&merged.nodes), vec!["Folder", "z"]);
    assert_eq!(names(merged.nodes[0].children().unwrap()), vec!["a", "b"]);
}

#[test]
fn stable_identifier_drives_merged_id_under_every_policy() {
    let mut stored = leaf_with(
        "GET /users",
        LeafPayload {
            description: Some("manual".to_string()),
            ..Default::default()
        },
    );
    stored.postman_id = Some("stable-42".to_string());
    stored.id = Some("incidental".to_string());
    let authoritative = Tree::authoritative(vec![stored]);
    let incoming = Tree::incoming(vec![leaf("GET /users")]);

    for policy in [
        MergePolicy::PreserveAuthoritative,
        MergePolicy::PreserveIncoming,
    ] {
        let merged = merge(&incoming, &authoritative, policy);
        assert_eq!(merged.nodes[0].id.as_deref(), Some("stable-42"));
        assert_eq!(merged.nodes[0].postman_id.as_deref(), Some("stable-42"));
    }
}

#[test]
fn merged_output_order_is_independent_of_input_order() {
    let forward = Tree::incoming(vec![leaf("a"), leaf("b"), leaf("c")]);
    let backward = Tree::incoming(vec![leaf("c"), leaf("b"), leaf("a")]);
    let authoritative = Tree::authoritative(vec![leaf("d"), leaf("b")]);

    let lhs = merge(&forward, &authoritative, MergePolicy::PreserveAuthoritative);
    let rhs = merge(&backward, &authoritative, MergePolicy::PreserveAuthoritative);
    assert_eq!(lhs, rhs);
    assert_eq!(names(&lhs.nodes), vec!["a", "b", "c", "d"]);
}

#[test]
fn inputs_are_left_untouched_by_the_merge() {
    let incoming = Tree::incoming(vec![leaf("b"), leaf("a")]);
    let authoritative = Tree::authoritative(vec![Node::folder("F", vec![leaf("x")])]);
    let incoming_before = incoming.clone();
    let authoritative_before = authoritative.clone();

    let _ = merge(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);

    assert_eq!(incoming, incoming_before);
    assert_eq!(authoritative, authoritative_before);
}

#[test]
fn winner_description_and_examples_follow_the_policy() {
    let authoritative = Tree::authoritative(vec![leaf_with(
        "POST /login",
        LeafPayload {
            response: vec![json!({"name": "manual example"})],
            description: Some("manual".to_string()),
            ..Default::default()
        },
    )]);
    let incoming = Tree::incoming(vec![leaf_with(
        "POST /login",
        LeafPayload {
            response: vec![json!({"name": "generated example"})],
            description: Some("generated".to_string()),
            ..Default::default()
        },
    )]);

    let auth_wins = merge(&incoming, &authoritative, MergePolicy::PreserveAuthoritative);
    assert_eq!(
        payload(&auth_wins.nodes[0]).description.as_deref(),
        Some("manual")
    );
    assert_eq!(
        payload(&auth_wins.nodes[0]).response,
        vec![json!({"name": "manual example"})]
    );

    let inc_wins = merge(&incoming, &authoritative, MergePolicy::PreserveIncoming);
    assert_eq!(
        payload(&inc_wins.nodes[0]).description.as_deref(),
        Some("generated")
    );
    assert_eq!(
        payload(&inc_wins.nodes[0]).response,
        vec![json!({"name": "generated example"})]
    );
}
