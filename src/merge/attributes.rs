//! Attribute-level merge for one matched leaf pair.
//!
//! The policy selects a winner; the winner's fields take precedence at
//! every nesting level of the opaque request document. Arrays are replaced
//! wholesale by the winner's value, except the `query` parameter list,
//! which takes the key-union of both sides. The rule is symmetric in the
//! winner argument.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::tree::{LeafPayload, Node, NodeBody, Provenance};

use super::MergePolicy;

/// Field whose array value takes the key-union instead of wholesale
/// replacement.
const QUERY_FIELD: &str = "query";

static EMPTY_PAYLOAD: LeafPayload = LeafPayload {
    request: None,
    response: Vec::new(),
    description: None,
};

/// Merge a matched incoming/authoritative leaf pair under `policy`.
pub(super) fn merge_leaf(incoming: &Node, authoritative: &Node, policy: MergePolicy) -> Node {
    let (winner, loser, origin) = match policy {
        MergePolicy::PreserveIncoming => (incoming, authoritative, Provenance::Incoming),
        _ => (authoritative, incoming, Provenance::Authoritative),
    };
    let w = payload(winner);
    let l = payload(loser);

    let request = match (&w.request, &l.request) {
        (Some(wr), Some(lr)) => Some(deep_merge(wr, lr)),
        (Some(wr), None) => Some(wr.clone()),
        (None, Some(lr)) => Some(lr.clone()),
        (None, None) => None,
    };
    let response = if !w.response.is_empty() {
        w.response.clone()
    } else {
        l.response.clone()
    };
    let description = match &w.description {
        Some(d) if !d.is_empty() => Some(d.clone()),
        _ => l.description.clone(),
    };

    Node {
        name: winner.name.clone(),
        // Identity never comes from the deep merge; the authoritative side
        // has priority under every policy.
        postman_id: authoritative
            .postman_id
            .clone()
            .or_else(|| incoming.postman_id.clone()),
        id: authoritative.id.clone().or_else(|| incoming.id.clone()),
        body: NodeBody::Leaf(LeafPayload {
            request,
            response,
            description,
        }),
        origin: Some(origin),
        merged: true,
    }
}

fn payload(node: &Node) -> &LeafPayload {
    match &node.body {
        NodeBody::Leaf(payload) => payload,
        // The level index only pairs leaves with leaves; degrade rather
        // than panic if that ever changes.
        NodeBody::Folder(_) => &EMPTY_PAYLOAD,
    }
}

/// Deep merge with winner precedence at every nesting level.
pub(super) fn deep_merge(winner: &Value, loser: &Value) -> Value {
    match (winner, loser) {
        (Value::Object(w), Value::Object(l)) => {
            let mut out = Map::new();
            for (key, wv) in w {
                match l.get(key) {
                    Some(lv) => out.insert(key.clone(), merge_field(key, wv, lv)),
                    None => out.insert(key.clone(), wv.clone()),
                };
            }
            for (key, lv) in l {
                if !w.contains_key(key) {
                    out.insert(key.clone(), lv.clone());
                }
            }
            Value::Object(out)
        }
        _ => winner.clone(),
    }
}

fn merge_field(key: &str, winner: &Value, loser: &Value) -> Value {
    match (winner, loser) {
        (Value::Array(w), Value::Array(l)) if key == QUERY_FIELD => merge_query_params(w, l),
        (Value::Array(_), Value::Array(_)) => winner.clone(),
        (Value::Object(_), Value::Object(_)) => deep_merge(winner, loser),
        _ => winner.clone(),
    }
}

/// Union of two parameter lists keyed by each entry's `key` field: winner
/// entries first, then loser entries whose key is absent from the winner.
/// Key-colliding loser entries are dropped, and a key the loser repeats is
/// appended only once.
fn merge_query_params(winner: &[Value], loser: &[Value]) -> Value {
    let mut seen: HashSet<&str> = winner.iter().map(param_key).collect();
    let mut out = winner.to_vec();
    for param in loser {
        if seen.insert(param_key(param)) {
            out.push(param.clone());
        }
    }
    Value::Array(out)
}

/// Entries with no `key` field compare as keyed by the empty string.
fn param_key(param: &Value) -> &str {
    param.get("key").and_then(Value::as_str).unwrap_or("")
}
