//! Mapping between the hosted collection JSON format and the internal tree.
//!
//! A collection item is a folder iff it carries an `item` field; anything
//! else is treated as a leaf. A missing or non-list `item` on a folder (or
//! on the collection root) degrades to an empty child list with a
//! diagnostic, so a best-effort merge can still run.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::tree::{LeafPayload, MergedTree, Node, NodeBody, Tree};

/// Collection format schema written on create/update.
pub const COLLECTION_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Parse a fetched collection into the authoritative tree.
pub fn tree_from_collection(collection: &Value) -> Tree {
    let nodes = child_nodes("collection root", collection.get("item"));
    Tree::authoritative(nodes)
}

fn child_nodes(context: &str, items: Option<&Value>) -> Vec<Node> {
    match items {
        Some(Value::Array(list)) => list.iter().map(node_from_item).collect(),
        Some(_) => {
            warn!(
                context = context,
                "item list is not a sequence; treating as empty"
            );
            Vec::new()
        }
        None => {
            warn!(context = context, "item list is absent; treating as empty");
            Vec::new()
        }
    }
}

fn node_from_item(item: &Value) -> Node {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let postman_id = string_field(item, "_postman_id");
    let id = string_field(item, "id");

    let body = match item.get("item") {
        Some(children) => NodeBody::Folder(child_nodes(&name, Some(children))),
        None => NodeBody::Leaf(LeafPayload {
            request: item.get("request").cloned(),
            response: item
                .get("response")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            description: string_field(item, "description"),
        }),
    };

    Node {
        name,
        postman_id,
        id,
        body,
        origin: None,
        merged: false,
    }
}

fn string_field(item: &Value, field: &str) -> Option<String> {
    item.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Serialize the merged tree as collection content ready for create/update.
/// Provenance tags and merged flags are diagnostic-only and not written.
pub fn collection_to_json(name: &str, merged: &MergedTree) -> Value {
    json!({
        "info": {
            "name": name,
            "schema": COLLECTION_SCHEMA,
        },
        "item": merged.nodes.iter().map(item_from_node).collect::<Vec<_>>(),
    })
}

fn item_from_node(node: &Node) -> Value {
    let mut item = Map::new();
    item.insert("name".to_string(), json!(node.name));
    if let Some(id) = &node.id {
        item.insert("id".to_string(), json!(id));
    }
    if let Some(postman_id) = &node.postman_id {
        item.insert("_postman_id".to_string(), json!(postman_id));
    }
    match &node.body {
        NodeBody::Folder(children) => {
            item.insert(
                "item".to_string(),
                Value::Array(children.iter().map(item_from_node).collect()),
            );
        }
        NodeBody::Leaf(payload) => {
            if let Some(request) = &payload.request {
                item.insert("request".to_string(), request.clone());
            }
            if !payload.response.is_empty() {
                item.insert("response".to_string(), Value::Array(payload.response.clone()));
            }
            if let Some(description) = &payload.description {
                item.insert("description".to_string(), json!(description));
            }
        }
    }
    Value::Object(item)
}
