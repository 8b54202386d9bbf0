//! OpenAPI document to incoming-tree conversion.
//!
//! Thin glue around the merge core: one leaf per operation, grouped into
//! folders by the first path segment. Request and response bodies are
//! carried opaquely; only query parameters get first-class treatment
//! because the merge rule unions them by key.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::SyncError;
use crate::tree::{LeafPayload, Node, Tree};

const METHODS: &[&str] = &[
    "get", "post", "put", "patch", "delete", "head", "options", "trace",
];

/// Convert a parsed OpenAPI document into an incoming tree.
pub fn to_tree(document: &Value) -> Result<Tree, SyncError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            SyncError::SpecError("specification has no paths object".to_string())
        })?;

    // Folders keyed by first path segment; operations on segment-less
    // paths stay at the root.
    let mut root: Vec<Node> = Vec::new();
    let mut folders: Vec<(String, Vec<Node>)> = Vec::new();

    for (path, item) in paths {
        let operations = match item.as_object() {
            Some(map) => map,
            None => continue,
        };
        for method in METHODS {
            let operation = match operations.get(*method).and_then(Value::as_object) {
                Some(op) => op,
                None => continue,
            };
            let leaf = operation_leaf(path, method, operation);
            match first_segment(path) {
                Some(segment) => match folders.iter_mut().find(|(name, _)| *name == segment) {
                    Some((_, children)) => children.push(leaf),
                    None => folders.push((segment, vec![leaf])),
                },
                None => root.push(leaf),
            }
        }
    }

    let mut nodes = root;
    for (name, children) in folders {
        nodes.push(Node::folder(name, children));
    }
    debug!(node_count = nodes.len(), "converted specification to tree");
    Ok(Tree::incoming(nodes))
}

fn operation_leaf(path: &str, method: &str, operation: &Map<String, Value>) -> Node {
    let name = operation
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", method.to_uppercase(), path));

    let mut request = Map::new();
    request.insert("method".to_string(), json!(method.to_uppercase()));
    request.insert("url".to_string(), json!({ "raw": path }));
    if let Some(desc) = operation.get("description").and_then(Value::as_str) {
        request.insert("description".to_string(), json!(desc));
    }

    let (query, header) = split_parameters(operation.get("parameters"));
    if !query.is_empty() {
        request.insert("query".to_string(), Value::Array(query));
    }
    if !header.is_empty() {
        request.insert("header".to_string(), Value::Array(header));
    }
    if let Some(body) = operation.get("requestBody") {
        request.insert("body".to_string(), body.clone());
    }

    let description = operation
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    Node::leaf(
        name,
        LeafPayload {
            request: Some(Value::Object(request)),
            response: response_examples(operation.get("responses")),
            description,
        },
    )
}

/// Split an OpenAPI parameter list into query and header entries in the
/// collection's `{key, value, description}` shape.
fn split_parameters(parameters: Option<&Value>) -> (Vec<Value>, Vec<Value>) {
    let mut query = Vec::new();
    let mut header = Vec::new();
    let list = match parameters.and_then(Value::as_array) {
        Some(list) => list,
        None => return (query, header),
    };
    for parameter in list {
        let name = match parameter.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => continue,
        };
        let mut entry = Map::new();
        entry.insert("key".to_string(), json!(name));
        entry.insert("value".to_string(), json!(""));
        if let Some(desc) = parameter.get("description").and_then(Value::as_str) {
            entry.insert("description".to_string(), json!(desc));
        }
        match parameter.get("in").and_then(Value::as_str) {
            Some("query") => query.push(Value::Object(entry)),
            Some("header") => header.push(Value::Object(entry)),
            _ => {}
        }
    }
    (query, header)
}

/// One saved example per documented response status.
fn response_examples(responses: Option<&Value>) -> Vec<Value> {
    let map = match responses.and_then(Value::as_object) {
        Some(map) => map,
        None => return Vec::new(),
    };
    map.iter()
        .map(|(status, body)| {
            let name = body
                .get("description")
                .and_then(Value::as_str)
                .map(|d| format!("{} {}", status, d))
                .unwrap_or_else(|| status.clone());
            json!({ "name": name, "code": status, "body": body })
        })
        .collect()
}

fn first_segment(path: &str) -> Option<String> {
    path.trim_matches('/')
        .split('/')
        .next()
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .map(str::to_string)
}
