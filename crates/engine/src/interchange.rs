//! Reading and writing the editor's workflow JSON.
//!
//! The document is `{ "nodes": [...], "edges": [...] }`. Two node shapes are
//! accepted because the editor produced both:
//!
//! - canvas export: `{ "id", "type": "custom", "position": {..}, "data": {..} }`
//! - serialized form: `{ "id", "type": "<kind>", "data": {..} }`
//!
//! The kind is always read from `data.type`, the caption from `data.label`.
//! Canvas-only keys (`position`, `animated`, handles) are ignored. Export
//! always writes the serialized form.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::{EdgeRecord, GraphModel, NodeData, NodeRecord};
use crate::EngineError;

#[derive(Deserialize)]
struct NodeEntry {
    id: String,
    data: Value,
}

#[derive(Deserialize)]
struct EdgeEntry {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
}

/// Parse a workflow document.
///
/// Missing `nodes`/`edges` keys read as empty lists.
///
/// # Errors
/// - [`EngineError::InvalidJson`] if `json` is not JSON.
/// - [`EngineError::NotAnObject`] / [`EngineError::NotAnArray`] for a wrong outer shape.
/// - [`EngineError::InvalidNode`] / [`EngineError::InvalidEdge`] for an unreadable entry.
pub fn parse_document(json: &str) -> Result<GraphModel, EngineError> {
    let doc: Value = serde_json::from_str(json)?;
    from_value(&doc)
}

/// Same as [`parse_document`] for an already-parsed JSON value.
pub fn from_value(doc: &Value) -> Result<GraphModel, EngineError> {
    let obj = doc.as_object().ok_or(EngineError::NotAnObject)?;

    let nodes = array_field(obj, "nodes")?
        .iter()
        .enumerate()
        .map(|(index, item)| read_node(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let edges = array_field(obj, "edges")?
        .iter()
        .enumerate()
        .map(|(index, item)| read_edge(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GraphModel::new(nodes, edges))
}

fn array_field<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<&'a [Value], EngineError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(EngineError::NotAnArray { key }),
    }
}

fn read_node(index: usize, item: &Value) -> Result<NodeRecord, EngineError> {
    let invalid = |source: serde_json::Error| EngineError::InvalidNode {
        index,
        node_id: item
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_owned(),
        source,
    };

    let entry = NodeEntry::deserialize(item).map_err(invalid)?;
    let data = NodeData::deserialize(&entry.data).map_err(invalid)?;
    let label = entry
        .data
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(NodeRecord::new(entry.id, label, data))
}

fn read_edge(index: usize, item: &Value) -> Result<EdgeRecord, EngineError> {
    let entry =
        EdgeEntry::deserialize(item).map_err(|source| EngineError::InvalidEdge { index, source })?;

    Ok(match entry.id.filter(|id| !id.is_empty()) {
        Some(id) => EdgeRecord::new(id, entry.source, entry.target),
        None => EdgeRecord::between(entry.source, entry.target),
    })
}

/// Export `graph` in the serialized form.
///
/// # Errors
/// [`EngineError::InvalidJson`] if a payload cannot be represented as JSON.
pub fn to_document(graph: &GraphModel) -> Result<Value, EngineError> {
    let nodes = graph
        .nodes
        .iter()
        .map(write_node)
        .collect::<Result<Vec<_>, _>>()?;

    let edges: Vec<Value> = graph
        .edges
        .iter()
        .map(|e| json!({ "id": e.id, "source": e.source, "target": e.target }))
        .collect();

    Ok(json!({ "nodes": nodes, "edges": edges }))
}

/// [`to_document`], pretty-printed.
pub fn to_json_pretty(graph: &GraphModel) -> Result<String, EngineError> {
    Ok(serde_json::to_string_pretty(&to_document(graph)?)?)
}

fn write_node(node: &NodeRecord) -> Result<Value, EngineError> {
    let mut data = serde_json::to_value(&node.data)?;
    if let Value::Object(map) = &mut data {
        map.insert("id".to_owned(), Value::String(node.id.clone()));
        map.insert("label".to_owned(), Value::String(node.label.clone()));
    }

    Ok(json!({ "id": node.id, "type": node.kind().as_str(), "data": data }))
}
