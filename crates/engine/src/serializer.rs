//! Translation between the in-memory graph and the execution-service payload.
//!
//! Both directions are pure. [`serialize`] drops rendering-only state
//! (selection flags, connection handles) and keeps node positions;
//! [`deserialize`] rebuilds entities without filling in defaults, which is
//! the editors' job.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::models::{Edge, EdgeData, Node, NodeData};
use crate::wire::{Workflow, WorkflowEdge, WorkflowNode, WorkflowRequest};
use crate::EngineError;

/// Input payload the execute panel starts with.
pub const DEFAULT_INPUT: &str = "{\n  \"message\": \"Hello world\"\n}";

/// Fresh, timestamp-derived workflow name. Not stable across calls.
pub fn workflow_name() -> String {
    format!("workflow_{}", Utc::now().timestamp_millis())
}

/// Build an execution request from the current graph.
pub fn serialize(nodes: &[Node], edges: &[Edge], input: Map<String, Value>) -> WorkflowRequest {
    let nodes = nodes
        .iter()
        .map(|node| WorkflowNode {
            id: node.id.clone(),
            node_type: node.type_name().to_owned(),
            data: node.data.to_map(),
            position: node.position,
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| WorkflowEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: Some(edge.kind.clone().unwrap_or_default()),
            data: edge.data.as_ref().map(edge_data_map),
        })
        .collect();

    WorkflowRequest {
        workflow: Workflow {
            name: Some(workflow_name()),
            nodes,
            edges,
        },
        input,
    }
}

fn edge_data_map(data: &EdgeData) -> Map<String, Value> {
    match serde_json::to_value(data) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Rebuild nodes and edges from a request payload.
///
/// # Errors
/// [`EngineError::InvalidNodeData`] if a node's data does not fit its type,
/// [`EngineError::InvalidEdgeData`] if an edge's data is ill-typed.
pub fn deserialize(request: &WorkflowRequest) -> Result<(Vec<Node>, Vec<Edge>), EngineError> {
    deserialize_workflow(&request.workflow)
}

/// Like [`deserialize`], for a bare workflow definition.
pub fn deserialize_workflow(workflow: &Workflow) -> Result<(Vec<Node>, Vec<Edge>), EngineError> {
    let nodes = workflow
        .nodes
        .iter()
        .map(|wire| -> Result<Node, EngineError> {
            let data = NodeData::from_map(&wire.node_type, wire.data.clone()).map_err(|source| {
                EngineError::InvalidNodeData {
                    node_id: wire.id.clone(),
                    source,
                }
            })?;
            Ok(Node::new(wire.id.clone(), wire.position, data))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let edges = workflow
        .edges
        .iter()
        .map(|wire| -> Result<Edge, EngineError> {
            let data = wire
                .data
                .as_ref()
                .map(|map| serde_json::from_value::<EdgeData>(Value::Object(map.clone())))
                .transpose()
                .map_err(|source| EngineError::InvalidEdgeData {
                    edge_id: wire.id.clone(),
                    source,
                })?;
            Ok(Edge {
                id: wire.id.clone(),
                source: wire.source.clone(),
                target: wire.target.clone(),
                source_handle: None,
                target_handle: None,
                kind: wire.edge_type.clone(),
                data,
                selected: false,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((nodes, edges))
}

/// Parse the user's execution input.
///
/// # Errors
/// [`EngineError::MalformedInput`] if the text is not a JSON object.
pub fn parse_input(text: &str) -> Result<Map<String, Value>, EngineError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EngineError::MalformedInput(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(EngineError::MalformedInput(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
