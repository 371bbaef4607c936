//! Wire format exchanged with the workflow execution service.
//!
//! Field names are camelCase on the wire. Fields this crate does not model are
//! kept in `extra` maps where the backend is allowed to add them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nodes::EdgeKind;

use crate::models::Position;

/// A node as the execution service sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub position: Position,
}

/// An edge as the execution service sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

/// Body of `POST /api/workflow/execute` and `POST /validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub workflow: Workflow,
    #[serde(default)]
    pub input: Map<String, Value>,
}

/// Body returned by `POST /api/workflow/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    #[serde(default)]
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_keeps_unmodelled_fields() {
        let response: WorkflowResponse = serde_json::from_value(json!({
            "output": { "text": "hi" },
            "executionTime": 1.25,
            "status": "success",
            "trace": ["a", "b"],
        }))
        .unwrap();

        assert_eq!(response.execution_time, Some(1.25));
        assert_eq!(response.extra["trace"], json!(["a", "b"]));
        assert_eq!(serde_json::to_value(&response).unwrap()["executionTime"], json!(1.25));
    }

    #[test]
    fn edge_type_may_be_absent() {
        let edge: WorkflowEdge =
            serde_json::from_value(json!({ "id": "e1", "source": "a", "target": "b" })).unwrap();
        assert_eq!(edge.edge_type, None);
        assert_eq!(edge.data, None);
    }
}
