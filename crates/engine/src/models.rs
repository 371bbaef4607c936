//! Core domain models for the workflow editor.
//!
//! These types are the source of truth for what a workflow graph looks like
//! in memory. They are translated to and from the execution-service wire
//! format by [`crate::serializer`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nodes::{EdgeKind, NodeKind};

/// A shallow patch of data fields. `null` values clear the key.
pub type DataPatch = Map<String, Value>;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Canvas coordinate of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Node data
// ---------------------------------------------------------------------------

/// Fields shared by every node variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields this editor does not interpret, kept for the backend.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a `prompt` node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed node payload; the variant is the node's type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Input(BaseData),
    Prompt(PromptData),
    Output(BaseData),
    /// A type the catalog does not list. Only the label is interpreted.
    Unrecognized { node_type: String, data: BaseData },
}

impl NodeData {
    /// Build the payload for `node_type` from a raw field map.
    ///
    /// Fails when a known field holds a value of the wrong JSON type.
    pub fn from_map(node_type: &str, map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let value = Value::Object(map);
        let data = match node_type.parse::<NodeKind>() {
            Ok(NodeKind::Input) => Self::Input(serde_json::from_value(value)?),
            Ok(NodeKind::Prompt) => Self::Prompt(serde_json::from_value(value)?),
            Ok(NodeKind::Output) => Self::Output(serde_json::from_value(value)?),
            Err(_) => Self::Unrecognized {
                node_type: node_type.to_owned(),
                data: serde_json::from_value(value)?,
            },
        };
        Ok(data)
    }

    /// Flatten the payload back into a raw field map.
    pub fn to_map(&self) -> Map<String, Value> {
        let value = match self {
            Self::Input(data) | Self::Output(data) => serde_json::to_value(data),
            Self::Unrecognized { data, .. } => serde_json::to_value(data),
            Self::Prompt(data) => serde_json::to_value(data),
        };

        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Shallow-merge `patch` over the current fields, producing a new payload.
    ///
    /// A `null` value removes the key. The receiver is left untouched, so a
    /// failed merge never leaves a half-applied payload behind.
    pub fn merged(&self, patch: &DataPatch) -> Result<Self, serde_json::Error> {
        let mut map = self.to_map();
        for (key, value) in patch {
            if value.is_null() {
                map.remove(key);
            } else {
                map.insert(key.clone(), value.clone());
            }
        }
        Self::from_map(self.type_name(), map)
    }

    /// Wire name of the node type.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Input(_) => NodeKind::Input.as_str(),
            Self::Prompt(_) => NodeKind::Prompt.as_str(),
            Self::Output(_) => NodeKind::Output.as_str(),
            Self::Unrecognized { node_type, .. } => node_type,
        }
    }

    /// Catalog variant, if the type is one the editor knows.
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            Self::Input(_) => Some(NodeKind::Input),
            Self::Prompt(_) => Some(NodeKind::Prompt),
            Self::Output(_) => Some(NodeKind::Output),
            Self::Unrecognized { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Input(data) | Self::Output(data) => data.label.as_deref(),
            Self::Unrecognized { data, .. } => data.label.as_deref(),
            Self::Prompt(data) => data.label.as_deref(),
        }
    }

    /// Text shown on the node body.
    ///
    /// Prompt nodes fall back to the head of their system prompt.
    pub fn display_text(&self) -> String {
        if let Some(label) = self.label() {
            return label.to_owned();
        }

        match self {
            Self::Prompt(PromptData {
                system_prompt: Some(prompt),
                ..
            }) if !prompt.is_empty() => {
                let head: String = prompt.chars().take(40).collect();
                format!("{head}...")
            }
            Self::Prompt(_) => "AI Prompt Node".to_owned(),
            Self::Input(_) => "Workflow Input".to_owned(),
            Self::Output(_) => "Workflow Output".to_owned(),
            Self::Unrecognized { node_type, .. } => node_type.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A workflow stage on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique within the graph; `{type}_{counter}` for nodes created here.
    pub id: String,
    pub position: Position,
    pub data: NodeData,
    /// Rendering-only flag; never serialized.
    pub selected: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
            selected: false,
        }
    }

    pub fn type_name(&self) -> &str {
        self.data.type_name()
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Optional payload of an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeData {
    /// Routing label matched by the execution engine on `conditional` edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique within the graph; `e{counter}` for edges created here.
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    /// Absent only on edges loaded from a payload that omitted it.
    pub kind: Option<EdgeKind>,
    pub data: Option<EdgeData>,
    /// Rendering-only flag; never serialized.
    pub selected: bool,
}

impl Edge {
    pub fn condition(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.condition.as_deref())
    }

    /// Label drawn on a conditional edge. Presentation only, never stored.
    pub fn condition_label(&self) -> String {
        match self.condition() {
            Some(condition) => condition.trim().to_uppercase(),
            None => "CONDITION".to_owned(),
        }
    }
}

/// A drag-to-connect gesture between two handles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }
}

/// Shallow update applied to an edge by [`crate::GraphStore::update_edge`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgePatch {
    pub kind: Option<EdgeKind>,
    pub data: Option<EdgeData>,
}

// ---------------------------------------------------------------------------
// Change batches from the rendering layer
// ---------------------------------------------------------------------------

/// Delta produced by the canvas for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    Position { id: String, position: Position },
    Select { id: String, selected: bool },
    Remove { id: String },
}

/// Delta produced by the canvas for an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeChange {
    Select { id: String, selected: bool },
    Remove { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn prompt_fields_are_typed_and_extras_kept() {
        let data = NodeData::from_map(
            "prompt",
            map(json!({ "model": "gpt-4o", "temperature": 0.2, "retries": 3 })),
        )
        .unwrap();

        let NodeData::Prompt(prompt) = &data else {
            panic!("expected prompt payload");
        };
        assert_eq!(prompt.model.as_deref(), Some("gpt-4o"));
        assert_eq!(prompt.temperature, Some(0.2));
        assert_eq!(prompt.extra["retries"], json!(3));
        assert_eq!(data.to_map()["retries"], json!(3));
    }

    #[test]
    fn unknown_type_keeps_its_name_and_fields() {
        let fields = map(json!({ "label": "r", "routes": [1, 2] }));
        let data = NodeData::from_map("router", fields).unwrap();
        assert_eq!(data.type_name(), "router");
        assert_eq!(data.kind(), None);
        assert_eq!(data.label(), Some("r"));
        assert_eq!(data.to_map()["routes"], json!([1, 2]));
    }

    #[test]
    fn ill_typed_known_field_is_rejected() {
        assert!(NodeData::from_map("prompt", map(json!({ "temperature": "hot" }))).is_err());
        assert!(NodeData::from_map("input", map(json!({ "label": 5 }))).is_err());
    }

    #[test]
    fn merge_overwrites_and_clears() {
        let data = NodeData::from_map("input", map(json!({ "label": "a", "x": 1 }))).unwrap();
        let merged = data.merged(&map(json!({ "label": "b", "x": null, "y": 2 }))).unwrap();
        assert_eq!(merged.to_map(), map(json!({ "label": "b", "y": 2 })));
        // the source payload is untouched
        assert_eq!(data.label(), Some("a"));
    }

    #[test]
    fn prompt_display_text_falls_back_to_system_prompt_head() {
        let long = "a".repeat(60);
        let data = NodeData::Prompt(PromptData {
            system_prompt: Some(long),
            ..PromptData::default()
        });
        assert_eq!(data.display_text(), format!("{}...", "a".repeat(40)));
        assert_eq!(NodeData::Prompt(PromptData::default()).display_text(), "AI Prompt Node");
    }

    #[test]
    fn input_and_output_fall_back_to_fixed_titles() {
        assert_eq!(NodeData::Input(BaseData::default()).display_text(), "Workflow Input");
        assert_eq!(NodeData::Output(BaseData::default()).display_text(), "Workflow Output");

        let labelled = NodeData::from_map("output", map(json!({ "label": "Reply" }))).unwrap();
        assert_eq!(labelled.display_text(), "Reply");
    }

    #[test]
    fn condition_label_is_trimmed_and_uppercased() {
        let mut edge = Edge {
            id: "e1".into(),
            source: "a".into(),
            target: "b".into(),
            source_handle: None,
            target_handle: None,
            kind: Some(EdgeKind::Conditional),
            data: Some(EdgeData {
                condition: Some("  billing ".into()),
                extra: Map::new(),
            }),
            selected: false,
        };
        assert_eq!(edge.condition_label(), "BILLING");
        assert_eq!(edge.condition(), Some("  billing "));

        edge.data = None;
        assert_eq!(edge.condition_label(), "CONDITION");
    }
}
