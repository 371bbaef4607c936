//! Static configuration tables for node and edge variants.
//!
//! The tables are consulted at creation time only and are never mutated.
//! [`NodeTypeConfig::default_data`] hands out a fresh copy of the template on
//! every call so callers can never alias the table's contents.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{EdgeKind, NodeKind};

/// Model the prompt editor shows when a node stores none.
pub const DEFAULT_PROMPT_MODEL: &str = "gpt-4o";

/// Temperature the prompt editor shows when a node stores none.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Models offered by the prompt editor.
pub const DEFAULT_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-3.5-turbo",
    "claude-3-opus",
    "claude-3-sonnet",
];

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// One row of the node-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeTypeConfig {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

impl NodeTypeConfig {
    /// A fresh copy of the data template new nodes of this type start with.
    pub fn default_data(&self) -> Map<String, Value> {
        let template = match self.kind {
            NodeKind::Input | NodeKind::Output => json!({}),
            NodeKind::Prompt => json!({
                "systemPrompt": "You are a helpful assistant.",
                "userPrompt": "Process: {{input}}",
                "model": DEFAULT_PROMPT_MODEL,
                "temperature": DEFAULT_TEMPERATURE,
            }),
        };

        match template {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Node variants in the order the "add node" panel lists them.
pub const NODE_TYPES: &[NodeTypeConfig] = &[
    NodeTypeConfig {
        kind: NodeKind::Input,
        label: "Input",
        description: "Starting point of the workflow",
        color: "#10b981",
    },
    NodeTypeConfig {
        kind: NodeKind::Prompt,
        label: "Prompt",
        description: "AI prompt execution node",
        color: "#3b82f6",
    },
    NodeTypeConfig {
        kind: NodeKind::Output,
        label: "Output",
        description: "End point of the workflow",
        color: "#ef4444",
    },
];

/// Look up a node type by its wire name.
pub fn node_type(name: &str) -> Option<&'static NodeTypeConfig> {
    NODE_TYPES.iter().find(|config| config.kind.as_str() == name)
}

// ---------------------------------------------------------------------------
// Edge types
// ---------------------------------------------------------------------------

/// One row of the edge-type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeTypeConfig {
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub label: &'static str,
    pub description: &'static str,
}

/// Edge variants. `merge` is declared here but has no behaviour.
pub static EDGE_TYPES: &[EdgeTypeConfig] = &[
    EdgeTypeConfig {
        kind: EdgeKind::Default,
        label: "Default",
        description: "Standard sequential connection",
    },
    EdgeTypeConfig {
        kind: EdgeKind::Conditional,
        label: "Conditional",
        description: "Conditional branch based on output",
    },
    EdgeTypeConfig {
        kind: EdgeKind::Merge,
        label: "Merge",
        description: "Merge multiple paths",
    },
];

/// Look up an edge type by its wire name.
pub fn edge_type(name: &str) -> Option<&'static EdgeTypeConfig> {
    EDGE_TYPES.iter().find(|config| config.kind.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_kind_has_exactly_one_entry() {
        for kind in NodeKind::ALL {
            let rows = NODE_TYPES.iter().filter(|c| c.kind == kind).count();
            assert_eq!(rows, 1, "{kind} should appear once");
        }
    }

    #[test]
    fn unknown_type_is_not_found() {
        assert!(node_type("bogus-type").is_none());
        assert_eq!(node_type("prompt").map(|c| c.label), Some("Prompt"));
    }

    #[test]
    fn prompt_template_is_copied_per_call() {
        let config = node_type("prompt").unwrap();
        let mut first = config.default_data();
        first.insert("model".into(), json!("claude-3-opus"));

        let second = config.default_data();
        assert_eq!(second["model"], json!("gpt-4o"));
        assert_eq!(second["temperature"], json!(0.7));
        assert_eq!(second.len(), 4);
    }

    #[test]
    fn input_and_output_start_empty() {
        assert!(node_type("input").unwrap().default_data().is_empty());
        assert!(node_type("output").unwrap().default_data().is_empty());
    }

    #[test]
    fn merge_is_declared_but_not_editable() {
        let merge = EDGE_TYPES.iter().find(|e| e.kind == EdgeKind::Merge).unwrap();
        assert!(!merge.kind.is_editable());
    }

    #[test]
    fn edge_types_are_found_by_wire_name() {
        assert_eq!(edge_type("conditional").map(|c| c.label), Some("Conditional"));
        assert_eq!(edge_type("merge").map(|c| &c.kind), Some(&EdgeKind::Merge));
        assert!(edge_type("Conditional").is_none());
    }
}
