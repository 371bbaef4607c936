//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the graph store and the serializer.
///
/// None of these leave the store partially mutated: every operation that can
/// fail computes its result before touching state.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Identity errors ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// Two or more edges share the same ID.
    #[error("duplicate edge ID: '{0}'")]
    DuplicateEdgeId(String),

    // ------ Data errors ------

    /// A node's data fields do not fit its type's schema.
    #[error("invalid data for node '{node_id}': {source}")]
    InvalidNodeData {
        node_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// An edge's data fields do not fit the edge schema.
    #[error("invalid data for edge '{edge_id}': {source}")]
    InvalidEdgeData {
        edge_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The execution input is not a JSON object.
    #[error("invalid input JSON: {0}")]
    MalformedInput(String),
}

/// Errors surfaced by the node and edge editors.
#[derive(Debug, Error)]
pub enum EditorError {
    /// `save`, `cancel` or a field edit was requested with no editor open.
    #[error("no entity is selected for editing")]
    NoActiveEditor,

    /// Edge deletion was requested while no edge is selected.
    #[error("no edge is selected")]
    NoEdgeSelected,

    /// The field is not part of this node type's form.
    #[error("field '{field}' does not apply to '{node_type}' nodes")]
    FieldNotApplicable {
        field: &'static str,
        node_type: String,
    },

    #[error("temperature {0} is outside 0.0..=1.0")]
    TemperatureOutOfRange(f64),

    #[error("unknown model: '{0}'")]
    UnknownModel(String),

    /// Only `default` and `conditional` can be picked in the edge editor.
    #[error("edge type '{0}' cannot be selected")]
    UnsupportedEdgeKind(String),

    #[error(transparent)]
    Store(#[from] EngineError),
}
