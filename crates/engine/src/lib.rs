//! `engine` crate: the in-memory workflow graph and everything that edits it.
//!
//! The [`GraphStore`] owns nodes and edges, the [`Selection`] tracks what the
//! user is editing, editors stage changes, and the serializer converts the
//! graph to and from the execution-service payload. [`EditorSession`] wires
//! them together behind one event surface.

pub mod editor;
pub mod error;
pub mod ids;
pub mod integrity;
pub mod models;
pub mod selection;
pub mod serializer;
pub mod session;
pub mod store;
pub mod wire;

pub use editor::{EdgeEditor, NodeEditor, NodeField, NodeForm};
pub use error::{EditorError, EngineError};
pub use ids::IdGenerator;
pub use integrity::{DanglingEdge, EdgeSide, IntegrityReport};
pub use models::{
    Connection, DataPatch, Edge, EdgeChange, EdgeData, EdgePatch, Node, NodeChange, NodeData,
    Position,
};
pub use selection::Selection;
pub use serializer::{deserialize, parse_input, serialize, DEFAULT_INPUT};
pub use session::{ActiveEditor, Confirm, EditorSession, GraphStats};
pub use store::{GraphStore, RemovedNode};
pub use wire::{Workflow, WorkflowEdge, WorkflowNode, WorkflowRequest, WorkflowResponse};
