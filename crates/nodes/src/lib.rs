//! `nodes` crate: the node-type and edge-type catalog.
//!
//! Every node variant the editor can create is listed in [`catalog::NODE_TYPES`].
//! Adding a variant means adding a table entry here plus an editor branch in
//! the engine crate.

pub mod catalog;
pub mod error;
pub mod kind;

pub use catalog::{
    edge_type, node_type, EdgeTypeConfig, NodeTypeConfig, DEFAULT_MODELS, DEFAULT_PROMPT_MODEL,
    DEFAULT_TEMPERATURE, EDGE_TYPES, NODE_TYPES,
};
pub use error::CatalogError;
pub use kind::{EdgeKind, NodeKind};
