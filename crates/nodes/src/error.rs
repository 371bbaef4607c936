//! Catalog-level error type.

use thiserror::Error;

/// Errors produced when resolving names against the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The name does not match any entry in [`crate::NODE_TYPES`].
    #[error("unknown node type: '{0}'")]
    UnknownNodeType(String),
}
