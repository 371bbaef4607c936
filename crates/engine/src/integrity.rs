//! Structural identity checks; run these before loading a graph into the store.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the graph.
//! 2. Edge IDs must be unique within the graph.
//!
//! Edges whose endpoints are missing are *reported*, not rejected: the editor
//! tolerates them and the execution service decides what they mean. Cycles,
//! self-loops and parallel edges are not inspected at all.

use std::collections::HashSet;
use std::fmt;

use crate::{
    models::{Edge, Node},
    EngineError,
};

/// Which end of an edge points at a missing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSide {
    Source,
    Target,
}

impl fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// An edge endpoint that references a node not present in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub edge_id: String,
    pub node_id: String,
    pub side: EdgeSide,
}

/// Result of a successful identity check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub dangling: Vec<DanglingEdge>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }
}

/// Check node/edge identity and collect dangling edge endpoints.
///
/// # Errors
/// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
/// - [`EngineError::DuplicateEdgeId`] if two edges share an ID.
pub fn check(nodes: &[Node], edges: &[Edge]) -> Result<IntegrityReport, EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs are unique
    // -----------------------------------------------------------------------
    let mut node_ids: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(EngineError::DuplicateNodeId(node.id.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Ensure edge IDs are unique
    // -----------------------------------------------------------------------
    let mut edge_ids: HashSet<&str> = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(EngineError::DuplicateEdgeId(edge.id.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 3. Collect dangling endpoints
    // -----------------------------------------------------------------------
    let mut report = IntegrityReport::default();
    for edge in edges {
        let ends = [(&edge.source, EdgeSide::Source), (&edge.target, EdgeSide::Target)];
        for (node_id, side) in ends {
            if !node_ids.contains(node_id.as_str()) {
                report.dangling.push(DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: node_id.clone(),
                    side,
                });
            }
        }
    }

    Ok(report)
}
