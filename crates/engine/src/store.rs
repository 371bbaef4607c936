//! The authoritative in-memory graph.
//!
//! `GraphStore` owns the nodes and edges of one editing session. Every
//! operation is synchronous and all-or-nothing: anything that can fail is
//! computed before state is touched. Operations addressed to an id that is not
//! present are silent no-ops, which makes removal and update safe to repeat.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::ids::IdGenerator;
use crate::integrity::{self, IntegrityReport};
use crate::models::{
    Connection, DataPatch, Edge, EdgeChange, EdgePatch, Node, NodeChange, NodeData, Position,
};
use crate::EngineError;

/// Extent of the square new nodes are scattered over when no position is given.
pub const DEFAULT_VIEWPORT: f64 = 400.0;

/// A node removed together with the edges that referenced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: Vec<Edge>,
}

/// Canonical node and edge collections plus the session's id source.
#[derive(Debug)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: IdGenerator,
    rng: StdRng,
}

impl GraphStore {
    /// Create an empty store drawing ids from `ids`.
    pub fn new(ids: IdGenerator) -> Self {
        Self::with_rng(ids, StdRng::from_entropy())
    }

    /// Create an empty store whose node placement is reproducible.
    pub fn with_seed(ids: IdGenerator, seed: u64) -> Self {
        Self::with_rng(ids, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ids: IdGenerator, rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            ids,
            rng,
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Add a node of `node_type` and return its id.
    ///
    /// Unknown types are ignored and yield `None`. Without a position hint the
    /// node lands somewhere inside the default viewport.
    pub fn add_node(&mut self, node_type: &str, hint: Option<Position>) -> Option<String> {
        let Some(config) = nodes::node_type(node_type) else {
            debug!(node_type, "ignoring add for unknown node type");
            return None;
        };

        let data = match NodeData::from_map(node_type, config.default_data()) {
            Ok(data) => data,
            Err(e) => {
                debug!(node_type, error = %e, "default template does not fit its type");
                return None;
            }
        };

        let position = hint.unwrap_or_else(|| {
            Position::new(
                self.rng.gen_range(0.0..DEFAULT_VIEWPORT),
                self.rng.gen_range(0.0..DEFAULT_VIEWPORT),
            )
        });

        let id = self.fresh_node_id(node_type);
        info!(node_id = %id, node_type, "node added");
        self.nodes.push(Node::new(id.clone(), position, data));
        Some(id)
    }

    /// Create a `default` edge for a connection gesture and return its id.
    ///
    /// Self-loops, parallel edges and cycles are all accepted.
    pub fn connect(&mut self, connection: Connection) -> String {
        let id = self.fresh_edge_id();
        info!(
            edge_id = %id,
            source = %connection.source,
            target = %connection.target,
            "edge added"
        );
        self.edges.push(Edge {
            id: id.clone(),
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            kind: Some(nodes::EdgeKind::Default),
            data: None,
            selected: false,
        });
        id
    }

    // Generated ids skip anything already in the graph, which only matters
    // after `load` brought in ids from elsewhere.
    fn fresh_node_id(&mut self, node_type: &str) -> String {
        loop {
            let id = self.ids.next_node_id(node_type);
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_edge_id(&mut self) -> String {
        loop {
            let id = self.ids.next_edge_id();
            if self.edge(&id).is_none() {
                return id;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Shallow-merge `patch` into a node's data.
    ///
    /// # Errors
    /// [`EngineError::InvalidNodeData`] if the merged fields no longer fit
    /// the node's type; the node is left as it was.
    pub fn update_node_data(&mut self, id: &str, patch: &DataPatch) -> Result<(), EngineError> {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            debug!(node_id = id, "ignoring data update for missing node");
            return Ok(());
        };

        let merged = node
            .data
            .merged(patch)
            .map_err(|source| EngineError::InvalidNodeData {
                node_id: id.to_owned(),
                source,
            })?;
        node.data = merged;
        debug!(node_id = id, keys = patch.len(), "node data updated");
        Ok(())
    }

    /// Replace an edge's type and/or data with the fields set in `patch`.
    pub fn update_edge(&mut self, id: &str, patch: EdgePatch) {
        let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) else {
            debug!(edge_id = id, "ignoring update for missing edge");
            return;
        };

        if let Some(kind) = patch.kind {
            edge.kind = Some(kind);
        }
        if let Some(data) = patch.data {
            edge.data = Some(data);
        }
        debug!(edge_id = id, "edge updated");
    }

    /// Apply a batch of canvas deltas to the nodes.
    ///
    /// Returns the ids of nodes that were removed. Removal here does not touch
    /// edges; the canvas reports edge removals in its own batch.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> Vec<String> {
        let mut removed = Vec::new();

        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
                        node.position = *position;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
                        node.selected = *selected;
                    }
                }
                NodeChange::Remove { id } => {
                    let before = self.nodes.len();
                    self.nodes.retain(|n| &n.id != id);
                    if self.nodes.len() != before {
                        removed.push(id.clone());
                    }
                }
            }
        }

        removed
    }

    /// Apply a batch of canvas deltas to the edges.
    ///
    /// Returns the ids of edges that were removed.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> Vec<String> {
        let mut removed = Vec::new();

        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    if let Some(edge) = self.edges.iter_mut().find(|e| &e.id == id) {
                        edge.selected = *selected;
                    }
                }
                EdgeChange::Remove { id } => {
                    if self.remove_edge(id).is_some() {
                        removed.push(id.clone());
                    }
                }
            }
        }

        removed
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove an edge. Removing a missing edge is a no-op.
    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == id)?;
        info!(edge_id = id, "edge removed");
        Some(self.edges.remove(index))
    }

    /// Remove a node and every edge that references it.
    pub fn remove_node(&mut self, id: &str) -> Option<RemovedNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);

        let (edges, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.source == id || e.target == id);
        self.edges = kept;

        info!(node_id = id, edges = edges.len(), "node removed");
        Some(RemovedNode { node, edges })
    }

    // -----------------------------------------------------------------------
    // Bulk load
    // -----------------------------------------------------------------------

    /// Replace the whole graph, typically with a deserialized workflow.
    ///
    /// The id generator keeps counting; it is never rewound.
    ///
    /// # Errors
    /// Identity errors from [`integrity::check`]; the store is unchanged.
    pub fn load(
        &mut self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<IntegrityReport, EngineError> {
        let report = integrity::check(&nodes, &edges)?;
        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            dangling = report.dangling.len(),
            "graph loaded"
        );
        self.nodes = nodes;
        self.edges = edges;
        Ok(report)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(IdGenerator::new())
    }
}
