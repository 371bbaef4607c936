//! One editing session: the graph, the current selection and the open editor.
//!
//! `EditorSession` is the event surface the presentation layer drives. Clicks
//! move the selection and open the matching editor; `save`, `cancel` and
//! `delete_edge` close it again. Structural removals that take the selected
//! entity with them drop the selection too, so the session never points at
//! something that is gone.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::editor::{EdgeEditor, NodeEditor};
use crate::error::EditorError;
use crate::ids::IdGenerator;
use crate::integrity::{self, IntegrityReport};
use crate::models::{Connection, DataPatch, Edge, EdgeChange, Node, NodeChange, Position};
use crate::selection::Selection;
use crate::serializer;
use crate::store::{GraphStore, RemovedNode};
use crate::wire::WorkflowRequest;
use crate::EngineError;

/// Prompt shown before an edge is deleted.
pub const DELETE_EDGE_PROMPT: &str = "Delete this edge?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// The editor currently open in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveEditor {
    Node(NodeEditor),
    Edge(EdgeEditor),
}

/// Node and edge counts shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Default)]
pub struct EditorSession {
    store: GraphStore,
    selection: Selection,
    editor: Option<ActiveEditor>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session over an existing store (e.g. one with a seeded rng).
    pub fn with_store(store: GraphStore) -> Self {
        Self {
            store,
            selection: Selection::default(),
            editor: None,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn editor(&self) -> Option<&ActiveEditor> {
        self.editor.as_ref()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.store.nodes().len(),
            edges: self.store.edges().len(),
        }
    }

    // -----------------------------------------------------------------------
    // Selection events
    // -----------------------------------------------------------------------

    /// Select a node and open its editor. Returns `false` for unknown ids.
    pub fn click_node(&mut self, id: &str) -> bool {
        let Some(node) = self.store.node(id) else {
            debug!(node_id = id, "click on missing node ignored");
            return false;
        };
        self.editor = Some(ActiveEditor::Node(NodeEditor::open(node)));
        self.selection.select_node(id);
        true
    }

    /// Select an edge and open its editor. Returns `false` for unknown ids.
    pub fn click_edge(&mut self, id: &str) -> bool {
        let Some(edge) = self.store.edge(id) else {
            debug!(edge_id = id, "click on missing edge ignored");
            return false;
        };
        self.editor = Some(ActiveEditor::Edge(EdgeEditor::open(edge)));
        self.selection.select_edge(id);
        true
    }

    /// Background click: deselect and discard whatever was staged.
    pub fn click_canvas(&mut self) {
        self.close();
    }

    pub fn node_editor_mut(&mut self) -> Result<&mut NodeEditor, EditorError> {
        match self.editor.as_mut() {
            Some(ActiveEditor::Node(editor)) => Ok(editor),
            _ => Err(EditorError::NoActiveEditor),
        }
    }

    pub fn edge_editor_mut(&mut self) -> Result<&mut EdgeEditor, EditorError> {
        match self.editor.as_mut() {
            Some(ActiveEditor::Edge(editor)) => Ok(editor),
            _ => Err(EditorError::NoActiveEditor),
        }
    }

    // -----------------------------------------------------------------------
    // Editor lifecycle
    // -----------------------------------------------------------------------

    /// Commit the open editor to the store and deselect.
    ///
    /// # Errors
    /// [`EditorError::NoActiveEditor`] with nothing open, or the store's error
    /// if the staged data is rejected. The editor stays open on error.
    pub fn save(&mut self) -> Result<(), EditorError> {
        match self.editor.as_ref().ok_or(EditorError::NoActiveEditor)? {
            ActiveEditor::Node(editor) => {
                self.store.update_node_data(editor.node_id(), &editor.patch())?;
                info!(node_id = editor.node_id(), "node saved");
            }
            ActiveEditor::Edge(editor) => {
                self.store.update_edge(editor.edge_id(), editor.patch());
                info!(edge_id = editor.edge_id(), "edge saved");
            }
        }
        self.close();
        Ok(())
    }

    /// Discard the open editor, if any, and deselect.
    pub fn cancel(&mut self) {
        self.close();
    }

    /// Delete the selected edge once `confirm` agrees.
    ///
    /// Returns whether the edge was deleted. A declined confirmation leaves
    /// the selection and the staged edits as they were.
    pub fn delete_edge(&mut self, confirm: &mut impl Confirm) -> Result<bool, EditorError> {
        let id = self
            .selection
            .selected_edge()
            .ok_or(EditorError::NoEdgeSelected)?
            .to_owned();

        if !confirm.confirm(DELETE_EDGE_PROMPT) {
            debug!(edge_id = %id, "edge deletion declined");
            return Ok(false);
        }

        self.store.remove_edge(&id);
        self.close();
        Ok(true)
    }

    fn close(&mut self) {
        self.editor = None;
        self.selection.clear();
    }

    // Node and edge ids are separate namespaces, so each kind is forgotten
    // through its own check.
    fn forget_node(&mut self, id: &str) {
        if self.selection.forget_node(id) {
            debug!(node_id = id, "selected node removed");
            self.editor = None;
        }
    }

    fn forget_edge(&mut self, id: &str) {
        if self.selection.forget_edge(id) {
            debug!(edge_id = id, "selected edge removed");
            self.editor = None;
        }
    }

    // -----------------------------------------------------------------------
    // Structural edits
    // -----------------------------------------------------------------------

    pub fn add_node(&mut self, node_type: &str, hint: Option<Position>) -> Option<String> {
        self.store.add_node(node_type, hint)
    }

    pub fn connect(&mut self, connection: Connection) -> String {
        self.store.connect(connection)
    }

    /// Merge `patch` into a node's data without going through an editor.
    pub fn update_node_data(&mut self, id: &str, patch: &DataPatch) -> Result<(), EngineError> {
        self.store.update_node_data(id, patch)
    }

    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> Vec<String> {
        let removed = self.store.apply_node_changes(changes);
        for id in &removed {
            self.forget_node(id);
        }
        removed
    }

    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> Vec<String> {
        let removed = self.store.apply_edge_changes(changes);
        for id in &removed {
            self.forget_edge(id);
        }
        removed
    }

    /// The in-node delete action: removes the node and its edges.
    pub fn remove_node(&mut self, id: &str) -> Option<RemovedNode> {
        let removed = self.store.remove_node(id)?;
        self.forget_node(id);
        for edge in &removed.edges {
            self.forget_edge(&edge.id);
        }
        Some(removed)
    }

    /// Replace the graph. The selection is cleared; ids keep counting.
    pub fn load(
        &mut self,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<IntegrityReport, EngineError> {
        let report = self.store.load(nodes, edges)?;
        self.close();
        Ok(report)
    }

    /// Replace the graph with the workflow carried by `request`.
    pub fn load_request(
        &mut self,
        request: &WorkflowRequest,
    ) -> Result<IntegrityReport, EngineError> {
        let (nodes, edges) = serializer::deserialize(request)?;
        self.load(nodes, edges)
    }

    pub fn check_integrity(&self) -> Result<IntegrityReport, EngineError> {
        integrity::check(self.store.nodes(), self.store.edges())
    }

    /// Build an execution request from the current graph.
    pub fn serialize(&self, input: Map<String, Value>) -> WorkflowRequest {
        serializer::serialize(self.store.nodes(), self.store.edges(), input)
    }
}

/// Convenience for a fresh session whose node placement is reproducible.
pub fn seeded_session(seed: u64) -> EditorSession {
    EditorSession::with_store(GraphStore::with_seed(IdGenerator::new(), seed))
}
