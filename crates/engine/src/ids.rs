//! Session-scoped id generation.
//!
//! One generator lives for one editing session and is injected into the
//! [`crate::GraphStore`]; starting a new session is the only way to reset it.

/// Monotonic id source for nodes (`{type}_{n}`) and edges (`e{n}`).
///
/// Counters only move forward, so an id handed out once is never handed out
/// again by the same generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next_node: u64,
    next_edge: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next_node: 1,
            next_edge: 1,
        }
    }

    /// Next node id. The counter is shared across node types.
    pub fn next_node_id(&mut self, node_type: &str) -> String {
        let id = format!("{node_type}_{}", self.next_node);
        self.next_node += 1;
        id
    }

    pub fn next_edge_id(&mut self) -> String {
        let id = format!("e{}", self.next_edge);
        self.next_edge += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
