//! Single-selection state machine over nodes and edges.

/// What the user is currently editing.
///
/// Node and edge selection are mutually exclusive: selecting one kind of
/// entity always drops the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoneSelected,
    NodeSelected(String),
    EdgeSelected(String),
}

impl Selection {
    pub fn select_node(&mut self, id: impl Into<String>) {
        *self = Self::NodeSelected(id.into());
    }

    pub fn select_edge(&mut self, id: impl Into<String>) {
        *self = Self::EdgeSelected(id.into());
    }

    /// Canvas background click.
    pub fn clear(&mut self) {
        *self = Self::NoneSelected;
    }

    /// Drop the selection if it points at a node that no longer exists.
    pub fn forget_node(&mut self, id: &str) -> bool {
        let hit = self.selected_node() == Some(id);
        if hit {
            self.clear();
        }
        hit
    }

    /// Drop the selection if it points at an edge that no longer exists.
    pub fn forget_edge(&mut self, id: &str) -> bool {
        let hit = self.selected_edge() == Some(id);
        if hit {
            self.clear();
        }
        hit
    }

    pub fn selected_node(&self) -> Option<&str> {
        match self {
            Self::NodeSelected(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_edge(&self) -> Option<&str> {
        match self {
            Self::EdgeSelected(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoneSelected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn selecting_an_edge_drops_the_node() {
        let mut selection = Selection::default();
        selection.select_node("input_1");
        selection.select_edge("e1");

        assert_eq!(selection.selected_node(), None);
        assert_eq!(selection.selected_edge(), Some("e1"));
    }

    #[test]
    fn forget_only_matches_the_same_kind() {
        let mut selection = Selection::default();
        selection.select_edge("x");

        assert!(!selection.forget_node("x"));
        assert_eq!(selection, Selection::EdgeSelected("x".into()));
        assert!(selection.forget_edge("x"));
        assert!(selection.is_empty());
    }

    #[test]
    fn forget_ignores_other_ids() {
        let mut selection = Selection::default();
        selection.select_node("prompt_2");

        assert!(!selection.forget_node("prompt_3"));
        assert!(selection.forget_node("prompt_2"));
        assert!(!selection.forget_node("prompt_2"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Node(u8),
        Edge(u8),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Node),
            any::<u8>().prop_map(Op::Edge),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn last_call_wins_and_kinds_stay_exclusive(ops in prop::collection::vec(op(), 0..64)) {
            let mut selection = Selection::default();

            for op in &ops {
                match op {
                    Op::Node(n) => selection.select_node(format!("n{n}")),
                    Op::Edge(n) => selection.select_edge(format!("e{n}")),
                    Op::Clear => selection.clear(),
                }

                let node = selection.selected_node().is_some();
                let edge = selection.selected_edge().is_some();
                prop_assert!(!(node && edge));
                match op {
                    Op::Node(n) => {
                        let expected = format!("n{n}");
                        prop_assert_eq!(selection.selected_node(), Some(expected.as_str()));
                    }
                    Op::Edge(n) => {
                        let expected = format!("e{n}");
                        prop_assert_eq!(selection.selected_edge(), Some(expected.as_str()));
                    }
                    Op::Clear => prop_assert!(selection.is_empty()),
                }
            }
        }
    }
}
