//! Node and edge variant tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The closed set of node variants the editor knows how to create and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Starting point of the workflow.
    Input,
    /// AI prompt execution stage.
    Prompt,
    /// End point of the workflow.
    Output,
}

impl NodeKind {
    /// Every variant, in catalog order.
    pub const ALL: [NodeKind; 3] = [NodeKind::Input, NodeKind::Prompt, NodeKind::Output];

    /// Wire name of the variant (also the id prefix).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Prompt => "prompt",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "prompt" => Ok(Self::Prompt),
            "output" => Ok(Self::Output),
            other => Err(CatalogError::UnknownNodeType(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// Edge variant tag.
///
/// `Merge` is advertised by [`crate::EDGE_TYPES`] but has no behaviour and is
/// never offered by the edge editor. Names outside the table are carried
/// verbatim in `Other` so a graph loaded from the backend survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    #[default]
    Default,
    Conditional,
    Merge,
    Other(String),
}

impl EdgeKind {
    /// Wire name of the variant.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Conditional => "conditional",
            Self::Merge => "merge",
            Self::Other(name) => name,
        }
    }

    /// Whether the edge editor lets the user pick this variant.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Default | Self::Conditional)
    }
}

impl From<String> for EdgeKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "default" => Self::Default,
            "conditional" => Self::Conditional,
            "merge" => Self::Merge,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for EdgeKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<EdgeKind> for String {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_parses_known_names_only() {
        assert_eq!("prompt".parse::<NodeKind>(), Ok(NodeKind::Prompt));
        assert_eq!(
            "bogus-type".parse::<NodeKind>(),
            Err(CatalogError::UnknownNodeType("bogus-type".into()))
        );
    }

    #[test]
    fn edge_kind_keeps_unknown_names() {
        let kind: EdgeKind = serde_json::from_str("\"fan-out\"").unwrap();
        assert_eq!(kind, EdgeKind::Other("fan-out".into()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"fan-out\"");
    }

    #[test]
    fn only_default_and_conditional_are_editable() {
        assert!(EdgeKind::Default.is_editable());
        assert!(EdgeKind::Conditional.is_editable());
        assert!(!EdgeKind::Merge.is_editable());
        assert!(!EdgeKind::from("fan-out").is_editable());
    }
}
