//! Node and edge editors.
//!
//! An editor is a staging buffer opened on a snapshot of one entity. Field
//! edits only touch the buffer; [`NodeEditor::patch`] and
//! [`EdgeEditor::patch`] describe what `save` will write, and the session
//! hands that to the store. Dropping an editor discards everything staged.

use serde_json::{json, Map, Value};

use nodes::{EdgeKind, DEFAULT_MODELS, DEFAULT_PROMPT_MODEL, DEFAULT_TEMPERATURE};

use crate::error::EditorError;
use crate::models::{DataPatch, Edge, EdgeData, EdgePatch, Node, NodeData};

// ---------------------------------------------------------------------------
// Node editor
// ---------------------------------------------------------------------------

/// A form field of the node editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Label,
    SystemPrompt,
    UserPrompt,
    Model,
    Temperature,
}

impl NodeField {
    /// Data key the field is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::SystemPrompt => "systemPrompt",
            Self::UserPrompt => "userPrompt",
            Self::Model => "model",
            Self::Temperature => "temperature",
        }
    }
}

const BASE_FIELDS: &[NodeField] = &[NodeField::Label];

const PROMPT_FIELDS: &[NodeField] = &[
    NodeField::Label,
    NodeField::SystemPrompt,
    NodeField::UserPrompt,
    NodeField::Model,
    NodeField::Temperature,
];

/// Staged values for the fields every node has.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseForm {
    pub label: Option<String>,
}

/// Staged values for a prompt node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PromptForm {
    pub label: Option<String>,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

/// The polymorphic form: base fields, plus the prompt block for prompt nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeForm {
    Base(BaseForm),
    Prompt(PromptForm),
}

/// Staging buffer for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEditor {
    node_id: String,
    node_type: String,
    form: NodeForm,
}

impl NodeEditor {
    /// Open an editor on a snapshot of `node`.
    pub fn open(node: &Node) -> Self {
        let form = match &node.data {
            NodeData::Prompt(data) => NodeForm::Prompt(PromptForm {
                label: data.label.clone(),
                system_prompt: data.system_prompt.clone(),
                user_prompt: data.user_prompt.clone(),
                model: data.model.clone(),
                temperature: data.temperature,
            }),
            NodeData::Input(data) | NodeData::Output(data) => NodeForm::Base(BaseForm {
                label: data.label.clone(),
            }),
            NodeData::Unrecognized { data, .. } => NodeForm::Base(BaseForm {
                label: data.label.clone(),
            }),
        };

        Self {
            node_id: node.id.clone(),
            node_type: node.type_name().to_owned(),
            form,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn form(&self) -> &NodeForm {
        &self.form
    }

    /// Fields this node's form shows, in display order.
    pub fn fields(&self) -> &'static [NodeField] {
        match self.form {
            NodeForm::Base(_) => BASE_FIELDS,
            NodeForm::Prompt(_) => PROMPT_FIELDS,
        }
    }

    // ------ display values (defaults filled in) ------

    pub fn label(&self) -> &str {
        let label = match &self.form {
            NodeForm::Base(form) => &form.label,
            NodeForm::Prompt(form) => &form.label,
        };
        label.as_deref().unwrap_or("")
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.prompt().map(|f| f.system_prompt.as_deref().unwrap_or(""))
    }

    pub fn user_prompt(&self) -> Option<&str> {
        self.prompt().map(|f| f.user_prompt.as_deref().unwrap_or(""))
    }

    pub fn model(&self) -> Option<&str> {
        self.prompt()
            .map(|f| f.model.as_deref().unwrap_or(DEFAULT_PROMPT_MODEL))
    }

    pub fn temperature(&self) -> Option<f64> {
        self.prompt().map(|f| f.temperature.unwrap_or(DEFAULT_TEMPERATURE))
    }

    fn prompt(&self) -> Option<&PromptForm> {
        match &self.form {
            NodeForm::Prompt(form) => Some(form),
            NodeForm::Base(_) => None,
        }
    }

    // ------ edits ------

    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = Some(label.into());
        match &mut self.form {
            NodeForm::Base(form) => form.label = label,
            NodeForm::Prompt(form) => form.label = label,
        }
    }

    pub fn set_system_prompt(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        self.prompt_mut(NodeField::SystemPrompt)?.system_prompt = Some(text.into());
        Ok(())
    }

    pub fn set_user_prompt(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        self.prompt_mut(NodeField::UserPrompt)?.user_prompt = Some(text.into());
        Ok(())
    }

    /// Pick a model from the catalog's model list.
    pub fn set_model(&mut self, model: &str) -> Result<(), EditorError> {
        let form = self.prompt_mut(NodeField::Model)?;
        if !DEFAULT_MODELS.contains(&model) {
            return Err(EditorError::UnknownModel(model.to_owned()));
        }
        form.model = Some(model.to_owned());
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), EditorError> {
        let form = self.prompt_mut(NodeField::Temperature)?;
        if !(0.0..=1.0).contains(&temperature) {
            return Err(EditorError::TemperatureOutOfRange(temperature));
        }
        form.temperature = Some(temperature);
        Ok(())
    }

    fn prompt_mut(&mut self, field: NodeField) -> Result<&mut PromptForm, EditorError> {
        match &mut self.form {
            NodeForm::Prompt(form) => Ok(form),
            NodeForm::Base(_) => Err(EditorError::FieldNotApplicable {
                field: field.key(),
                node_type: self.node_type.clone(),
            }),
        }
    }

    /// The data patch `save` writes: every staged field that holds a value.
    ///
    /// Fields never stored and never edited stay absent, so display defaults
    /// are not written back.
    pub fn patch(&self) -> DataPatch {
        let mut patch = Map::new();
        let mut put = |field: NodeField, value: Option<Value>| {
            if let Some(value) = value {
                patch.insert(field.key().to_owned(), value);
            }
        };

        match &self.form {
            NodeForm::Base(form) => {
                put(NodeField::Label, form.label.as_ref().map(|v| json!(v)));
            }
            NodeForm::Prompt(form) => {
                put(NodeField::Label, form.label.as_ref().map(|v| json!(v)));
                put(NodeField::SystemPrompt, form.system_prompt.as_ref().map(|v| json!(v)));
                put(NodeField::UserPrompt, form.user_prompt.as_ref().map(|v| json!(v)));
                put(NodeField::Model, form.model.as_ref().map(|v| json!(v)));
                put(NodeField::Temperature, form.temperature.map(|v| json!(v)));
            }
        }

        patch
    }
}

// ---------------------------------------------------------------------------
// Edge editor
// ---------------------------------------------------------------------------

/// Staging buffer for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEditor {
    edge_id: String,
    source: String,
    target: String,
    kind: EdgeKind,
    condition: String,
    data: Option<EdgeData>,
}

impl EdgeEditor {
    /// Open an editor on a snapshot of `edge`. A missing type shows as `default`.
    pub fn open(edge: &Edge) -> Self {
        Self {
            edge_id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: edge.kind.clone().unwrap_or_default(),
            condition: edge.condition().unwrap_or_default().to_owned(),
            data: edge.data.clone(),
        }
    }

    pub fn edge_id(&self) -> &str {
        &self.edge_id
    }

    /// `(source, target)` node ids, shown read-only.
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }

    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Whether the condition field is shown.
    pub fn shows_condition(&self) -> bool {
        self.kind == EdgeKind::Conditional
    }

    pub fn set_kind(&mut self, kind: EdgeKind) -> Result<(), EditorError> {
        if !kind.is_editable() {
            return Err(EditorError::UnsupportedEdgeKind(kind.to_string()));
        }
        self.kind = kind;
        Ok(())
    }

    /// Pick the type by its wire name, as the type dropdown reports it.
    pub fn select_kind(&mut self, name: &str) -> Result<(), EditorError> {
        let config =
            nodes::edge_type(name).ok_or_else(|| EditorError::UnsupportedEdgeKind(name.into()))?;
        self.set_kind(config.kind.clone())
    }

    /// Stage condition text. It is kept as typed even while hidden; `patch`
    /// drops it unless the type is `conditional`.
    pub fn set_condition(&mut self, condition: impl Into<String>) {
        self.condition = condition.into();
    }

    /// The update `save` writes: the staged type, and the edge's data with the
    /// condition set for `conditional` edges and cleared otherwise.
    pub fn patch(&self) -> EdgePatch {
        let mut data = self.data.clone().unwrap_or_default();
        data.condition = self.shows_condition().then(|| self.condition.clone());

        EdgePatch {
            kind: Some(self.kind.clone()),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseData, Position, PromptData};

    fn prompt_node(data: PromptData) -> Node {
        Node::new("prompt_1", Position::default(), NodeData::Prompt(data))
    }

    fn edge(kind: Option<EdgeKind>, condition: Option<&str>) -> Edge {
        Edge {
            id: "e1".into(),
            source: "input_1".into(),
            target: "prompt_2".into(),
            source_handle: None,
            target_handle: None,
            kind,
            data: condition.map(|c| EdgeData {
                condition: Some(c.into()),
                extra: Map::new(),
            }),
            selected: false,
        }
    }

    #[test]
    fn prompt_form_shows_defaults_without_writing_them() {
        let editor = NodeEditor::open(&prompt_node(PromptData::default()));
        assert_eq!(editor.temperature(), Some(0.7));
        assert_eq!(editor.model(), Some("gpt-4o"));
        assert_eq!(editor.label(), "");
        assert!(editor.patch().is_empty());
    }

    #[test]
    fn base_form_only_exposes_the_label() {
        let node = Node::new("input_1", Position::default(), NodeData::Input(BaseData::default()));
        let mut editor = NodeEditor::open(&node);

        assert_eq!(editor.fields(), &[NodeField::Label]);
        assert_eq!(editor.temperature(), None);
        assert!(matches!(
            editor.set_system_prompt("nope"),
            Err(EditorError::FieldNotApplicable { field: "systemPrompt", .. })
        ));
    }

    #[test]
    fn unrecognized_type_degrades_to_base_form() {
        let node = Node::new(
            "router_1",
            Position::default(),
            NodeData::Unrecognized {
                node_type: "router".into(),
                data: BaseData {
                    label: Some("r".into()),
                    extra: Map::new(),
                },
            },
        );
        let editor = NodeEditor::open(&node);
        assert_eq!(editor.fields(), &[NodeField::Label]);
        assert_eq!(editor.node_type(), "router");
        assert_eq!(editor.label(), "r");
    }

    #[test]
    fn prompt_edits_are_validated() {
        let mut editor = NodeEditor::open(&prompt_node(PromptData::default()));

        assert!(matches!(editor.set_temperature(1.5), Err(EditorError::TemperatureOutOfRange(_))));
        assert!(matches!(editor.set_model("gpt-9"), Err(EditorError::UnknownModel(_))));

        editor.set_temperature(0.3).unwrap();
        editor.set_model("claude-3-opus").unwrap();
        editor.set_label("Classifier");

        let patch = editor.patch();
        assert_eq!(patch["temperature"], json!(0.3));
        assert_eq!(patch["model"], json!("claude-3-opus"));
        assert_eq!(patch["label"], json!("Classifier"));
        assert!(!patch.contains_key("systemPrompt"));
    }

    #[test]
    fn edge_without_type_shows_default() {
        let editor = EdgeEditor::open(&edge(None, None));
        assert_eq!(editor.kind(), &EdgeKind::Default);
        assert!(!editor.shows_condition());
        assert_eq!(editor.endpoints(), ("input_1", "prompt_2"));
    }

    #[test]
    fn switching_away_from_conditional_clears_the_condition() {
        let mut editor = EdgeEditor::open(&edge(Some(EdgeKind::Conditional), Some("billing")));
        assert_eq!(editor.condition(), "billing");

        editor.set_condition("still typed");
        editor.set_kind(EdgeKind::Default).unwrap();

        let patch = editor.patch();
        assert_eq!(patch.kind, Some(EdgeKind::Default));
        assert_eq!(patch.data.unwrap().condition, None);
    }

    #[test]
    fn merge_cannot_be_picked() {
        let mut editor = EdgeEditor::open(&edge(None, None));
        assert!(matches!(
            editor.set_kind(EdgeKind::Merge),
            Err(EditorError::UnsupportedEdgeKind(name)) if name == "merge"
        ));
    }

    #[test]
    fn dropdown_names_resolve_through_the_catalog() {
        let mut editor = EdgeEditor::open(&edge(None, None));
        editor.select_kind("conditional").unwrap();
        assert!(editor.shows_condition());

        assert!(matches!(
            editor.select_kind("fanout"),
            Err(EditorError::UnsupportedEdgeKind(name)) if name == "fanout"
        ));
        assert!(editor.select_kind("merge").is_err());
        assert_eq!(editor.kind(), &EdgeKind::Conditional);
    }
}
