use crate::config::EditorConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    FormData,
    FillIn,
    Approve,
    End,
    ProcessBranch,
    ProcessVariableAssignment,
    TableDataCreate,
    TableDataUpdate,
    SendEmail,
    WebMessage,
    Cc,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::FormData => "formData",
            NodeKind::FillIn => "fillIn",
            NodeKind::Approve => "approve",
            NodeKind::End => "end",
            NodeKind::ProcessBranch => "processBranch",
            NodeKind::ProcessVariableAssignment => "processVariableAssignment",
            NodeKind::TableDataCreate => "tableDataCreate",
            NodeKind::TableDataUpdate => "tableDataUpdate",
            NodeKind::SendEmail => "sendEmail",
            NodeKind::WebMessage => "webMessage",
            NodeKind::Cc => "cc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(Value::String(raw.to_string())).ok()
    }

    /// Start and end nodes bound the chain and are never removed by the editor.
    pub fn is_boundary(&self) -> bool {
        matches!(self, NodeKind::FormData | NodeKind::End)
    }

    /// Kinds whose deadline settings are persisted as numbers.
    pub fn has_time_rule(&self) -> bool {
        matches!(self, NodeKind::Approve | NodeKind::FillIn)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub width: f64,
    pub height: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    #[serde(default = "empty_object")]
    pub business_data: Value,
    pub node_data: NodeData,
    /// Keys the editor does not interpret, `type` among them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    pub data: NodePayload,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowNode {
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        name: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            data: NodePayload {
                business_data: empty_object(),
                node_data: NodeData {
                    width,
                    height,
                    name: name.into(),
                },
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// Builds a node with a fresh `<kind><uuid>` id sized from the config.
    pub fn build(kind: NodeKind, name: impl Into<String>, config: &EditorConfig) -> Self {
        let id = format!("{}{}", kind.as_str(), uuid::Uuid::new_v4().simple());
        let (width, height) = match kind {
            NodeKind::End => (config.end_node_width, config.end_node_height),
            _ => (config.node_width, config.node_height),
        };
        Self::new(id, kind, name, width, height)
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_business_data(mut self, business_data: Value) -> Self {
        self.data.business_data = business_data;
        self
    }

    pub fn name(&self) -> &str {
        &self.data.node_data.name
    }

    pub fn width(&self) -> f64 {
        self.data.node_data.width
    }

    pub fn height(&self) -> f64 {
        self.data.node_data.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_match_wire_tags() {
        for kind in [
            NodeKind::FormData,
            NodeKind::ProcessVariableAssignment,
            NodeKind::Cc,
        ] {
            let tag = serde_json::to_value(kind).unwrap();
            assert_eq!(tag, json!(kind.as_str()));
            assert_eq!(NodeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::parse("bogus"), None);
    }

    #[test]
    fn built_ids_carry_kind_prefix() {
        let config = EditorConfig::default();
        let end = WorkflowNode::build(NodeKind::End, "End", &config);
        assert!(end.id.starts_with("end"));
        assert_eq!(end.width(), 100.0);
        assert_eq!(end.height(), 28.0);

        let other = WorkflowNode::build(NodeKind::End, "End", &config);
        assert_ne!(end.id, other.id);
    }

    #[test]
    fn deserializes_wire_shape() {
        let node: WorkflowNode = serde_json::from_value(json!({
            "id": "approve1",
            "type": "approve",
            "position": {"x": 10.0, "y": 20.0},
            "data": {"nodeData": {"width": 200.0, "height": 72.0, "name": "Approve"}}
        }))
        .unwrap();

        assert_eq!(node.kind, NodeKind::Approve);
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.data.business_data, json!({}));
        assert_eq!(node.name(), "Approve");
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let raw = json!({
            "id": "formData1",
            "type": "formData",
            "selected": false,
            "position": {"x": 0.0, "y": 0.0},
            "data": {
                "type": "formData",
                "businessData": {"form": {"name": "Leave", "value": "t1"}},
                "nodeData": {"width": 200.0, "height": 72.0, "name": "Start"}
            }
        });
        let node: WorkflowNode = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(node.extra["selected"], json!(false));
        assert_eq!(node.data.extra["type"], json!("formData"));
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }
}
