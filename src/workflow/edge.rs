use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Canvas attributes such as `type`, `label` or `arrowHeadType`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }

    /// One edge per ordered pair, so the id is derived from its endpoints.
    pub fn between(source: &str, target: &str) -> Self {
        Self::new(format!("e{}-{}", source, target), source, target)
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canvas_attributes_survive_round_trip() {
        let raw = json!({
            "id": "ea-b",
            "type": "plus",
            "label": "+",
            "arrowHeadType": "arrowclosed",
            "data": {"hover": false},
            "source": "a",
            "target": "b"
        });
        let edge: WorkflowEdge = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(edge.extra["label"], json!("+"));
        assert_eq!(serde_json::to_value(&edge).unwrap(), raw);
    }
}
