use crate::config::EditorConfig;
use crate::error::{FlowError, FlowResult};
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::node::{NodeKind, WorkflowNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single canvas element. On the wire nodes and edges share one flat list
/// and are told apart by their fields, so the enum is untagged with the edge
/// variant tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowElement {
    Edge(WorkflowEdge),
    Node(WorkflowNode),
}

impl FlowElement {
    pub fn id(&self) -> &str {
        match self {
            FlowElement::Edge(edge) => &edge.id,
            FlowElement::Node(node) => &node.id,
        }
    }

    pub fn as_node(&self) -> Option<&WorkflowNode> {
        match self {
            FlowElement::Node(node) => Some(node),
            FlowElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&WorkflowEdge> {
        match self {
            FlowElement::Edge(edge) => Some(edge),
            FlowElement::Node(_) => None,
        }
    }
}

impl From<WorkflowNode> for FlowElement {
    fn from(node: WorkflowNode) -> Self {
        FlowElement::Node(node)
    }
}

impl From<WorkflowEdge> for FlowElement {
    fn from(edge: WorkflowEdge) -> Self {
        FlowElement::Edge(edge)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowGraph {
    elements: Vec<FlowElement>,
}

impl FlowGraph {
    pub fn new(elements: Vec<FlowElement>) -> Self {
        Self { elements }
    }

    /// A fresh session graph: start node, end node and the edge between them.
    pub fn seeded(config: &EditorConfig) -> Self {
        let start = WorkflowNode::build(NodeKind::FormData, "Form trigger", config);
        let end = WorkflowNode::build(NodeKind::End, "End", config).with_position(
            (config.node_width - config.end_node_width) / 2.0,
            config.node_height * 2.0,
        );
        let edge = WorkflowEdge::between(&start.id, &end.id);
        Self::new(vec![start.into(), end.into(), edge.into()])
    }

    pub fn elements(&self) -> &[FlowElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<FlowElement> {
        self.elements
    }

    pub fn nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.elements.iter().filter_map(FlowElement::as_node)
    }

    pub fn edges(&self) -> impl Iterator<Item = &WorkflowEdge> {
        self.elements.iter().filter_map(FlowElement::as_edge)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&WorkflowEdge> {
        self.edges().find(|edge| edge.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.iter().any(|element| element.id() == id)
    }

    pub fn form_data_node(&self) -> Option<&WorkflowNode> {
        self.nodes().find(|node| node.kind == NodeKind::FormData)
    }

    pub fn has_edge_between(&self, source: &str, target: &str) -> bool {
        self.edges()
            .any(|edge| edge.source == source && edge.target == target)
    }

    pub fn validate(&self) -> FlowResult<()> {
        let mut ids = HashSet::new();
        for element in &self.elements {
            if !ids.insert(element.id()) {
                return Err(FlowError::DuplicateId(element.id().to_string()));
            }
        }

        let node_ids: HashSet<&str> = self.nodes().map(|node| node.id.as_str()).collect();
        let mut pairs = HashSet::new();
        for edge in self.edges() {
            if !node_ids.contains(edge.source.as_str()) || !node_ids.contains(edge.target.as_str()) {
                return Err(FlowError::DanglingEdge {
                    edge: edge.id.clone(),
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                });
            }
            if !pairs.insert((edge.source.as_str(), edge.target.as_str())) {
                return Err(FlowError::Validation(format!(
                    "more than one edge from {} to {}",
                    edge.source, edge.target
                )));
            }
        }

        for kind in [NodeKind::FormData, NodeKind::End] {
            let count = self.nodes().filter(|node| node.kind == kind).count();
            if count != 1 {
                return Err(FlowError::Validation(format!(
                    "workflow needs exactly one {} node, found {}",
                    kind.as_str(),
                    count
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seeded_graph_is_valid() {
        let graph = FlowGraph::seeded(&EditorConfig::default());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        graph.validate().unwrap();

        let start = graph.form_data_node().unwrap();
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.source, start.id);
    }

    #[test]
    fn untagged_elements_keep_flat_wire_shape() {
        let raw = json!([
            {"id": "a", "type": "formData", "position": {"x": 0.0, "y": 0.0},
             "data": {"businessData": {}, "nodeData": {"width": 200.0, "height": 72.0, "name": "Start"}}},
            {"id": "b", "type": "end", "position": {"x": 0.0, "y": 144.0},
             "data": {"businessData": {}, "nodeData": {"width": 100.0, "height": 28.0, "name": "End"}}},
            {"id": "ea-b", "source": "a", "target": "b"}
        ]);
        let graph: FlowGraph = serde_json::from_value(raw.clone()).unwrap();

        assert!(matches!(graph.elements()[0], FlowElement::Node(_)));
        assert!(matches!(graph.elements()[2], FlowElement::Edge(_)));
        assert_eq!(serde_json::to_value(&graph).unwrap(), raw);
    }

    #[test]
    fn validate_reports_dangling_edge() {
        let config = EditorConfig::default();
        let mut elements = FlowGraph::seeded(&config).into_elements();
        elements.push(WorkflowEdge::new("stray", "ghost", "nowhere").into());

        let result = FlowGraph::new(elements).validate();
        assert!(matches!(result, Err(FlowError::DanglingEdge { .. })));
    }

    #[test]
    fn validate_reports_shared_ids() {
        let config = EditorConfig::default();
        let mut elements = FlowGraph::seeded(&config).into_elements();
        let first_id = elements[0].id().to_string();
        elements.push(WorkflowEdge::new(first_id.clone(), "x", "y").into());

        let result = FlowGraph::new(elements).validate();
        assert!(matches!(result, Err(FlowError::DuplicateId(id)) if id == first_id));
    }

    #[test]
    fn validate_reports_pair_duplicated_by_removal() {
        let config = EditorConfig::default();
        let graph = FlowGraph::new(vec![
            WorkflowNode::new("A", NodeKind::FormData, "A", 200.0, 40.0).into(),
            WorkflowNode::new("B", NodeKind::Approve, "B", 200.0, 40.0).into(),
            WorkflowNode::new("C", NodeKind::End, "C", 100.0, 28.0).into(),
            WorkflowEdge::between("A", "B").into(),
            WorkflowEdge::between("B", "C").into(),
            WorkflowEdge::new("shortcut", "A", "C").into(),
        ]);
        graph.validate().unwrap();

        let after = crate::workflow::editor::remove_node_by_id(&graph, "B", &config).unwrap();
        assert_eq!(after.edges().filter(|edge| edge.source == "A" && edge.target == "C").count(), 2);
        assert!(matches!(after.validate(), Err(FlowError::Validation(_))));
    }

    #[test]
    fn validate_requires_single_end() {
        let config = EditorConfig::default();
        let mut elements = FlowGraph::seeded(&config).into_elements();
        elements.push(WorkflowNode::build(NodeKind::End, "End", &config).into());

        let result = FlowGraph::new(elements).validate();
        assert!(matches!(result, Err(FlowError::Validation(_))));
    }
}
