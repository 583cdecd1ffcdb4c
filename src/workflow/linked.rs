use crate::error::{FlowError, FlowResult};
use crate::workflow::graph::FlowGraph;
use crate::workflow::node::WorkflowNode;
use std::collections::HashMap;

/// A node record in the linked view. `parents`/`children` stay `None` until
/// an edge touches the node; after that both sides are at least empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedNode<'a> {
    pub node: &'a WorkflowNode,
    pub parents: Option<Vec<usize>>,
    pub children: Option<Vec<usize>>,
}

impl<'a> LinkedNode<'a> {
    pub fn id(&self) -> &'a str {
        &self.node.id
    }

    pub fn parents(&self) -> &[usize] {
        self.parents.as_deref().unwrap_or(&[])
    }

    pub fn children(&self) -> &[usize] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Parent/child adjacency derived from a graph's edges. Built on demand and
/// dropped after use; it borrows the graph instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedView<'a> {
    nodes: Vec<LinkedNode<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> LinkedView<'a> {
    pub fn build(graph: &'a FlowGraph) -> FlowResult<Self> {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        for node in graph.nodes() {
            index.insert(node.id.as_str(), nodes.len());
            nodes.push(LinkedNode {
                node,
                parents: None,
                children: None,
            });
        }

        for edge in graph.edges() {
            let (Some(&source), Some(&target)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                return Err(FlowError::DanglingEdge {
                    edge: edge.id.clone(),
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                });
            };

            for slot in [source, target] {
                let linked = &mut nodes[slot];
                linked.parents.get_or_insert_with(Vec::new);
                linked.children.get_or_insert_with(Vec::new);
            }
            nodes[source].children.get_or_insert_with(Vec::new).push(target);
            nodes[target].parents.get_or_insert_with(Vec::new).push(source);
        }

        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&LinkedNode<'a>> {
        self.position(id).map(|slot| &self.nodes[slot])
    }

    pub fn at(&self, slot: usize) -> Option<&LinkedNode<'a>> {
        self.nodes.get(slot)
    }

    /// Depth-first pre-order ids of `start` and everything below it. A node
    /// reached along several paths is listed once per path.
    pub fn collect_descendant_ids(&self, start: &[usize]) -> Vec<String> {
        let mut ids = Vec::new();
        let mut path = Vec::new();
        self.walk(start, &mut path, &mut ids);
        ids
    }

    fn walk(&self, slots: &[usize], path: &mut Vec<usize>, ids: &mut Vec<String>) {
        for &slot in slots {
            if path.contains(&slot) {
                tracing::warn!(node_id = %self.nodes[slot].id(), "cycle in workflow children, stopping descent");
                continue;
            }
            let Some(linked) = self.nodes.get(slot) else {
                continue;
            };
            ids.push(linked.id().to_string());
            path.push(slot);
            self.walk(linked.children(), path, ids);
            path.pop();
        }
    }
}
