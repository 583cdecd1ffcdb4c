//! Graph editing operations. Every operation reads the old graph and returns a
//! new one; the input is never modified.

use crate::config::EditorConfig;
use crate::error::{FlowError, FlowResult};
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::graph::{FlowElement, FlowGraph};
use crate::workflow::linked::LinkedView;
use crate::workflow::node::{NodeData, Position, WorkflowNode};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Removes a node and reconnects its neighbours.
///
/// The first incoming and the first outgoing edge met while scanning supply
/// the endpoints of the replacement edge. Any further incident edges are
/// dropped without replacement, so removing a branch node disconnects every
/// branch but one. Nodes below the removed one move up by
/// `offset_factor * height`.
pub fn remove_node_by_id(
    graph: &FlowGraph,
    target_id: &str,
    config: &EditorConfig,
) -> FlowResult<FlowGraph> {
    let view = LinkedView::build(graph)?;
    let target = view
        .get(target_id)
        .ok_or_else(|| FlowError::NodeNotFound(target_id.to_string()))?;
    let descendant_ids: HashSet<String> = view
        .collect_descendant_ids(target.children())
        .into_iter()
        .collect();
    let offset = target.node.height() * config.offset_factor;

    let mut incoming: Option<&WorkflowEdge> = None;
    let mut new_target: Option<&str> = None;
    let mut dropped_edges = 0usize;
    let mut elements = Vec::with_capacity(graph.elements().len());

    for element in graph.elements() {
        match element {
            FlowElement::Edge(edge) => {
                if edge.target == target_id && !edge.is_self_loop() && incoming.is_none() {
                    incoming = Some(edge);
                }
                if edge.source == target_id && !edge.is_self_loop() && new_target.is_none() {
                    new_target = Some(edge.target.as_str());
                }
                if edge.touches(target_id) {
                    dropped_edges += 1;
                    continue;
                }
                elements.push(element.clone());
            }
            FlowElement::Node(node) => {
                if node.id == target_id {
                    continue;
                }
                let mut node = node.clone();
                if descendant_ids.contains(&node.id) {
                    node.position.y -= offset;
                }
                elements.push(node.into());
            }
        }
    }

    if target.parents().len() > 1 || target.children().len() > 1 {
        tracing::warn!(
            node_id = target_id,
            parents = target.parents().len(),
            children = target.children().len(),
            "removed a branch point; only the first incoming and outgoing edges are relinked"
        );
    }

    // the replacement keeps the canvas attributes of the incoming edge
    if let (Some(incoming), Some(target)) = (incoming, new_target) {
        elements.push(
            WorkflowEdge::between(&incoming.source, target)
                .with_extra(incoming.extra.clone())
                .into(),
        );
    }

    tracing::debug!(
        node_id = target_id,
        dropped_edges,
        shifted = descendant_ids.len(),
        offset,
        relinked = incoming.is_some() && new_target.is_some(),
        "removed workflow node"
    );

    Ok(FlowGraph::new(elements))
}

/// Splices `node` onto the edge `edge_id`. The node takes the old target's
/// place and the target with everything below it moves down to make room.
pub fn insert_node_on_edge(
    graph: &FlowGraph,
    edge_id: &str,
    mut node: WorkflowNode,
    config: &EditorConfig,
) -> FlowResult<FlowGraph> {
    if graph.contains(&node.id) {
        return Err(FlowError::DuplicateId(node.id));
    }
    let edge = graph
        .edge(edge_id)
        .ok_or_else(|| FlowError::EdgeNotFound(edge_id.to_string()))?;

    let view = LinkedView::build(graph)?;
    let source = view
        .get(&edge.source)
        .ok_or_else(|| FlowError::NodeNotFound(edge.source.clone()))?;
    let target_slot = view
        .position(&edge.target)
        .ok_or_else(|| FlowError::NodeNotFound(edge.target.clone()))?;
    let target = view
        .at(target_slot)
        .ok_or_else(|| FlowError::NodeNotFound(edge.target.clone()))?;

    node.position = Position::new(
        source.node.position.x + (source.node.width() - node.width()) / 2.0,
        target.node.position.y,
    );
    let shifted: HashSet<String> = view
        .collect_descendant_ids(&[target_slot])
        .into_iter()
        .collect();
    let offset = node.height() * config.offset_factor;

    let mut elements = Vec::with_capacity(graph.elements().len() + 2);
    for element in graph.elements() {
        match element {
            FlowElement::Edge(current) if current.id == edge_id => {
                elements.push(
                    WorkflowEdge::between(&current.source, &node.id)
                        .with_extra(current.extra.clone())
                        .into(),
                );
                elements.push(
                    WorkflowEdge::between(&node.id, &current.target)
                        .with_extra(current.extra.clone())
                        .into(),
                );
            }
            FlowElement::Node(current) if shifted.contains(&current.id) => {
                let mut current = current.clone();
                current.position.y += offset;
                elements.push(current.into());
            }
            _ => elements.push(element.clone()),
        }
    }

    tracing::debug!(
        node_id = %node.id,
        edge_id,
        shifted = shifted.len(),
        offset,
        "inserted workflow node"
    );
    elements.push(node.into());
    Ok(FlowGraph::new(elements))
}

/// Appends a detached node to the end of the element list.
pub fn append_node(graph: &FlowGraph, node: WorkflowNode) -> FlowResult<FlowGraph> {
    if graph.contains(&node.id) {
        return Err(FlowError::DuplicateId(node.id));
    }
    let mut elements = graph.elements().to_vec();
    elements.push(node.into());
    Ok(FlowGraph::new(elements))
}

pub fn move_node(graph: &FlowGraph, node_id: &str, position: Position) -> FlowResult<FlowGraph> {
    map_node(graph, node_id, |node| node.position = position)
}

pub fn update_business_data(
    graph: &FlowGraph,
    node_id: &str,
    updater: impl FnOnce(Value) -> Value,
) -> FlowResult<FlowGraph> {
    map_node(graph, node_id, |node| {
        let current = std::mem::take(&mut node.data.business_data);
        node.data.business_data = updater(current);
    })
}

pub fn update_business_data_by_key(
    graph: &FlowGraph,
    node_id: &str,
    key: &str,
    updater: impl FnOnce(Value) -> Value,
) -> FlowResult<FlowGraph> {
    map_node(graph, node_id, |node| {
        let data = &mut node.data.business_data;
        if !data.is_object() {
            *data = Value::Object(Map::new());
        }
        if let Value::Object(fields) = data {
            let current = fields.remove(key).unwrap_or(Value::Null);
            fields.insert(key.to_string(), updater(current));
        }
    })
}

pub fn update_node_data(
    graph: &FlowGraph,
    node_id: &str,
    updater: impl FnOnce(&mut NodeData),
) -> FlowResult<FlowGraph> {
    map_node(graph, node_id, |node| updater(&mut node.data.node_data))
}

fn map_node(
    graph: &FlowGraph,
    node_id: &str,
    apply: impl FnOnce(&mut WorkflowNode),
) -> FlowResult<FlowGraph> {
    let mut apply = Some(apply);
    let elements: Vec<FlowElement> = graph
        .elements()
        .iter()
        .map(|element| match element {
            FlowElement::Node(node) if node.id == node_id => {
                let mut node = node.clone();
                if let Some(apply) = apply.take() {
                    apply(&mut node);
                }
                FlowElement::Node(node)
            }
            _ => element.clone(),
        })
        .collect();

    if apply.is_some() {
        return Err(FlowError::NodeNotFound(node_id.to_string()));
    }
    Ok(FlowGraph::new(elements))
}
