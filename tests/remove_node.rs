use approvalflow_rs_lib::workflow::editor::remove_node_by_id;
use approvalflow_rs_lib::{EditorConfig, FlowElement, FlowGraph, LinkedView, NodeKind, WorkflowEdge, WorkflowNode};

fn node(id: &str, kind: NodeKind, y: f64) -> FlowElement {
    WorkflowNode::new(id, kind, id, 200.0, 40.0)
        .with_position(0.0, y)
        .into()
}

fn edge(source: &str, target: &str) -> FlowElement {
    WorkflowEdge::between(source, target).into()
}

/// A -> B -> C -> D, 100px apart.
fn simple_chain() -> FlowGraph {
    FlowGraph::new(vec![
        node("A", NodeKind::FormData, 0.0),
        node("B", NodeKind::Approve, 100.0),
        node("C", NodeKind::FillIn, 200.0),
        node("D", NodeKind::End, 300.0),
        edge("A", "B"),
        edge("B", "C"),
        edge("C", "D"),
    ])
}

/// A -> B, B -> C, B -> D, C -> E, D -> E.
fn branching() -> FlowGraph {
    FlowGraph::new(vec![
        node("A", NodeKind::FormData, 0.0),
        node("B", NodeKind::ProcessBranch, 100.0),
        node("C", NodeKind::Approve, 200.0),
        node("D", NodeKind::FillIn, 200.0),
        node("E", NodeKind::End, 300.0),
        edge("A", "B"),
        edge("B", "C"),
        edge("B", "D"),
        edge("C", "E"),
        edge("D", "E"),
    ])
}

fn assert_referential_integrity(graph: &FlowGraph) {
    for edge in graph.edges() {
        assert!(graph.node(&edge.source).is_some(), "dangling source in {}", edge.id);
        assert!(graph.node(&edge.target).is_some(), "dangling target in {}", edge.id);
    }
}

#[test]
fn linked_view_is_idempotent() {
    let graph = branching();
    let first = LinkedView::build(&graph).unwrap();
    let second = LinkedView::build(&graph).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_mid_chain_removal_keeps_edges_attached() {
    let config = EditorConfig::default();
    let graph = simple_chain();
    for id in ["B", "C"] {
        let after = remove_node_by_id(&graph, id, &config).unwrap();
        assert_referential_integrity(&after);
        after.validate().unwrap();
    }
}

#[test]
fn mid_chain_removal_drops_one_node_and_one_edge() {
    let graph = simple_chain();
    let after = remove_node_by_id(&graph, "C", &EditorConfig::default()).unwrap();

    assert_eq!(after.node_count(), graph.node_count() - 1);
    assert_eq!(after.edge_count(), graph.edge_count() - 1);
}

#[test]
fn removing_b_relinks_a_to_c() {
    let after = remove_node_by_id(&simple_chain(), "B", &EditorConfig::default()).unwrap();

    assert!(after.node("B").is_none());
    assert!(after.edge("eA-B").is_none());
    assert!(after.edge("eB-C").is_none());
    assert!(after.has_edge_between("A", "C"));
    assert!(after.has_edge_between("C", "D"));
    assert_eq!(after.edge_count(), 2);

    // the synthesized edge goes to the end of the element list
    assert_eq!(
        after.elements().last(),
        Some(&FlowElement::Edge(WorkflowEdge::between("A", "C")))
    );
}

#[test]
fn descendants_move_up_by_twice_the_removed_height() {
    let after = remove_node_by_id(&simple_chain(), "B", &EditorConfig::default()).unwrap();

    assert_eq!(after.node("D").unwrap().position.y, 220.0);
    assert_eq!(after.node("C").unwrap().position.y, 120.0);
    assert_eq!(after.node("A").unwrap().position.y, 0.0);
}

#[test]
fn removing_a_branch_keeps_only_the_first_scanned_child() {
    let after = remove_node_by_id(&branching(), "B", &EditorConfig::default()).unwrap();

    let synthesized: Vec<_> = after.edges().filter(|edge| edge.source == "A").collect();
    assert_eq!(synthesized.len(), 1);
    assert_eq!(synthesized[0].target, "C");
    assert!(!after.edges().any(|edge| edge.target == "D"));
    assert_referential_integrity(&after);

    // D is still in the graph but no longer reachable from A
    let view = LinkedView::build(&after).unwrap();
    let reachable = view.collect_descendant_ids(&[view.position("A").unwrap()]);
    assert!(!reachable.iter().any(|id| id == "D"));
    assert!(after.node("D").is_some());
}

#[test]
fn shared_descendants_shift_once() {
    let after = remove_node_by_id(&branching(), "B", &EditorConfig::default()).unwrap();

    // E is below both C and D but only moves by one offset
    assert_eq!(after.node("E").unwrap().position.y, 220.0);
    assert_eq!(after.node("C").unwrap().position.y, 120.0);
    assert_eq!(after.node("D").unwrap().position.y, 120.0);
}

#[test]
fn first_incoming_edge_wins_on_joins() {
    let graph = FlowGraph::new(vec![
        node("A", NodeKind::FormData, 0.0),
        node("X", NodeKind::ProcessBranch, 100.0),
        node("J", NodeKind::Approve, 200.0),
        node("E", NodeKind::End, 300.0),
        edge("A", "X"),
        edge("X", "J"),
        edge("A", "J"),
        edge("J", "E"),
    ]);
    let after = remove_node_by_id(&graph, "J", &EditorConfig::default()).unwrap();

    assert!(after.has_edge_between("X", "E"));
    assert!(!after.has_edge_between("A", "E"));
    assert_eq!(after.edge_count(), 2);
}
