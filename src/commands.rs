use crate::config::EditorConfig;
use crate::error::FlowResult;
use crate::store::{FlowEditorStore, StoreValue};
use crate::workflow::graph::FlowGraph;
use crate::workflow::linked::LinkedView;
use crate::workflow::serializer::{self, SaveWorkFlow};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Node ids reachable from the start node, depth-first.
    pub reachable: Vec<String>,
    /// Nodes with no path from the start node.
    pub unreachable: Vec<String>,
    pub problem: Option<String>,
}

pub fn save_workflow(path: impl AsRef<Path>, graph: &FlowGraph) -> FlowResult<()> {
    let path = path.as_ref();
    let payload = serializer::to_json(graph)?;
    std::fs::write(path, payload)?;
    tracing::info!(path = %path.display(), elements = graph.elements().len(), "saved workflow");
    Ok(())
}

pub fn load_workflow(path: impl AsRef<Path>) -> FlowResult<FlowGraph> {
    let path = path.as_ref();
    let payload = std::fs::read_to_string(path)?;
    let graph = serializer::from_json(&payload)?;
    tracing::info!(path = %path.display(), elements = graph.elements().len(), "loaded workflow");
    Ok(graph)
}

/// Opens an editing session on a saved element list.
pub fn open_session(path: impl AsRef<Path>, config: EditorConfig) -> FlowResult<FlowEditorStore> {
    let elements = load_workflow(path)?;
    let mut value = StoreValue::initial(&config);
    value.elements = elements;
    Ok(FlowEditorStore::with_value(config, value))
}

/// Settings applied to the session before the save request is built.
/// Unset fields keep the session defaults.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub app_id: String,
    pub name: Option<String>,
    pub trigger_mode: Option<String>,
    pub cancelable: bool,
    pub urgeable: bool,
    pub node_admin_msg: bool,
    pub see_status_and_msg: bool,
    pub node: Option<String>,
    pub overrides: Map<String, Value>,
}

pub fn export_workflow(
    path: impl AsRef<Path>,
    config: EditorConfig,
    options: ExportOptions,
) -> FlowResult<SaveWorkFlow> {
    let mut store = open_session(path, config)?;
    let ExportOptions {
        app_id,
        name,
        trigger_mode,
        cancelable,
        urgeable,
        node_admin_msg,
        see_status_and_msg,
        node,
        overrides,
    } = options;
    store.update(|value| {
        if let Some(name) = name {
            value.name = name;
        }
        if let Some(mode) = trigger_mode {
            value.trigger_mode = mode;
        }
        value.cancelable = cancelable;
        value.urgeable = urgeable;
        value.node_admin_msg = node_admin_msg;
        value.see_status_and_msg = see_status_and_msg;
        value.node_id_for_drawer_form = node.unwrap_or_default();
    });
    store.build_work_flow_save_data(&app_id, &overrides)
}

pub fn summarize(graph: &FlowGraph) -> FlowResult<WorkflowSummary> {
    let problem = graph.validate().err().map(|error| error.to_string());
    let view = LinkedView::build(graph)?;

    let mut reachable = Vec::new();
    if let Some(slot) = graph
        .form_data_node()
        .and_then(|start| view.position(&start.id))
    {
        let mut seen = HashSet::new();
        for id in view.collect_descendant_ids(&[slot]) {
            if seen.insert(id.clone()) {
                reachable.push(id);
            }
        }
    }

    let reached: HashSet<&str> = reachable.iter().map(String::as_str).collect();
    let unreachable = graph
        .nodes()
        .filter(|node| !reached.contains(node.id.as_str()))
        .map(|node| node.id.clone())
        .collect();

    Ok(WorkflowSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        reachable,
        unreachable,
        problem,
    })
}
