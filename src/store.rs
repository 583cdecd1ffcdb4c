//! Editor state container.
//!
//! One `FlowEditorStore` lives per editing session. Every state change goes
//! through [`FlowEditorStore::next`], which replaces the value and notifies
//! subscribers in subscription order.

use crate::config::EditorConfig;
use crate::error::{FlowError, FlowResult};
use crate::workflow::editor;
use crate::workflow::graph::FlowGraph;
use crate::workflow::node::{NodeData, NodeKind, Position, WorkflowNode};
use crate::workflow::serializer::{self, SaveWorkFlow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreValue {
    pub id: String,
    pub name: String,
    pub version: String,
    pub status: String,
    pub process_key: String,
    pub trigger_mode: String,
    pub cancelable: bool,
    pub urgeable: bool,
    pub see_status_and_msg: bool,
    pub node_admin_msg: bool,
    pub saved: bool,
    pub need_save_flow: bool,
    pub node_id_for_drawer_form: String,
    pub elements: FlowGraph,
}

impl StoreValue {
    pub fn initial(config: &EditorConfig) -> Self {
        Self {
            id: String::new(),
            name: format!(
                "{}{}",
                config.untitled_prefix,
                chrono::Local::now().format("%Y-%m-%d-%H-%M-%S")
            ),
            version: config.default_version.clone(),
            status: "DISABLE".to_string(),
            process_key: String::new(),
            trigger_mode: "FORM_DATA".to_string(),
            cancelable: false,
            urgeable: false,
            see_status_and_msg: false,
            node_admin_msg: false,
            saved: false,
            need_save_flow: false,
            node_id_for_drawer_form: String::new(),
            elements: FlowGraph::seeded(config),
        }
    }
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StoreValue)>;

pub struct FlowEditorStore {
    config: EditorConfig,
    value: StoreValue,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for FlowEditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEditorStore")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FlowEditorStore {
    pub fn new(config: EditorConfig) -> Self {
        let value = StoreValue::initial(&config);
        Self::with_value(config, value)
    }

    pub fn with_value(config: EditorConfig, value: StoreValue) -> Self {
        Self {
            config,
            value,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn value(&self) -> &StoreValue {
        &self.value
    }

    pub fn elements(&self) -> &FlowGraph {
        &self.value.elements
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreValue) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub fn next(&mut self, value: StoreValue) {
        self.value = value;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.value);
        }
    }

    /// Starts a new session, keeping subscribers.
    pub fn reset(&mut self) {
        let value = StoreValue::initial(&self.config);
        self.next(value);
    }

    pub fn update(&mut self, updater: impl FnOnce(&mut StoreValue)) {
        let mut value = self.value.clone();
        updater(&mut value);
        self.next(value);
    }

    /// Removes a node, refusing the start and end nodes of the chain.
    pub fn remove_node_by_id(&mut self, node_id: &str) -> FlowResult<()> {
        let node = self
            .get_node_element_by_id(node_id)
            .ok_or_else(|| FlowError::NodeNotFound(node_id.to_string()))?;
        if node.kind.is_boundary() {
            return Err(FlowError::Validation(format!(
                "{} node {} cannot be removed",
                node.kind.as_str(),
                node_id
            )));
        }
        let config = self.config.clone();
        self.apply(|graph| editor::remove_node_by_id(graph, node_id, &config))
    }

    /// Builds a node of `kind` and splices it onto `edge_id`. Returns the new id.
    pub fn insert_node_on_edge(
        &mut self,
        edge_id: &str,
        kind: NodeKind,
        name: &str,
    ) -> FlowResult<String> {
        let config = self.config.clone();
        let node = WorkflowNode::build(kind, name, &config);
        let id = node.id.clone();
        self.apply(|graph| editor::insert_node_on_edge(graph, edge_id, node, &config))?;
        Ok(id)
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> FlowResult<()> {
        self.apply(|graph| editor::move_node(graph, node_id, position))
    }

    pub fn update_business_data(
        &mut self,
        node_id: &str,
        updater: impl FnOnce(Value) -> Value,
    ) -> FlowResult<()> {
        self.apply(|graph| editor::update_business_data(graph, node_id, updater))
    }

    pub fn update_business_data_by_key(
        &mut self,
        node_id: &str,
        key: &str,
        updater: impl FnOnce(Value) -> Value,
    ) -> FlowResult<()> {
        self.apply(|graph| editor::update_business_data_by_key(graph, node_id, key, updater))
    }

    pub fn update_node_data(
        &mut self,
        node_id: &str,
        updater: impl FnOnce(&mut NodeData),
    ) -> FlowResult<()> {
        self.apply(|graph| editor::update_node_data(graph, node_id, updater))
    }

    pub fn get_node_element_by_id(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.value.elements.node(node_id)
    }

    pub fn get_form_data_element(&self) -> Option<&WorkflowNode> {
        self.value.elements.form_data_node()
    }

    pub fn build_work_flow_save_data(
        &self,
        app_id: &str,
        overrides: &Map<String, Value>,
    ) -> FlowResult<SaveWorkFlow> {
        serializer::build_work_flow_save_data(&self.value, app_id, overrides)
    }

    fn apply(&mut self, edit: impl FnOnce(&FlowGraph) -> FlowResult<FlowGraph>) -> FlowResult<()> {
        let elements = edit(&self.value.elements)?;
        self.update(|value| {
            value.elements = elements;
            value.need_save_flow = true;
        });
        Ok(())
    }
}

impl Default for FlowEditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
