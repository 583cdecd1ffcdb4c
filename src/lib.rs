pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod store;
pub mod workflow;

pub use config::EditorConfig;
pub use error::{FlowError, FlowResult};
pub use store::{FlowEditorStore, StoreValue};
pub use workflow::{FlowElement, FlowGraph, LinkedView, NodeKind, WorkflowEdge, WorkflowNode};
