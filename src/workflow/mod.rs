pub mod edge;
pub mod editor;
pub mod graph;
pub mod linked;
pub mod node;
pub mod serializer;

pub use edge::WorkflowEdge;
pub use graph::{FlowElement, FlowGraph};
pub use linked::{LinkedNode, LinkedView};
pub use node::{NodeData, NodeKind, NodePayload, Position, WorkflowNode};
