use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Workflow validation failed: {0}")]
    Validation(String),
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("edge not found: {0}")]
    EdgeNotFound(String),
    #[error("edge {edge} references unknown node: source={source_id}, target={target_id}")]
    DanglingEdge {
        edge: String,
        source_id: String,
        target_id: String,
    },
    #[error("element id already exists: {0}")]
    DuplicateId(String),
}

pub type FlowResult<T> = Result<T, FlowError>;

impl From<std::io::Error> for FlowError {
    fn from(error: std::io::Error) -> Self {
        FlowError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(error: serde_json::Error) -> Self {
        FlowError::Serialization(error.to_string())
    }
}
