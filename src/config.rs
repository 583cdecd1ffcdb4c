use crate::error::{FlowError, FlowResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub end_node_width: f64,
    pub end_node_height: f64,
    /// Multiple of the removed node's height that descendants move by.
    pub offset_factor: f64,
    pub default_version: String,
    pub untitled_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 72.0,
            end_node_width: 100.0,
            end_node_height: 28.0,
            offset_factor: 2.0,
            default_version: "0.1".to_string(),
            untitled_prefix: "Untitled workflow ".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<EditorConfig>(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> FlowResult<()> {
        let sizes = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("end_node_width", self.end_node_width),
            ("end_node_height", self.end_node_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(FlowError::Validation(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.offset_factor.is_finite() || self.offset_factor < 0.0 {
            return Err(FlowError::Validation(format!(
                "offset_factor must not be negative, got {}",
                self.offset_factor
            )));
        }
        Ok(())
    }
}
