//! Diagram request documents.
//!
//! A request names exactly one diagram and its parameters:
//!
//! ```yaml
//! custom_diagram:
//!   collect:
//!     include: { name: parts }
//!   display_symbols_as_boxes: true
//! ```
//!
//! A bare string (`custom_diagram`) is shorthand for a diagram without
//! parameters.

use serde_json::{Map, Value};

use ctxdiag_core::{Error, Result};

use crate::instruction::Instruction;

pub const CUSTOM_DIAGRAM: &str = "custom_diagram";

/// Parameter of a custom diagram holding the instruction tree.
pub const COLLECT_PARAM: &str = "collect";

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramRequest {
    pub diagram: String,
    pub params: Map<String, Value>,
}

/// A custom diagram request split into its instructions and the remaining
/// render parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDiagram {
    pub instructions: Instruction,
    pub params: Map<String, Value>,
}

impl DiagramRequest {
    pub fn from_value(value: Value) -> Result<Self> {
        let (diagram, params) = match value {
            Value::String(diagram) => (diagram, Value::Null),
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(Error::config_invalid("Only one diagram can be rendered at a time")
                        .with_operation("request::parse")
                        .with_context("diagrams", map.len().to_string()));
                }
                let Some(entry) = map.into_iter().next() else {
                    return Err(Error::unexpected("diagram entry vanished"));
                };
                entry
            }
            _ => {
                return Err(Error::config_invalid(
                    "The YAML description must be a string or a dictionary",
                )
                .with_operation("request::parse"));
            }
        };

        let params = match params {
            Value::Null => Map::new(),
            Value::Object(params) => params,
            _ => {
                return Err(Error::config_invalid("diagram parameters must be a mapping")
                    .with_operation("request::parse")
                    .with_context("diagram", diagram));
            }
        };
        Ok(Self { diagram, params })
    }

    /// Parse YAML (or JSON) request text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("request::from_yaml_str")
                .set_source(err)
        })?;
        Self::from_value(value)
    }

    pub fn is_custom(&self) -> bool {
        self.diagram == CUSTOM_DIAGRAM
    }

    /// Split off the `collect` instructions; only custom diagrams have them.
    pub fn into_custom(mut self) -> Result<CustomDiagram> {
        if !self.is_custom() {
            return Err(Error::unsupported(format!(
                "diagram '{}' cannot be collected, only '{}' can",
                self.diagram, CUSTOM_DIAGRAM
            ))
            .with_operation("request::into_custom")
            .with_context("diagram", self.diagram));
        }

        let instructions = match self.params.remove(COLLECT_PARAM) {
            None | Some(Value::Null) => Instruction::default(),
            Some(value) => Instruction::from_json_value(value)
                .map_err(|err| err.with_operation("request::into_custom"))?,
        };
        Ok(CustomDiagram {
            instructions,
            params: self.params,
        })
    }
}
