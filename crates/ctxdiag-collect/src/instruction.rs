//! The declarative instruction tree.
//!
//! ```yaml
//! include:
//!   name: allocated_functions
//!   filter: { type: LogicalFunction }
//!   get:
//!     - name: inputs
//!       include: { name: exchanges }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ctxdiag_core::{Error, Result, Scalar};

/// One node of an instruction tree.
///
/// The same shape serves as the root instruction and as a target entry
/// inside `get`/`include`; target entries must carry `name`. Unknown keys
/// are ignored and `null` means absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Attribute to resolve on the current element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Traverse into matches without emitting them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Targets>,
    /// Traverse into matches and emit them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Targets>,
    /// Attribute name -> expected value; every entry must be equal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<BTreeMap<String, Scalar>>,
    /// Repeat budget armed when this instruction is first applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
}

/// `get`/`include` value: a single target entry or a sequence of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    Many(Vec<Instruction>),
    One(Box<Instruction>),
}

impl Targets {
    pub fn as_slice(&self) -> &[Instruction] {
        match self {
            Targets::Many(targets) => targets,
            Targets::One(target) => std::slice::from_ref(target.as_ref()),
        }
    }
}

impl From<Instruction> for Targets {
    fn from(target: Instruction) -> Self {
        Targets::One(Box::new(target))
    }
}

impl From<Vec<Instruction>> for Targets {
    fn from(targets: Vec<Instruction>) -> Self {
        Targets::Many(targets)
    }
}

impl Instruction {
    /// A target entry resolving `name`.
    pub fn target(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_get(mut self, targets: impl Into<Targets>) -> Self {
        self.get = Some(targets.into());
        self
    }

    pub fn with_include(mut self, targets: impl Into<Targets>) -> Self {
        self.include = Some(targets.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.filter
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// `get` entries; empty when absent.
    pub fn get_targets(&self) -> &[Instruction] {
        self.get.as_ref().map(Targets::as_slice).unwrap_or_default()
    }

    /// `include` entries; empty when absent.
    pub fn include_targets(&self) -> &[Instruction] {
        self.include.as_ref().map(Targets::as_slice).unwrap_or_default()
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| {
            Error::config_invalid(format!("malformed instruction: {err}"))
                .with_operation("instruction::from_json_value")
                .set_source(err)
        })
    }

    pub fn from_yaml_value(value: serde_yaml::Value) -> Result<Self> {
        serde_yaml::from_value(value).map_err(|err| {
            Error::config_invalid(format!("malformed instruction: {err}"))
                .with_operation("instruction::from_yaml_value")
                .set_source(err)
        })
    }

    /// Parse YAML text (JSON is accepted too, being a YAML subset).
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|err| {
            Error::config_invalid(format!("malformed instruction: {err}"))
                .with_operation("instruction::from_yaml_str")
                .set_source(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxdiag_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_and_sequence_targets_normalize() {
        let single = Instruction::from_yaml_str("include: { name: parts }").unwrap();
        let many = Instruction::from_yaml_str("include: [ { name: parts } ]").unwrap();
        assert_eq!(single.include_targets(), many.include_targets());
        assert_eq!(single.include_targets()[0].name.as_deref(), Some("parts"));
        assert!(single.get_targets().is_empty());
    }

    #[test]
    fn test_full_entry_decodes() {
        let instruction = Instruction::from_yaml_str(
            r#"
get:
  name: children
  repeat: 3
  filter: { type: LogicalComponent, is_actor: false }
  include:
    - name: ports
    - name: exchanges
"#,
        )
        .unwrap();

        let expected = Instruction::default().with_get(
            Instruction::target("children")
                .with_repeat(3)
                .with_filter("type", "LogicalComponent")
                .with_filter("is_actor", false)
                .with_include(vec![
                    Instruction::target("ports"),
                    Instruction::target("exchanges"),
                ]),
        );
        assert_eq!(instruction, expected);
    }

    #[test]
    fn test_nulls_and_unknown_keys() {
        let instruction =
            Instruction::from_yaml_str("get: null\ninclude: null\nshape: round\n").unwrap();
        assert_eq!(instruction, Instruction::default());
    }

    #[test]
    fn test_negative_repeat_is_config_error() {
        let err = Instruction::from_yaml_str("include: { name: parts, repeat: -1 }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_json_and_yaml_values() {
        let json = serde_json::json!({"include": {"name": "parts", "filter": {"kind": "X"}}});
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("include: { name: parts, filter: { kind: X } }").unwrap();
        assert_eq!(
            Instruction::from_json_value(json).unwrap(),
            Instruction::from_yaml_value(yaml).unwrap()
        );
    }

    #[test]
    fn test_scalar_target_is_rejected() {
        let err = Instruction::from_json_value(serde_json::json!({"get": "parts"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
