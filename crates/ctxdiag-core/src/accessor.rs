//! Attribute accessors registered per element type.
//!
//! Attribute names are resolved by lookup instead of reflection: a model
//! carries a registry mapping `(type name, attribute name)` to a closure.
//! Accessors registered for a specific type win over common ones; names
//! with no accessor fall through to the element's stored data.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::graph::AttrValue;
use crate::model::{Element, ElementId, Model};
use crate::value::Scalar;

pub type Accessor =
    Arc<dyn for<'m> Fn(&'m Model, &'m Element) -> AttrValue<'m, ElementId> + Send + Sync>;

/// Attributes every element exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinAttr {
    Uuid,
    Name,
    Type,
    Parent,
    Owned,
}

impl BuiltinAttr {
    pub fn read<'m>(self, element: &'m Element) -> AttrValue<'m, ElementId> {
        match self {
            BuiltinAttr::Uuid => AttrValue::Scalar(Cow::Owned(Scalar::from(element.uuid.as_str()))),
            BuiltinAttr::Name => AttrValue::Scalar(Cow::Owned(Scalar::from(element.name.as_str()))),
            BuiltinAttr::Type => AttrValue::Scalar(Cow::Owned(Scalar::from(element.kind.as_str()))),
            BuiltinAttr::Parent => element
                .parent
                .map(AttrValue::Single)
                .unwrap_or(AttrValue::Absent),
            BuiltinAttr::Owned => AttrValue::Many(Cow::Borrowed(element.owned.as_slice())),
        }
    }
}

#[derive(Clone, Default)]
pub struct AccessorRegistry {
    common: HashMap<String, Accessor>,
    per_kind: HashMap<String, HashMap<String, Accessor>>,
}

impl AccessorRegistry {
    /// An empty registry: only stored attributes and links resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every [`BuiltinAttr`] registered as a common accessor.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for attr in BuiltinAttr::iter() {
            let name: &'static str = attr.into();
            registry.register_common(name, move |_, element| attr.read(element));
        }
        registry
    }

    /// Register an accessor available on every element type.
    pub fn register_common<F>(&mut self, name: impl Into<String>, accessor: F)
    where
        F: for<'m> Fn(&'m Model, &'m Element) -> AttrValue<'m, ElementId> + Send + Sync + 'static,
    {
        self.common.insert(name.into(), Arc::new(accessor));
    }

    /// Register an accessor for one element type only.
    pub fn register<F>(&mut self, kind: impl Into<String>, name: impl Into<String>, accessor: F)
    where
        F: for<'m> Fn(&'m Model, &'m Element) -> AttrValue<'m, ElementId> + Send + Sync + 'static,
    {
        self.per_kind
            .entry(kind.into())
            .or_default()
            .insert(name.into(), Arc::new(accessor));
    }

    pub fn resolve(&self, kind: &str, name: &str) -> Option<&Accessor> {
        self.per_kind
            .get(kind)
            .and_then(|accessors| accessors.get(name))
            .or_else(|| self.common.get(name))
    }

    /// Accessor names visible on `kind`, sorted.
    pub fn names_for(&self, kind: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self.common.keys().map(String::as_str).collect();
        if let Some(accessors) = self.per_kind.get(kind) {
            names.extend(accessors.keys().map(String::as_str));
        }
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut common: Vec<&String> = self.common.keys().collect();
        common.sort();
        let mut kinds: Vec<&String> = self.per_kind.keys().collect();
        kinds.sort();
        f.debug_struct("AccessorRegistry")
            .field("common", &common)
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::ModelBuilder;
    use crate::loader::ModelDocument;

    fn document() -> ModelDocument {
        serde_yaml::from_str(
            r#"
elements:
  - uuid: c1
    type: LogicalComponent
    name: Parent
    owned:
      - uuid: p1
        type: PhysicalPort
        name: Port
      - uuid: f1
        type: LogicalFunction
        name: Function
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_names_round_trip() {
        assert_eq!(BuiltinAttr::from_str("parent").unwrap(), BuiltinAttr::Parent);
        assert_eq!(BuiltinAttr::Owned.to_string(), "owned");
    }

    #[test]
    fn test_per_kind_accessor_only_applies_to_its_kind() {
        let model = ModelBuilder::new()
            .with_accessor("LogicalComponent", "ports", |model, element| {
                let ports: Vec<ElementId> = element
                    .owned
                    .iter()
                    .copied()
                    .filter(|id| model.element(*id).kind == "PhysicalPort")
                    .collect();
                AttrValue::Many(Cow::Owned(ports))
            })
            .build(document())
            .unwrap();

        let c1 = model.find("c1").unwrap();
        let p1 = model.find("p1").unwrap();
        let f1 = model.find("f1").unwrap();

        assert_eq!(model.attribute(c1, "ports").nodes(), &[p1]);
        assert!(model.attribute(f1, "ports").is_absent());
        assert!(model.accessors().names_for("LogicalComponent").contains(&"ports"));
        assert!(!model.accessors().names_for("LogicalFunction").contains(&"ports"));
    }

    #[test]
    fn test_per_kind_accessor_shadows_common() {
        let model = ModelBuilder::new()
            .with_accessor("PhysicalPort", "name", |_, _| {
                AttrValue::Scalar(Cow::Owned(Scalar::from("renamed")))
            })
            .build(document())
            .unwrap();

        let p1 = model.find("p1").unwrap();
        let f1 = model.find("f1").unwrap();
        assert_eq!(
            model.attribute(p1, "name").as_scalar(),
            Some(&Scalar::from("renamed"))
        );
        assert_eq!(
            model.attribute(f1, "name").as_scalar(),
            Some(&Scalar::from("Function"))
        );
    }
}
