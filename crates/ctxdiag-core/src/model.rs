use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::accessor::AccessorRegistry;
use crate::graph::{AttrValue, ModelGraph};
use crate::value::Scalar;
use crate::{Error, Result};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ElementId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stored reference attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    One(ElementId),
    Many(Vec<ElementId>),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub uuid: String,
    /// Type name, e.g. "LogicalComponent"
    pub kind: String,
    pub name: String,
    /// Containing element, `None` for roots
    pub parent: Option<ElementId>,
    /// Directly contained elements, in document order
    pub owned: Vec<ElementId>,
    pub attributes: BTreeMap<String, Scalar>,
    pub links: BTreeMap<String, Link>,
}

/// Immutable in-memory model.
///
/// Elements live in one dense arena indexed by [`ElementId`]; uuids map onto
/// that arena. Attribute resolution goes through the model's
/// [`AccessorRegistry`] before falling back to stored data.
pub struct Model {
    name: String,
    elements: Vec<Element>,
    by_uuid: HashMap<String, ElementId>,
    roots: Vec<ElementId>,
    accessors: AccessorRegistry,
}

impl Model {
    pub(crate) fn new(
        name: String,
        elements: Vec<Element>,
        by_uuid: HashMap<String, ElementId>,
        roots: Vec<ElementId>,
        accessors: AccessorRegistry,
    ) -> Self {
        Self {
            name,
            elements,
            by_uuid,
            roots,
            accessors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Panics if `id` was not handed out by this model.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn find(&self, uuid: &str) -> Option<ElementId> {
        self.by_uuid.get(uuid).copied()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Top-level elements, in document order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn accessors(&self) -> &AccessorRegistry {
        &self.accessors
    }

    /// Resolve `name` on `id`: registered accessor, then stored attribute,
    /// then stored link.
    pub fn attribute(&self, id: ElementId, name: &str) -> AttrValue<'_, ElementId> {
        let element = self.element(id);
        if let Some(accessor) = self.accessors.resolve(&element.kind, name) {
            return accessor(self, element);
        }
        if let Some(value) = element.attributes.get(name) {
            return AttrValue::Scalar(Cow::Borrowed(value));
        }
        match element.links.get(name) {
            Some(Link::One(target)) => AttrValue::Single(*target),
            Some(Link::Many(targets)) => AttrValue::Many(Cow::Borrowed(targets.as_slice())),
            None => AttrValue::Absent,
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("elements", &self.elements.len())
            .field("roots", &self.roots)
            .field("accessors", &self.accessors)
            .finish()
    }
}

impl ModelGraph for Model {
    type Node = ElementId;

    fn by_id(&self, uuid: &str) -> Result<ElementId> {
        self.find(uuid)
            .ok_or_else(|| Error::element_not_found(uuid).with_operation("model::by_id"))
    }

    fn attribute(&self, node: ElementId, name: &str) -> AttrValue<'_, ElementId> {
        Model::attribute(self, node, name)
    }

    fn uuid(&self, node: ElementId) -> &str {
        &self.element(node).uuid
    }
}
