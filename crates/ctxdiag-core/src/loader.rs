//! Model documents and the builder that turns them into a [`Model`].
//!
//! Document layout (YAML or JSON):
//!
//! ```yaml
//! name: demo
//! elements:
//!   - uuid: 0d2e...          # optional, generated when missing
//!     type: LogicalComponent
//!     name: Controller
//!     attributes: { is_actor: false }
//!     links:
//!       allocated_functions: [1a7c..., 22b0...]
//!       owner: 9f13...
//!     owned:                 # nested elements, contained by this one
//!       - type: LogicalFunction
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::accessor::AccessorRegistry;
use crate::graph::AttrValue;
use crate::model::{Element, ElementId, Link, Model};
use crate::value::Scalar;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub links: BTreeMap<String, LinkDocument>,
    #[serde(default)]
    pub owned: Vec<ElementDocument>,
}

/// A link by uuid: one string is a single reference, a list is a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkDocument {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn parse(self, text: &str) -> Result<ModelDocument> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|err| {
                Error::deserialization_failed(err.to_string())
                    .with_operation("model::parse_yaml")
                    .set_source(err)
            }),
            DocumentFormat::Json => serde_json::from_str(text).map_err(|err| {
                Error::deserialization_failed(err.to_string())
                    .with_operation("model::parse_json")
                    .set_source(err)
            }),
        }
    }
}

/// Builds a [`Model`] from a [`ModelDocument`].
///
/// Element ids are assigned in document pre-order, so parents always come
/// before what they own.
pub struct ModelBuilder {
    accessors: AccessorRegistry,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Builder whose models expose the built-in attributes.
    pub fn new() -> Self {
        Self {
            accessors: AccessorRegistry::with_builtins(),
        }
    }

    pub fn with_registry(accessors: AccessorRegistry) -> Self {
        Self { accessors }
    }

    pub fn with_accessor<F>(mut self, kind: impl Into<String>, name: impl Into<String>, accessor: F) -> Self
    where
        F: for<'m> Fn(&'m Model, &'m Element) -> AttrValue<'m, ElementId> + Send + Sync + 'static,
    {
        self.accessors.register(kind, name, accessor);
        self
    }

    pub fn with_common_accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: for<'m> Fn(&'m Model, &'m Element) -> AttrValue<'m, ElementId> + Send + Sync + 'static,
    {
        self.accessors.register_common(name, accessor);
        self
    }

    pub fn build(self, document: ModelDocument) -> Result<Model> {
        let mut state = BuildState::default();
        let mut roots = Vec::with_capacity(document.elements.len());
        for element in document.elements {
            roots.push(state.add(element, None)?);
        }
        state.resolve_links()?;

        debug!(
            elements = state.elements.len(),
            roots = roots.len(),
            "model built"
        );
        Ok(Model::new(
            document.name.unwrap_or_default(),
            state.elements,
            state.by_uuid,
            roots,
            self.accessors,
        ))
    }
}

#[derive(Default)]
struct BuildState {
    elements: Vec<Element>,
    by_uuid: HashMap<String, ElementId>,
    pending_links: Vec<(ElementId, BTreeMap<String, LinkDocument>)>,
}

impl BuildState {
    fn add(&mut self, document: ElementDocument, parent: Option<ElementId>) -> Result<ElementId> {
        let id = ElementId::new(self.elements.len() as u32);
        let uuid = document
            .uuid
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if self.by_uuid.insert(uuid.clone(), id).is_some() {
            return Err(Error::invalid_format("duplicate element uuid")
                .with_operation("model::build")
                .with_context("uuid", uuid));
        }
        if let Some(name) = document
            .links
            .keys()
            .find(|name| document.attributes.contains_key(*name))
        {
            return Err(
                Error::invalid_format("attribute and link share a name")
                    .with_operation("model::build")
                    .with_context("uuid", uuid)
                    .with_context("name", name.clone()),
            );
        }

        self.elements.push(Element {
            id,
            uuid,
            kind: document.kind,
            name: document.name,
            parent,
            owned: Vec::with_capacity(document.owned.len()),
            attributes: document.attributes,
            links: BTreeMap::new(),
        });
        if !document.links.is_empty() {
            self.pending_links.push((id, document.links));
        }

        for child in document.owned {
            let child_id = self.add(child, Some(id))?;
            self.elements[id.index()].owned.push(child_id);
        }
        Ok(id)
    }

    fn resolve_links(&mut self) -> Result<()> {
        for (id, links) in std::mem::take(&mut self.pending_links) {
            let mut resolved = BTreeMap::new();
            for (name, link) in links {
                let link = match link {
                    LinkDocument::One(target) => Link::One(self.lookup(id, &name, &target)?),
                    LinkDocument::Many(targets) => Link::Many(
                        targets
                            .iter()
                            .map(|target| self.lookup(id, &name, target))
                            .collect::<Result<Vec<_>>>()?,
                    ),
                };
                resolved.insert(name, link);
            }
            self.elements[id.index()].links = resolved;
        }
        Ok(())
    }

    fn lookup(&self, from: ElementId, link: &str, target: &str) -> Result<ElementId> {
        self.by_uuid.get(target).copied().ok_or_else(|| {
            Error::invalid_format("link points at an unknown element")
                .with_operation("model::build")
                .with_context("uuid", self.elements[from.index()].uuid.clone())
                .with_context("link", link)
                .with_context("target", target)
        })
    }
}

impl Model {
    /// Build a model with the built-in accessors.
    pub fn from_document(document: ModelDocument) -> Result<Model> {
        ModelBuilder::new().build(document)
    }

    pub fn from_yaml_str(text: &str) -> Result<Model> {
        Self::from_document(DocumentFormat::Yaml.parse(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Model> {
        Self::from_document(DocumentFormat::Json.parse(text)?)
    }

    /// Read and build a model file; the format follows the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Model> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", shown.clone()))?;
        let document = DocumentFormat::from_path(path)
            .parse(&text)
            .map_err(|err| err.with_context("path", shown.clone()))?;
        let model = Self::from_document(document)
            .map_err(|err| err.with_operation("model::load").with_context("path", shown.clone()))?;

        info!(path = %shown, elements = model.len(), "model loaded");
        Ok(model)
    }
}
