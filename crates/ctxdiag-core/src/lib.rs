//! Attribute-linked model graph.
//!
//! A [`Model`] is an immutable set of elements loaded from a YAML or JSON
//! document. Every element has a uuid, a type name and named attributes; an
//! attribute resolves to a scalar, a single element, or a list of elements.
//! Collectors only see the graph through the [`ModelGraph`] trait.
//!
//! # Module Structure
//!
//! - [`value`]: Scalar attribute values
//! - [`graph`]: The `ModelGraph` trait and `AttrValue`
//! - [`model`]: In-memory `Model` and `Element`
//! - [`accessor`]: Per-type attribute accessors
//! - [`loader`]: Model documents and `ModelBuilder`
//! - [`listing`]: Element listing for pickers

pub mod accessor;
pub mod graph;
pub mod listing;
pub mod loader;
pub mod model;
pub mod value;

pub use accessor::{Accessor, AccessorRegistry, BuiltinAttr};
pub use ctxdiag_error::{Error, ErrorKind, Result};
pub use graph::{AttrValue, ModelGraph};
pub use listing::{DEFAULT_LISTED_KINDS, ElementSummary, KindSelection};
pub use loader::{DocumentFormat, ElementDocument, LinkDocument, ModelBuilder, ModelDocument};
pub use model::{Element, ElementId, Link, Model};
pub use value::Scalar;
