//! Instruction-driven element collection for custom diagrams.
//!
//! Given a start element and a declarative instruction tree, a
//! [`Collector`] walks the model graph and lazily yields the elements a
//! diagram should show. It follows named attributes, applies equality
//! filters, never visits an element twice, and supports a bounded `repeat`.
//!
//! # Module Structure
//!
//! - [`instruction`]: The serde instruction model
//! - [`program`]: Validated, flattened instruction steps
//! - [`types`]: Collection options and per-run state
//! - [`collect`]: The work-stack collector
//! - [`request`]: Diagram request documents

pub mod collect;
pub mod instruction;
pub mod program;
pub mod request;
pub mod types;

pub use collect::{Collector, collect, collect_by_id, collect_with};
pub use instruction::{Instruction, Targets};
pub use program::{Program, Step, StepId};
pub use request::{COLLECT_PARAM, CUSTOM_DIAGRAM, CustomDiagram, DiagramRequest};
pub use types::{CollectOption, CollectorState, FilterSubject};
