//! Core processing pipeline: load model → read request → collect per target.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use ctxdiag_collect::{CollectOption, Collector, CustomDiagram, DiagramRequest, Instruction, Program};
use ctxdiag_core::{ElementSummary, Error, Model, ModelGraph, Result};

/// Elements collected for one start element, in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCollection {
    pub target: String,
    pub elements: Vec<ElementSummary>,
}

pub fn load_model(path: &Path) -> Result<Model> {
    let start = Instant::now();
    let model = Model::load(path)?;
    info!(
        elements = model.len(),
        "Model loading: {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(model)
}

/// Read a diagram request from a file, or from stdin when `source` is `-`,
/// and split off its collection instructions.
pub fn read_request(source: &str) -> Result<CustomDiagram> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| Error::from(err).with_context("path", "<stdin>"))?;
        text
    } else {
        std::fs::read_to_string(source).map_err(|err| Error::from(err).with_context("path", source))?
    };

    DiagramRequest::from_yaml_str(&text)?.into_custom()
}

/// Run one independent collection per target.
///
/// Collections run on the rayon pool; the result keeps the order of
/// `targets`. `limit` stops draining each lazy sequence early; an empty
/// target list or a zero limit is an invalid argument.
pub fn collect_targets(
    model: &Model,
    targets: &[String],
    instructions: &Instruction,
    option: CollectOption,
    limit: Option<usize>,
) -> Result<Vec<TargetCollection>> {
    if targets.is_empty() {
        return Err(Error::invalid_argument("at least one target is required")
            .with_operation("pipeline::collect"));
    }
    if limit == Some(0) {
        return Err(Error::invalid_argument("limit must be at least 1")
            .with_operation("pipeline::collect")
            .with_context("limit", "0"));
    }
    let program = Program::compile(instructions).map_err(|err| err.with_operation("pipeline::collect"))?;

    let start = Instant::now();
    let collections = targets
        .par_iter()
        .map(|uuid| {
            let target = model.by_id(uuid)?;
            let collector = Collector::new(model, target, program.clone(), option);
            let elements = collector
                .take(limit.unwrap_or(usize::MAX))
                .map(|id| ElementSummary::from(model.element(id)))
                .collect();
            Ok(TargetCollection {
                target: uuid.clone(),
                elements,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        targets = collections.len(),
        "Collection: {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(collections)
}
