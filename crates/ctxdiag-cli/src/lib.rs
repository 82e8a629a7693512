//! ctxdiag command-line interface.
//!
pub mod options;
pub mod output;
pub mod pipeline;

use std::path::PathBuf;

use tracing::info;

use ctxdiag_core::{ModelGraph, Result};

pub use options::{CollectOptions, Command, ElementsOptions, OutputFormat};
pub use pipeline::{TargetCollection, collect_targets, load_model, read_request};

/// Options for running ctxdiag.
#[derive(Debug, Clone)]
pub struct CtxdiagOptions {
    pub model: PathBuf,
    pub command: Command,
}

/// Main entry point: run one subcommand and return its rendered output.
pub fn run_main(opts: &CtxdiagOptions) -> Result<String> {
    let model = load_model(&opts.model)?;

    match &opts.command {
        Command::Elements(elements) => {
            let listed = model.list_elements(&elements.selection());
            info!(count = listed.len(), "elements listed");
            output::render_elements(&listed, elements.format)
        }
        Command::Validate { uuid } => {
            let id = model.by_id(uuid)?;
            Ok(output::render_validated(model.element(id)))
        }
        Command::Attributes { uuid, format } => {
            let id = model.by_id(uuid)?;
            output::render_attributes(&model, model.element(id), *format)
        }
        Command::Collect(collect) => {
            let diagram = read_request(&collect.request)?;
            let collections = collect_targets(
                &model,
                &collect.targets,
                &diagram.instructions,
                collect.collect_option(),
                collect.limit,
            )?;
            output::render_collections(&collections, collect.format)
        }
    }
}
