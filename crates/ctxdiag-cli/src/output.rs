//! Output rendering (plain text and JSON).

use std::fmt::Write;

use serde::Serialize;
use serde_json::{Map, Value, json};

use ctxdiag_core::{Element, ElementSummary, Error, ErrorKind, Link, Model, ModelGraph, Result};

use crate::options::OutputFormat;
use crate::pipeline::TargetCollection;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| {
        Error::new(ErrorKind::SerializationFailed, err.to_string())
            .with_operation("output::to_json")
            .set_source(err)
    })
}

fn summary_line(out: &mut String, summary: &ElementSummary) {
    let _ = writeln!(out, "{}\t{}\t{}", summary.uuid, summary.kind, summary.name);
}

pub fn render_elements(elements: &[ElementSummary], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(elements),
        OutputFormat::Text => {
            let mut out = String::new();
            for summary in elements {
                summary_line(&mut out, summary);
            }
            Ok(out)
        }
    }
}

pub fn render_validated(element: &Element) -> String {
    format!("{} is a valid {} ({})", element.uuid, element.kind, element.name)
}

fn link_uuids<'m>(model: &'m Model, link: &Link) -> Vec<&'m str> {
    match link {
        Link::One(id) => vec![model.uuid(*id)],
        Link::Many(ids) => ids.iter().map(|id| model.uuid(*id)).collect(),
    }
}

pub fn render_attributes(model: &Model, element: &Element, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let attributes = serde_json::to_value(&element.attributes).map_err(|err| {
                Error::new(ErrorKind::SerializationFailed, err.to_string())
                    .with_operation("output::render_attributes")
                    .set_source(err)
            })?;
            let links: Map<String, Value> = element
                .links
                .iter()
                .map(|(name, link)| {
                    let value = match link {
                        Link::One(id) => json!(model.uuid(*id)),
                        Link::Many(_) => json!(link_uuids(model, link)),
                    };
                    (name.clone(), value)
                })
                .collect();
            to_json(&json!({
                "uuid": element.uuid,
                "type": element.kind,
                "name": element.name,
                "parent": element.parent.map(|id| model.uuid(id)),
                "attributes": attributes,
                "links": links,
            }))
        }
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "{} {} ({})", element.kind, element.name, element.uuid);
            for (name, value) in &element.attributes {
                let _ = writeln!(out, "  {name} = {value}");
            }
            for (name, link) in &element.links {
                let _ = writeln!(out, "  {name} -> {}", link_uuids(model, link).join(", "));
            }
            Ok(out)
        }
    }
}

pub fn render_collections(collections: &[TargetCollection], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(collections),
        OutputFormat::Text => {
            let mut out = String::new();
            for (index, collection) in collections.iter().enumerate() {
                if index > 0 {
                    let _ = writeln!(out);
                }
                let _ = writeln!(
                    out,
                    "# {} ({} elements)",
                    collection.target,
                    collection.elements.len()
                );
                for summary in &collection.elements {
                    summary_line(&mut out, summary);
                }
            }
            Ok(out)
        }
    }
}
