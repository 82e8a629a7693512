//! Command-line options for the ctxdiag subcommands.

use clap::{Args, Subcommand, ValueEnum};

use ctxdiag_collect::CollectOption;
use ctxdiag_core::KindSelection;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List elements that can serve as diagram targets
    Elements(ElementsOptions),
    /// Check that an element uuid exists in the model
    Validate {
        #[arg(value_name = "UUID")]
        uuid: String,
    },
    /// Show the stored attributes and links of an element
    Attributes {
        #[arg(value_name = "UUID")]
        uuid: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Collect the elements of a custom diagram for one or more targets
    Collect(CollectOptions),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ElementsOptions {
    /// Element type to list (repeatable); defaults to the common target types
    #[arg(long = "kind", value_name = "TYPE", action = clap::ArgAction::Append)]
    pub kinds: Vec<String>,

    /// List every element regardless of type
    #[arg(long, conflicts_with = "kinds")]
    pub all: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ElementsOptions {
    pub fn selection(&self) -> KindSelection {
        if self.all {
            KindSelection::All
        } else if self.kinds.is_empty() {
            KindSelection::default()
        } else {
            KindSelection::only(self.kinds.iter().cloned())
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CollectOptions {
    /// Start element uuid (repeatable); each target is collected independently
    #[arg(
        short = 't',
        long = "target",
        value_name = "UUID",
        num_args = 1..,
        required = true,
        action = clap::ArgAction::Append
    )]
    pub targets: Vec<String>,

    /// Diagram request document, or '-' to read it from stdin
    #[arg(short = 'r', long = "request", value_name = "FILE")]
    pub request: String,

    /// Stop after this many elements per target
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Allow the start element to be collected when a path leads back to it
    #[arg(long = "no-visit-target")]
    pub no_visit_target: bool,
}

impl CollectOptions {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_no_visit_target(mut self, no_visit_target: bool) -> Self {
        self.no_visit_target = no_visit_target;
        self
    }

    pub fn collect_option(&self) -> CollectOption {
        CollectOption::default().with_visit_target(!self.no_visit_target)
    }
}
