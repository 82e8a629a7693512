use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use ctxdiag_cli::{Command, CtxdiagOptions, run_main};
use ctxdiag_core::Result;

#[derive(Parser, Debug)]
#[command(
    name = "ctxdiag",
    about = "ctxdiag: collect the elements of custom context diagrams",
    version
)]
pub struct Cli {
    /// Model document (YAML or JSON)
    #[arg(short = 'm', long = "model", value_name = "FILE", env = "CTXDIAG_MODEL")]
    model: PathBuf,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    let opts = CtxdiagOptions {
        model: args.model,
        command: args.command,
    };
    let output = run_main(&opts)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!(path = %path.display(), "output written");
    } else if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }

    tracing::info!(total_secs = total_start.elapsed().as_secs_f64(), "complete");
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, kind = e.kind().as_str(), "execution failed");
            if e.kind().is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
