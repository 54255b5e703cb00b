pub mod cli;
pub mod convert;
pub mod decoder;
pub mod error;
pub mod model;
pub mod naming;
pub mod writer;

pub use error::{Error, Result};

use anyhow::Context;
use clap::Parser;

pub fn run() -> anyhow::Result<()> {
    init_logging();
    let args = cli::Cli::parse();

    // Stdout carries the generated .cc list for the build system, one per line.
    convert::convert(&args.output, &args.inputs, &args.genfiles_marker, |cc| {
        println!("{}", cc.display())
    })
    .with_context(|| format!("Generating arrays into {}", args.output.display()))?;

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
