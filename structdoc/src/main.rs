use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Args;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let Some(query) = args.query() else {
        tracing::debug!("module name, package path or type name missing, nothing to do");
        return Ok(());
    };

    let types = structdoc::describe(&query).with_context(|| {
        format!(
            "Failed to describe `{}` in package `{}`",
            query.name, query.package
        )
    })?;

    let mut stdout = io::stdout().lock();
    structdoc::render(&types, args.format, &mut stdout).context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;

    Ok(())
}
