mod branch;
mod error;
mod registry;
mod sales;
mod scanner;
mod summary;

use clap::Parser;
use registry::BranchRegistry;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::info;

/// Totals the sales files in a directory per branch and writes `branch.out`.
#[derive(Parser)]
#[command(name = "calculate-sales", version, about)]
struct Cli {
    /// Directory holding branch.lst and the NNNNNNNN.rcd sales files
    directory: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    match run(&cli.directory) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(dir: &Path) -> error::Result<()> {
    let registry = BranchRegistry::load(dir)?;
    let files = scanner::scan(dir)?;
    if files.is_empty() {
        info!("no sales files, every branch totals 0");
    }
    let totals = sales::aggregate(&registry, &files)?;
    summary::write(dir, &registry, &totals)?;

    info!(sales_files = files.len(), "summary complete");
    Ok(())
}
