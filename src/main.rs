//! amq-bench binary entry point

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use amq_bench::cli::{Cli, Command, PlotArgs, RunArgs};
use amq_bench::report;
use amq_bench::results::ResultsTable;
use amq_bench::runner::{self, Runner};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(&args),
        Command::Plot(args) => plot(&args),
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    if !args.binary.exists() {
        bail!(
            "experiment binary not found at {}; build it first (cargo build --release)",
            args.binary.display()
        );
    }
    let sweep = args.bounds().enumerate();
    info!(runs = sweep.len(), binary = %args.binary.display(), "starting sweep");
    let runner = Runner::new(&args.binary);
    let document = runner.collect(&sweep).context("sweep aborted")?;
    runner::write_document(&document, &args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    Ok(())
}

fn plot(args: &PlotArgs) -> anyhow::Result<()> {
    let table = ResultsTable::load(&args.results)
        .with_context(|| format!("loading {}", args.results.display()))?;
    info!(records = table.len(), "rendering charts");
    report::render_all(&table, &args.out_dir).context("rendering charts")?;
    Ok(())
}
