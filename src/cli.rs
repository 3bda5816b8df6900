//! Command-line interface
//!
//! Two decoupled halves: `run` executes a sweep and persists the raw
//! results document, `plot` reloads that document and renders charts.
//! Re-plotting never requires re-running experiments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SweepBounds;

/// Benchmark driver for approximate membership query structures
#[derive(Parser, Debug)]
#[command(name = "amq-bench", version, about)]
pub struct Cli {
    /// Selected subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the experiment sweep and persist the results document
    Run(RunArgs),
    /// Render charts from a persisted results document
    Plot(PlotArgs),
}

/// Sweep execution options
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path of the external experiment binary
    #[arg(long, default_value = "target/release/experiment")]
    pub binary: PathBuf,

    /// Output path for the results document
    #[arg(long, default_value = "results.json")]
    pub out: PathBuf,

    /// Total key counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [10_000u64, 50_000, 100_000])]
    pub total_keys: Vec<u64>,

    /// Positive-key fractions of the total key count
    #[arg(long, value_delimiter = ',',
          default_values_t = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9])]
    pub ratios: Vec<f64>,

    /// Repetitions of the whole parameter grid
    #[arg(long, default_value_t = 5)]
    pub runs: usize,

    /// Length of each generated key
    #[arg(long, default_value_t = 30)]
    pub kmer_size: u32,

    /// Bloom filter target false-positive probabilities
    #[arg(long, value_delimiter = ',',
          default_values_t = [0.0078125, 0.00390625, 0.0009765625])]
    pub fpp: Vec<f64>,

    /// Fingerprint widths in bits
    #[arg(long, value_delimiter = ',', default_values_t = [7u32, 8, 10])]
    pub widths: Vec<u32>,
}

impl RunArgs {
    /// Sweep bounds described by these arguments.
    #[must_use]
    pub fn bounds(&self) -> SweepBounds {
        SweepBounds {
            total_keys: self.total_keys.clone(),
            positive_ratios: self.ratios.clone(),
            repetitions: self.runs,
            kmer_size: self.kmer_size,
            fpp_targets: self.fpp.clone(),
            widths: self.widths.clone(),
        }
    }
}

/// Chart rendering options
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Path of the persisted results document
    #[arg(long, default_value = "results.json")]
    pub results: PathBuf,

    /// Directory charts are written into (created if absent)
    #[arg(long, default_value = "results")]
    pub out_dir: PathBuf,
}
