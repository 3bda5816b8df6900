//! # amq-bench: membership-query benchmark pipeline
//!
//! Benchmarks three membership-query data structures — a minimal
//! perfect hash function, a Bloom filter, and a fingerprint array — by
//! driving an external experiment binary across a parameter sweep and
//! turning its raw JSON output into comparison charts.
//!
//! The pipeline has two decoupled halves, joined by the persisted
//! results document:
//!
//! 1. **run**: [`config::SweepBounds`] enumerates the sweep,
//!    [`runner::Runner`] executes each config sequentially and collects
//!    the grouped raw document.
//! 2. **plot**: [`results::ResultsTable`] reloads and normalizes the
//!    document ([`normalize`]), [`metrics`] derives per-record rates and
//!    latencies, and [`report`] pivots and renders one chart per
//!    (structure kind, total-key stratum, metric).
//!
//! ## Example
//!
//! ```rust,no_run
//! use amq_bench::results::ResultsTable;
//! use amq_bench::report;
//! use std::path::Path;
//!
//! let table = ResultsTable::load(Path::new("results.json"))?;
//! report::render_all(&table, Path::new("results"))?;
//! # Ok::<(), amq_bench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod pivot;
pub mod report;
pub mod results;
pub mod runner;

pub use error::{Error, Result};
