//! Sweep execution and results collection
//!
//! [`Runner`] drives the external experiment binary: one sequential
//! subprocess per [`ExperimentConfig`], never overlapping, because the
//! measurements are timing-sensitive and parallel runs would contend for
//! CPU cache and scheduler state. Each run's JSON output is merged with
//! the config's own fields into one flat record, and records accumulate
//! into an ordered document grouped by structure kind.
//!
//! A single failing run aborts the whole sweep; the document is written
//! only after every run succeeded, so a partial sweep is never persisted.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::error::{Error, Result};

/// The results document under construction: structure-kind name (wire
/// style, e.g. `bloom-filter`) mapped to records in execution order.
pub type ResultsDocument = Map<String, Value>;

/// Executes experiment configs against the external binary.
#[derive(Debug, Clone)]
pub struct Runner {
    binary: PathBuf,
}

impl Runner {
    /// Create a runner invoking the binary at `binary`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the external experiment binary.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Execute one config and return the merged flat record.
    ///
    /// The record is the external program's JSON output overlaid with the
    /// config's own serialized fields; config fields win on key collision
    /// (in practice the key sets are disjoint).
    ///
    /// # Errors
    ///
    /// [`Error::ExperimentFailed`] on a non-zero exit status and
    /// [`Error::ExperimentOutput`] when stdout is not one JSON object.
    pub fn execute(&self, config: &ExperimentConfig) -> Result<Value> {
        let args = config.command_args();
        debug!(binary = %self.binary.display(), ?args, "spawning experiment");
        let output = Command::new(&self.binary).args(&args).output()?;
        if !output.status.success() {
            return Err(Error::ExperimentFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let mut record: Map<String, Value> =
            serde_json::from_slice(&output.stdout).map_err(Error::ExperimentOutput)?;
        let Value::Object(config_fields) = serde_json::to_value(config)? else {
            unreachable!("ExperimentConfig serializes to an object");
        };
        for (key, value) in config_fields {
            record.insert(key, value);
        }
        Ok(Value::Object(record))
    }

    /// Run every config in order, grouping records by structure kind.
    ///
    /// Progress is logged after each completed run. The first failure
    /// aborts the collection with the run index attached; nothing is
    /// persisted by this function.
    ///
    /// # Errors
    ///
    /// The first failed run, wrapped in [`Error::Run`].
    pub fn collect(&self, sweep: &[ExperimentConfig]) -> Result<ResultsDocument> {
        let total = sweep.len();
        let mut document = ResultsDocument::new();
        for (idx, config) in sweep.iter().enumerate() {
            let record = self.execute(config).map_err(|source| Error::Run {
                index: idx + 1,
                total,
                source: Box::new(source),
            })?;
            let group = document
                .entry(config.kind().to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(records) = group {
                records.push(record);
            }
            info!(completed = idx + 1, total, kind = config.kind(), "completed experiment");
        }
        Ok(document)
    }
}

/// Persist a completed results document as pretty-printed JSON.
///
/// Called only with a fully collected document; nested numeric and
/// duration fields are written exactly as the external program encoded
/// them (normalization happens on read).
///
/// # Errors
///
/// IO or serialization failure.
pub fn write_document(document: &ResultsDocument, path: &Path) -> Result<()> {
    let rendered = serde_json::to_string_pretty(document)?;
    std::fs::write(path, rendered)?;
    info!(path = %path.display(), "wrote results document");
    Ok(())
}
