//! Loading and validating the persisted results document
//!
//! The plot half of the pipeline starts here: read the document the
//! collector wrote, run it through [`crate::normalize`], and deserialize
//! the three structure-kind groups into typed [`ResultRecord`]s. Any
//! missing group or missing record field is a malformed-document error
//! carrying enough context (group name, record index) to locate the
//! offending entry.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::normalize::normalize;

/// Canonical top-level group keys, in document order.
pub const GROUP_KEYS: [&str; 3] = ["mphf", "fingerprint", "bloom_filter"];

/// One normalized experiment record: config fields merged with the
/// external program's measurements. Duration fields are integer
/// nanosecond counts after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Structure kind discriminant (canonicalized, e.g. `bloom_filter`)
    pub name: String,
    /// Length of each generated key
    pub kmer_size: u32,
    /// Total number of keys in the run
    pub total_keys: u64,
    /// Keys stored in the structure
    pub positive_keys: u64,
    /// Keys queried but never stored
    pub negative_keys: u64,
    /// Serialized structure size in bytes
    pub serialized_size: u64,
    /// Negative keys the structure claimed to contain
    pub false_positive_count: u64,
    /// Positive keys the structure failed to find
    pub false_negative_count: u64,
    /// Total time querying the positive key set, in nanoseconds
    pub positives_query_duration: u64,
    /// Total time querying the negative key set, in nanoseconds
    pub negatives_query_duration: u64,
    /// Bloom filter target false-positive probability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpp: Option<f64>,
    /// Fingerprint width in bits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// The full normalized result table, one group per structure kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    /// MPHF runs in execution order
    pub mphf: Vec<ResultRecord>,
    /// Fingerprint array runs in execution order
    pub fingerprint: Vec<ResultRecord>,
    /// Bloom filter runs in execution order
    pub bloom_filter: Vec<ResultRecord>,
}

impl ResultsTable {
    /// Load, normalize, and validate a persisted results document.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDocument`] when the document is not an object,
    /// a group key is missing or not an array, or a record is missing a
    /// required field; IO/JSON errors from reading the file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let table = Self::from_value(normalize(raw))?;
        debug!(
            mphf = table.mphf.len(),
            fingerprint = table.fingerprint.len(),
            bloom_filter = table.bloom_filter.len(),
            "loaded results document"
        );
        Ok(table)
    }

    /// Build a table from an already-normalized document value.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDocument`] as for [`Self::load`].
    pub fn from_value(document: Value) -> Result<Self> {
        let Value::Object(mut document) = document else {
            return Err(Error::MalformedDocument(
                "top level is not an object".to_string(),
            ));
        };
        let mut take = |key: &str| -> Result<Vec<ResultRecord>> {
            let value = document
                .remove(key)
                .ok_or_else(|| Error::MalformedDocument(format!("missing group `{key}`")))?;
            parse_group(key, value)
        };
        let mphf = take(GROUP_KEYS[0])?;
        let fingerprint = take(GROUP_KEYS[1])?;
        let bloom_filter = take(GROUP_KEYS[2])?;
        Ok(Self {
            mphf,
            fingerprint,
            bloom_filter,
        })
    }

    /// Total record count across the three groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mphf.len() + self.fingerprint.len() + self.bloom_filter.len()
    }

    /// True when no group holds any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_group(key: &str, value: Value) -> Result<Vec<ResultRecord>> {
    let Value::Array(items) = value else {
        return Err(Error::MalformedDocument(format!(
            "group `{key}` is not an array"
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item).map_err(|e| {
                Error::MalformedDocument(format!("record `{key}[{idx}]`: {e}"))
            })
        })
        .collect()
}
