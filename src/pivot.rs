//! Mean-aggregated pivot summaries
//!
//! A [`PivotSummary`] is the direct chart input: one independent
//! variable as rows, positive-key count as columns, and the mean of one
//! derived metric in each cell. Cells aggregate over sweep repetitions;
//! NaN metric values (undefined denominators) are excluded from the
//! mean, and a cell with no finite values stays NaN and is skipped when
//! drawing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::metrics::{EnrichedRecord, Metric};

/// Exact binary fraction of an `f64`, used as the row key for Bloom
/// filter fpp targets so that `1/128` sorts and labels exactly instead
/// of as a decimal approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DyadicFraction {
    numerator: u64,
    denominator: u64,
}

impl DyadicFraction {
    /// Decode a non-negative finite float into its exact fraction.
    ///
    /// Doubles until the fractional part clears; the sweep's dyadic
    /// targets (2⁻⁷, 2⁻⁸, 2⁻¹⁰, ...) terminate within a few steps.
    /// Values that have not cleared after 63 doublings are rounded at
    /// that denominator.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Self {
        let mut scaled = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
        let mut denominator = 1u64;
        for _ in 0..63 {
            if scaled.fract() == 0.0 {
                break;
            }
            scaled *= 2.0;
            denominator *= 2;
        }
        Self {
            numerator: scaled.round() as u64,
            denominator,
        }
    }

    /// Numerator of the reduced-by-construction fraction.
    #[must_use]
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Denominator (a power of two).
    #[must_use]
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl fmt::Display for DyadicFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl PartialOrd for DyadicFraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DyadicFraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // cross-multiplication in u128 cannot overflow
        let left = u128::from(self.numerator) * u128::from(other.denominator);
        let right = u128::from(other.numerator) * u128::from(self.denominator);
        left.cmp(&right)
    }
}

/// A two-dimensional mean-aggregated table, chart-ready.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSummary {
    /// Row labels (independent variable), in ascending key order
    pub row_labels: Vec<String>,
    /// Column labels (positive-key counts), ascending
    pub col_labels: Vec<String>,
    /// `rows x cols` of mean values; NaN marks an empty cell
    pub cells: Vec<Vec<f64>>,
}

impl PivotSummary {
    /// Build a pivot of `metric` over `records`, with rows keyed by
    /// `row_key` and columns by positive-key count.
    ///
    /// Cell means cover only finite metric values; repetitions landing
    /// in the same (row, column) cell average together.
    pub fn build<K, F>(records: &[EnrichedRecord], metric: Metric, row_key: F) -> Self
    where
        K: Ord + fmt::Display,
        F: Fn(&EnrichedRecord) -> K,
    {
        let mut cells: BTreeMap<K, BTreeMap<u64, MeanCell>> = BTreeMap::new();
        let mut columns: BTreeSet<u64> = BTreeSet::new();
        for record in records {
            columns.insert(record.record.positive_keys);
            cells
                .entry(row_key(record))
                .or_default()
                .entry(record.record.positive_keys)
                .or_default()
                .push(metric.value(record));
        }
        let col_keys: Vec<u64> = columns.into_iter().collect();
        let row_labels = cells.keys().map(ToString::to_string).collect();
        let col_labels = col_keys.iter().map(ToString::to_string).collect();
        let cell_matrix = cells
            .values()
            .map(|row| {
                col_keys
                    .iter()
                    .map(|col| row.get(col).map_or(f64::NAN, MeanCell::mean))
                    .collect()
            })
            .collect();
        Self {
            row_labels,
            col_labels,
            cells: cell_matrix,
        }
    }

    /// Collapse to a single-column summary (used by the MPHF family,
    /// which has no secondary pivot axis): rows keyed by `row_key`, one
    /// mean per row.
    pub fn build_single<K, F>(records: &[EnrichedRecord], metric: Metric, row_key: F) -> Self
    where
        K: Ord + fmt::Display,
        F: Fn(&EnrichedRecord) -> K,
    {
        let mut rows: BTreeMap<K, MeanCell> = BTreeMap::new();
        for record in records {
            rows.entry(row_key(record))
                .or_default()
                .push(metric.value(record));
        }
        let row_labels = rows.keys().map(ToString::to_string).collect();
        let cells = rows.values().map(|cell| vec![cell.mean()]).collect();
        Self {
            row_labels,
            col_labels: vec![String::new()],
            cells,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.col_labels.len()
    }

    /// True when the summary renders a single series (no legend).
    #[must_use]
    pub fn is_single_series(&self) -> bool {
        self.col_count() == 1
    }

    /// Largest finite cell value, if any cell is finite.
    #[must_use]
    pub fn max_cell(&self) -> Option<f64> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

/// Running mean over the finite values pushed into one pivot cell.
#[derive(Debug, Clone, Copy, Default)]
struct MeanCell {
    sum: f64,
    count: u64,
}

impl MeanCell {
    fn push(&mut self, value: f64) {
        if value.is_finite() {
            self.sum += value;
            self.count += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}
