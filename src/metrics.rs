//! Derived per-record metrics
//!
//! Every metric here is a pure function of one [`ResultRecord`]; no
//! cross-record state. Zero denominators do not error: float metrics
//! become NaN and duration metrics become `None`, and the pivot stage
//! excludes those sentinels from its means instead of poisoning whole
//! aggregates.

use std::time::Duration;

use crate::results::ResultRecord;

/// A [`ResultRecord`] augmented with its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// The underlying normalized record
    pub record: ResultRecord,
    /// `false_positive_count / negative_keys`; NaN when no negatives
    pub observed_fpp: f64,
    /// `positive_keys / total_keys`; NaN when the run had no keys
    pub ratio: f64,
    /// Mean positive-set query latency; `None` when no positives
    pub avg_positive_query_duration: Option<Duration>,
    /// Mean negative-set query latency; `None` when no negatives
    pub avg_negative_query_duration: Option<Duration>,
    /// Mean query latency over both sets, in plain nanoseconds
    pub avg_query_nanoseconds: f64,
    /// `serialized_size * 8 / positive_keys`; NaN when no positives
    pub bits_per_key: f64,
}

impl EnrichedRecord {
    /// Compute every derived metric for one record.
    #[must_use]
    pub fn from_record(record: ResultRecord) -> Self {
        let observed_fpp = div(record.false_positive_count, record.negative_keys);
        let ratio = div(record.positive_keys, record.total_keys);
        let avg_positive_query_duration =
            avg_duration(record.positives_query_duration, record.positive_keys);
        let avg_negative_query_duration =
            avg_duration(record.negatives_query_duration, record.negative_keys);
        let avg_query_nanoseconds = div(
            record.positives_query_duration + record.negatives_query_duration,
            record.total_keys,
        );
        let bits_per_key = div(record.serialized_size * 8, record.positive_keys);
        Self {
            record,
            observed_fpp,
            ratio,
            avg_positive_query_duration,
            avg_negative_query_duration,
            avg_query_nanoseconds,
            bits_per_key,
        }
    }
}

/// Enrich a whole group of records.
#[must_use]
pub fn enrich(records: &[ResultRecord]) -> Vec<EnrichedRecord> {
    records
        .iter()
        .cloned()
        .map(EnrichedRecord::from_record)
        .collect()
}

/// The four chart metrics shared by every structure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Observed false-positive rate
    ObservedFpp,
    /// Combined mean query latency in nanoseconds
    AvgQueryNanoseconds,
    /// Serialized structure size in bytes
    SerializedSize,
    /// Space efficiency in bits per stored key
    BitsPerKey,
}

impl Metric {
    /// All chart metrics, in rendering order.
    pub const ALL: [Self; 4] = [
        Self::ObservedFpp,
        Self::AvgQueryNanoseconds,
        Self::SerializedSize,
        Self::BitsPerKey,
    ];

    /// Extract this metric's value from an enriched record.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, record: &EnrichedRecord) -> f64 {
        match self {
            Self::ObservedFpp => record.observed_fpp,
            Self::AvgQueryNanoseconds => record.avg_query_nanoseconds,
            Self::SerializedSize => record.record.serialized_size as f64,
            Self::BitsPerKey => record.bits_per_key,
        }
    }

    /// Y-axis label for charts of this metric.
    #[must_use]
    pub const fn axis_label(self) -> &'static str {
        match self {
            Self::ObservedFpp => "Observed False Positive Rate",
            Self::AvgQueryNanoseconds => "Average Query Duration (ns)",
            Self::SerializedSize => "Datastructure Size (bytes)",
            Self::BitsPerKey => "Bits per key",
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn div(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn avg_duration(total_nanos: u64, queries: u64) -> Option<Duration> {
    if queries == 0 {
        None
    } else {
        Some(Duration::from_nanos(total_nanos).div_f64(queries as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ResultRecord {
        ResultRecord {
            name: "bloom_filter".to_string(),
            kmer_size: 30,
            total_keys: 10_000,
            positive_keys: 800,
            negative_keys: 9200,
            serialized_size: 1000,
            false_positive_count: 5,
            false_negative_count: 0,
            positives_query_duration: 800_000,
            negatives_query_duration: 9_200_000,
            fpp: Some(0.0078125),
            width: None,
        }
    }

    #[test]
    fn test_bits_per_key() {
        let mut r = record();
        r.positive_keys = 800;
        r.serialized_size = 1000;
        let enriched = EnrichedRecord::from_record(r);
        assert!((enriched.bits_per_key - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_observed_fpp() {
        let mut r = record();
        r.false_positive_count = 5;
        r.negative_keys = 10_000;
        let enriched = EnrichedRecord::from_record(r);
        assert!((enriched.observed_fpp - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_and_combined_latency() {
        let enriched = EnrichedRecord::from_record(record());
        assert!((enriched.ratio - 0.08).abs() < 1e-12);
        // (800_000 + 9_200_000) / 10_000
        assert!((enriched.avg_query_nanoseconds - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_per_class_latencies_stay_durations() {
        let enriched = EnrichedRecord::from_record(record());
        assert_eq!(
            enriched.avg_positive_query_duration,
            Some(Duration::from_nanos(1000))
        );
        assert_eq!(
            enriched.avg_negative_query_duration,
            Some(Duration::from_nanos(1000))
        );
    }

    #[test]
    fn test_zero_denominators_are_undefined_not_errors() {
        let mut r = record();
        r.negative_keys = 0;
        r.positive_keys = 0;
        let enriched = EnrichedRecord::from_record(r);
        assert!(enriched.observed_fpp.is_nan());
        assert!(enriched.bits_per_key.is_nan());
        assert!(enriched.avg_positive_query_duration.is_none());
        assert!(enriched.avg_negative_query_duration.is_none());
    }

    #[test]
    fn test_metric_selector() {
        let enriched = EnrichedRecord::from_record(record());
        assert!(
            (Metric::SerializedSize.value(&enriched) - 1000.0).abs() < f64::EPSILON
        );
        assert_eq!(Metric::ALL.len(), 4);
        assert_eq!(Metric::BitsPerKey.axis_label(), "Bits per key");
    }
}
