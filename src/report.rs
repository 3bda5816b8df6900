//! Per-family chart generation
//!
//! Groups enriched records into total-key-count strata, pivots them on
//! the family's independent variable, and writes one chart file per
//! (structure kind, stratum, metric). Filenames are deterministic from
//! those three values; the output directory is created if absent.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::chart;
use crate::error::Result;
use crate::metrics::{enrich, EnrichedRecord, Metric};
use crate::pivot::{DyadicFraction, PivotSummary};
use crate::results::ResultsTable;

/// Render every chart family from a loaded results table.
///
/// # Errors
///
/// IO failure creating the output directory or a chart rendering
/// failure.
pub fn render_all(table: &ResultsTable, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;
    render_bloom_filter(&enrich(&table.bloom_filter), out_dir)?;
    render_mphf(&enrich(&table.mphf), out_dir)?;
    render_fingerprint(&enrich(&table.fingerprint), out_dir)?;
    Ok(())
}

/// Bloom filter family: per total-key stratum, pivot (fpp target as
/// exact fraction) x (positive keys) for each metric.
///
/// # Errors
///
/// Chart rendering failure.
pub fn render_bloom_filter(records: &[EnrichedRecord], out_dir: &Path) -> Result<()> {
    for (stratum, group) in strata(records) {
        let title = format!("Bloom Filter With {stratum} Total Keys");
        for metric in Metric::ALL {
            let pivot = PivotSummary::build(&group, metric, |r| {
                DyadicFraction::from_f64(r.record.fpp.unwrap_or(0.0))
            });
            let slug = match metric {
                Metric::ObservedFpp => "expected-vs-observed-fpp",
                Metric::AvgQueryNanoseconds => "avg-query-duration",
                Metric::SerializedSize => "size",
                Metric::BitsPerKey => "bits-per-key",
            };
            let path = chart_path(out_dir, "bloom-filter", stratum, slug);
            chart::render(
                &pivot,
                &path,
                &title,
                "Target False Positive Rate",
                metric.axis_label(),
            )?;
            info!(path = %path.display(), "wrote bloom filter chart");
        }
    }
    Ok(())
}

/// MPHF family: collapse repetitions by mean over (total, positive)
/// keys, then one single-series bar chart per stratum and metric.
///
/// # Errors
///
/// Chart rendering failure.
pub fn render_mphf(records: &[EnrichedRecord], out_dir: &Path) -> Result<()> {
    for (stratum, group) in strata(records) {
        let title = format!("MPHF With {stratum} Total Keys");
        for metric in Metric::ALL {
            let summary =
                PivotSummary::build_single(&group, metric, |r| r.record.positive_keys);
            let slug = match metric {
                Metric::ObservedFpp => "observed-false-positive-rate",
                Metric::AvgQueryNanoseconds => "query-duration",
                Metric::SerializedSize => "size",
                Metric::BitsPerKey => "bits-per-key",
            };
            let path = chart_path(out_dir, "mphf", stratum, slug);
            chart::render(&summary, &path, &title, "Positive Keys", metric.axis_label())?;
            info!(path = %path.display(), "wrote mphf chart");
        }
    }
    Ok(())
}

/// Fingerprint family: per stratum, pivot (width) x (positive keys).
///
/// # Errors
///
/// Chart rendering failure.
pub fn render_fingerprint(records: &[EnrichedRecord], out_dir: &Path) -> Result<()> {
    for (stratum, group) in strata(records) {
        let title = format!("Fingerprint Array With {stratum} Total Keys");
        for metric in Metric::ALL {
            let pivot =
                PivotSummary::build(&group, metric, |r| r.record.width.unwrap_or(0));
            let slug = match metric {
                Metric::ObservedFpp => "width-vs-observed-fpp",
                Metric::AvgQueryNanoseconds => "avg-query-duration",
                Metric::SerializedSize => "size",
                Metric::BitsPerKey => "bits-per-key",
            };
            let path = chart_path(out_dir, "fingerprint-array", stratum, slug);
            chart::render(
                &pivot,
                &path,
                &title,
                "Fingerprint Width (bits)",
                metric.axis_label(),
            )?;
            info!(path = %path.display(), "wrote fingerprint chart");
        }
    }
    Ok(())
}

/// Split records into total-key-count strata, ascending.
fn strata(records: &[EnrichedRecord]) -> Vec<(u64, Vec<EnrichedRecord>)> {
    let totals: BTreeSet<u64> = records.iter().map(|r| r.record.total_keys).collect();
    totals
        .into_iter()
        .map(|total| {
            let group = records
                .iter()
                .filter(|r| r.record.total_keys == total)
                .cloned()
                .collect();
            (total, group)
        })
        .collect()
}

fn chart_path(out_dir: &Path, kind: &str, stratum: u64, slug: &str) -> PathBuf {
    out_dir.join(format!("{kind}-{stratum}-{slug}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::EnrichedRecord;
    use crate::results::ResultRecord;

    fn record(total_keys: u64, positive_keys: u64) -> EnrichedRecord {
        EnrichedRecord::from_record(ResultRecord {
            name: "mphf".to_string(),
            kmer_size: 30,
            total_keys,
            positive_keys,
            negative_keys: total_keys - positive_keys,
            serialized_size: 512,
            false_positive_count: 0,
            false_negative_count: 0,
            positives_query_duration: 1_000_000,
            negatives_query_duration: 1_000_000,
            fpp: None,
            width: None,
        })
    }

    #[test]
    fn test_strata_split_ascending() {
        let records = vec![record(50_000, 100), record(10_000, 100), record(50_000, 200)];
        let strata = strata(&records);
        assert_eq!(strata.len(), 2);
        assert_eq!(strata[0].0, 10_000);
        assert_eq!(strata[0].1.len(), 1);
        assert_eq!(strata[1].0, 50_000);
        assert_eq!(strata[1].1.len(), 2);
    }

    #[test]
    fn test_chart_path_deterministic() {
        let path = chart_path(Path::new("out"), "bloom-filter", 10_000, "size");
        assert_eq!(path, Path::new("out/bloom-filter-10000-size.png"));
    }

    #[test]
    fn test_mphf_family_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(10_000, 1000), record(10_000, 2000)];
        render_mphf(&records, dir.path()).unwrap();
        for slug in [
            "observed-false-positive-rate",
            "query-duration",
            "size",
            "bits-per-key",
        ] {
            assert!(dir.path().join(format!("mphf-10000-{slug}.png")).exists());
        }
    }

    #[test]
    fn test_out_dir_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let table = ResultsTable::default();
        render_all(&table, dir.path()).unwrap();
        // second call with the directory already present
        render_all(&table, dir.path()).unwrap();
    }
}
