//! Experiment configuration and parameter sweep enumeration
//!
//! An [`ExperimentConfig`] describes one invocation of the external
//! experiment binary: the key-set sizing shared by all structures plus a
//! structure-specific tuning knob. Serializing a config yields the flat
//! wire object that the collector merges into each raw result, with the
//! structure kind carried in the `name` discriminant (`mphf`,
//! `bloom-filter`, `fingerprint`).
//!
//! [`SweepBounds`] enumerates the Cartesian product of a benchmark
//! campaign into an ordered sequence of configs.

use serde::{Deserialize, Serialize};

/// Structure-specific part of an experiment configuration.
///
/// Internally tagged by `name` so the serialized form matches the wire
/// subcommand names of the experiment binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum Structure {
    /// Minimal perfect hash function (no tuning knob)
    Mphf,
    /// Bloom filter with a target false-positive probability
    BloomFilter {
        /// Target false-positive probability, in (0, 1)
        fpp: f64,
    },
    /// Fingerprint array with a per-key fingerprint width
    Fingerprint {
        /// Fingerprint width in bits
        width: u32,
    },
}

impl Structure {
    /// Wire name of this structure kind (`mphf`, `bloom-filter`,
    /// `fingerprint`), doubling as the experiment binary's subcommand and
    /// the results-document grouping key.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mphf => "mphf",
            Self::BloomFilter { .. } => "bloom-filter",
            Self::Fingerprint { .. } => "fingerprint",
        }
    }
}

/// One fully specified experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Total number of keys generated for the run
    pub total_keys: u64,
    /// Number of keys inserted into the structure (`<= total_keys`)
    pub positive_keys: u64,
    /// Length of each generated key
    pub kmer_size: u32,
    /// Structure kind and tuning knob
    #[serde(flatten)]
    pub structure: Structure,
}

impl ExperimentConfig {
    /// Wire name of the configured structure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.structure.kind()
    }

    /// Render the argument list for the external experiment binary.
    ///
    /// The fpp target is formatted with fixed 12-decimal precision so
    /// small targets such as 2⁻¹⁰ survive the round trip through the
    /// command line untruncated.
    #[must_use]
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            "-t".to_string(),
            self.total_keys.to_string(),
            "-p".to_string(),
            self.positive_keys.to_string(),
            "-k".to_string(),
            self.kmer_size.to_string(),
            self.kind().to_string(),
        ];
        match &self.structure {
            Structure::Mphf => {}
            Structure::BloomFilter { fpp } => {
                args.push("--fpp".to_string());
                args.push(format!("{fpp:.12}"));
            }
            Structure::Fingerprint { width } => {
                args.push("--width".to_string());
                args.push(width.to_string());
            }
        }
        args
    }
}

/// Bounds of a benchmark campaign.
///
/// [`SweepBounds::enumerate`] expands these into the full ordered sweep.
/// Empty bound lists simply yield an empty sweep; no validation beyond
/// the `positive_keys <= total_keys` construction invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepBounds {
    /// Total-key-count values to sweep
    pub total_keys: Vec<u64>,
    /// Fractions of the key set that are inserted (positive) keys
    pub positive_ratios: Vec<f64>,
    /// Number of repetitions of the whole grid
    pub repetitions: usize,
    /// Key length shared by every run
    pub kmer_size: u32,
    /// Bloom filter fpp targets
    pub fpp_targets: Vec<f64>,
    /// Fingerprint widths in bits
    pub widths: Vec<u32>,
}

impl Default for SweepBounds {
    /// The original benchmark campaign: three key-set sizes, positive
    /// ratios 0.1 through 0.9, five repetitions, dyadic fpp targets.
    fn default() -> Self {
        Self {
            total_keys: vec![10_000, 50_000, 100_000],
            positive_ratios: (1..10).map(|x| f64::from(x) / 10.0).collect(),
            repetitions: 5,
            kmer_size: 30,
            fpp_targets: vec![
                1.0 / f64::from(1 << 7),
                1.0 / f64::from(1 << 8),
                1.0 / f64::from(1 << 10),
            ],
            widths: vec![7, 8, 10],
        }
    }
}

impl SweepBounds {
    /// Enumerate the sweep in deterministic execution order.
    ///
    /// For every repetition × total-key-count × positive-ratio cell the
    /// sweep contains one MPHF config, one Bloom filter config per fpp
    /// target, and one fingerprint config per width.
    /// `positive_keys = floor(total_keys * ratio)`.
    #[must_use]
    pub fn enumerate(&self) -> Vec<ExperimentConfig> {
        let mut sweep = Vec::with_capacity(self.len());
        for _ in 0..self.repetitions {
            for &total_keys in &self.total_keys {
                for &ratio in &self.positive_ratios {
                    // floor() of a non-negative product; casts are lossless
                    // for the sweep's value range.
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    #[allow(clippy::cast_precision_loss)]
                    let positive_keys = (total_keys as f64 * ratio).floor() as u64;
                    sweep.push(self.config(total_keys, positive_keys, Structure::Mphf));
                    for &fpp in &self.fpp_targets {
                        sweep.push(self.config(
                            total_keys,
                            positive_keys,
                            Structure::BloomFilter { fpp },
                        ));
                    }
                    for &width in &self.widths {
                        sweep.push(self.config(
                            total_keys,
                            positive_keys,
                            Structure::Fingerprint { width },
                        ));
                    }
                }
            }
        }
        sweep
    }

    /// Number of configs [`Self::enumerate`] will produce.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repetitions
            * self.total_keys.len()
            * self.positive_ratios.len()
            * (1 + self.fpp_targets.len() + self.widths.len())
    }

    /// True when the sweep enumerates no configs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn config(&self, total_keys: u64, positive_keys: u64, structure: Structure) -> ExperimentConfig {
        ExperimentConfig {
            total_keys,
            positive_keys,
            kmer_size: self.kmer_size,
            structure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bounds() -> SweepBounds {
        SweepBounds {
            total_keys: vec![10_000, 50_000],
            positive_ratios: vec![0.1, 0.5],
            repetitions: 2,
            kmer_size: 30,
            fpp_targets: vec![0.0078125, 0.0009765625],
            widths: vec![8],
        }
    }

    #[test]
    fn test_sweep_size() {
        let bounds = small_bounds();
        let sweep = bounds.enumerate();
        // 2 reps * 2 totals * 2 ratios * (1 mphf + 2 bloom + 1 fingerprint)
        assert_eq!(sweep.len(), 2 * 2 * 2 * 4);
        assert_eq!(sweep.len(), bounds.len());
        assert!(!bounds.is_empty());
    }

    #[test]
    fn test_positive_keys_floor() {
        let bounds = SweepBounds {
            total_keys: vec![10_001],
            positive_ratios: vec![0.3],
            repetitions: 1,
            fpp_targets: vec![],
            widths: vec![],
            ..small_bounds()
        };
        let sweep = bounds.enumerate();
        assert_eq!(sweep.len(), 1);
        assert_eq!(sweep[0].positive_keys, 3000); // floor(10001 * 0.3)
        assert!(sweep[0].positive_keys <= sweep[0].total_keys);
    }

    #[test]
    fn test_empty_bounds_yield_empty_sweep() {
        let bounds = SweepBounds {
            total_keys: vec![],
            ..small_bounds()
        };
        assert!(bounds.is_empty());
        assert!(bounds.enumerate().is_empty());
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let bounds = small_bounds();
        assert_eq!(bounds.enumerate(), bounds.enumerate());
        // mphf always leads each cell
        assert_eq!(bounds.enumerate()[0].kind(), "mphf");
    }

    #[test]
    fn test_wire_tags() {
        let cfg = ExperimentConfig {
            total_keys: 100,
            positive_keys: 50,
            kmer_size: 30,
            structure: Structure::BloomFilter { fpp: 0.01 },
        };
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["name"], "bloom-filter");
        assert_eq!(value["total_keys"], 100);
        assert_eq!(value["fpp"], 0.01);

        let back: ExperimentConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_command_args_mphf() {
        let cfg = ExperimentConfig {
            total_keys: 10_000,
            positive_keys: 1000,
            kmer_size: 30,
            structure: Structure::Mphf,
        };
        assert_eq!(
            cfg.command_args(),
            vec!["-t", "10000", "-p", "1000", "-k", "30", "mphf"]
        );
    }

    #[test]
    fn test_command_args_fpp_precision() {
        let cfg = ExperimentConfig {
            total_keys: 10_000,
            positive_keys: 1000,
            kmer_size: 30,
            structure: Structure::BloomFilter {
                fpp: 1.0 / 1024.0,
            },
        };
        let args = cfg.command_args();
        assert_eq!(args[7], "--fpp");
        // 2^-10 rendered without truncation
        assert_eq!(args[8], "0.000976562500");
    }

    #[test]
    fn test_command_args_fingerprint() {
        let cfg = ExperimentConfig {
            total_keys: 10_000,
            positive_keys: 1000,
            kmer_size: 30,
            structure: Structure::Fingerprint { width: 8 },
        };
        let args = cfg.command_args();
        assert_eq!(args[6], "fingerprint");
        assert_eq!(&args[7..], ["--width", "8"]);
    }

    #[test]
    fn test_default_campaign_shape() {
        let bounds = SweepBounds::default();
        assert_eq!(bounds.total_keys.len(), 3);
        assert_eq!(bounds.positive_ratios.len(), 9);
        assert_eq!(bounds.repetitions, 5);
        // 5 * 3 * 9 * (1 + 3 + 3)
        assert_eq!(bounds.len(), 945);
    }
}
