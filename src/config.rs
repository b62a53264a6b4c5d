use std::fmt;

use bon::Builder;
use clap::ValueEnum;

use crate::{
    error::{EnrichmentError, Result},
    math::{arithmetic_mean, max_deviation},
};

/// Reduction of an enrichment curve to a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScoreMode {
    /// Mean of the curve
    #[default]
    Auc,
    /// Signed entry of largest absolute value (the classic enrichment score)
    Max,
}
impl ScoreMode {
    /// Reduces a curve to its score. Returns `NaN` on an empty curve.
    pub fn reduce(&self, curve: &[f64]) -> f64 {
        match self {
            ScoreMode::Auc => arithmetic_mean(curve),
            ScoreMode::Max => max_deviation(curve),
        }
    }

    /// Reduces an increment array as if it had first been summed into a curve
    ///
    /// Equivalent to `self.reduce(&cumsum(increments))` without allocating the curve.
    pub fn reduce_increments(&self, increments: &[f64]) -> f64 {
        if increments.is_empty() {
            return f64::NAN;
        }
        let mut running = 0.0;
        match self {
            ScoreMode::Auc => {
                let mut area = 0.0;
                for x in increments {
                    running += x;
                    area += running;
                }
                area / increments.len() as f64
            }
            ScoreMode::Max => {
                let mut extreme = 0.0_f64;
                for (i, x) in increments.iter().enumerate() {
                    running += x;
                    if i == 0 || running.abs() > extreme.abs() {
                        extreme = running;
                    }
                }
                extreme
            }
        }
    }
}
impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMode::Auc => write!(f, "auc"),
            ScoreMode::Max => write!(f, "max"),
        }
    }
}

/// Row order of the conditional interaction report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportOrder {
    /// Conditioning iteration order (position, then acid)
    Insertion,
    /// Largest delta first, undefined deltas last
    #[default]
    #[value(name = "delta")]
    DeltaDescending,
}

/// Parameters of a permutation-tested enrichment scan
#[derive(Debug, Clone, Builder)]
pub struct EnrichmentConfig {
    /// Number of null permutations per (position, acid); 0 disables testing
    #[builder(default = 10)]
    pub n_perm: usize,
    #[builder(default)]
    pub mode: ScoreMode,
    /// False discovery rate for the Benjamini-Hochberg mask
    #[builder(default = 0.1)]
    pub alpha: f64,
    /// Keep every enrichment curve in the results
    #[builder(default)]
    pub store_curves: bool,
    #[builder(default)]
    pub seed: u64,
}
impl EnrichmentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(EnrichmentError::InvalidConfig {
                reason: format!("alpha must lie in (0, 1), got {}", self.alpha),
            });
        }
        Ok(())
    }

    /// File prefix shared by all scan outputs, e.g. `10perm_auc`
    pub fn prefix(&self) -> String {
        format!("{}perm_{}", self.n_perm, self.mode)
    }
}
impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parameters of the pairwise conditional scan
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ConditionalConfig {
    #[builder(default)]
    pub mode: ScoreMode,
    #[builder(default)]
    pub order: ReportOrder,
}
