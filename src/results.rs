use std::cmp::Ordering;

use derive_new::new;
use ndarray::Array2;
use serde::{Serialize, Serializer};

use crate::{
    cell::CellResult,
    config::ReportOrder,
    fdr::{adjusted_pvalues, fdr_mask},
    table::Position,
};

/// Observed score and null distribution of one (position, acid) test
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationRecord {
    pub acid: u8,
    pub position: Position,
    pub observed: f64,
    pub null: Vec<f64>,
}

/// Full enrichment curve of one (position, acid) test
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRecord {
    pub acid: u8,
    pub position: Position,
    pub curve: Vec<f64>,
}

/// Metric matrices of an enrichment scan, shaped (positions x acids)
#[derive(Debug, Clone)]
pub struct ScanResults {
    pub positions: Vec<Position>,
    pub acids: Vec<u8>,
    pub score: Array2<f64>,
    pub zscore: Array2<f64>,
    pub pval_raw: Array2<f64>,
    pub counts: Array2<usize>,
    /// Benjamini-Hochberg significance at the configured alpha
    pub pval_fdr: Array2<bool>,
    /// Monotone Benjamini-Hochberg adjusted p-values
    pub pval_adj: Array2<f64>,
    /// Present cells only, acid-major
    pub permutations: Vec<PermutationRecord>,
    /// Empty unless curves were requested
    pub curves: Vec<CurveRecord>,
}
impl ScanResults {
    pub(crate) fn from_cells(
        positions: Vec<Position>,
        acids: Vec<u8>,
        cells: Vec<CellResult>,
        alpha: f64,
    ) -> Self {
        let shape = (positions.len(), acids.len());
        let mut score = Array2::from_elem(shape, f64::NAN);
        let mut zscore = Array2::from_elem(shape, f64::NAN);
        let mut pval_raw = Array2::ones(shape);
        let mut counts = Array2::zeros(shape);
        let mut permutations = Vec::new();
        let mut curves = Vec::new();

        for cell in cells {
            let idx = (cell.position, cell.acid);
            counts[idx] = cell.count;
            if !cell.is_present() {
                continue;
            }
            score[idx] = cell.score;
            zscore[idx] = cell.zscore;
            pval_raw[idx] = cell.pvalue;

            let acid = acids[cell.acid];
            let position = positions[cell.position];
            permutations.push(PermutationRecord {
                acid,
                position,
                observed: cell.score,
                null: cell.null,
            });
            if let Some(curve) = cell.curve {
                curves.push(CurveRecord {
                    acid,
                    position,
                    curve,
                });
            }
        }

        let pval_fdr = fdr_mask(&pval_raw, alpha);
        let pval_adj = adjusted_pvalues(&pval_raw);

        Self {
            positions,
            acids,
            score,
            zscore,
            pval_raw,
            counts,
            pval_fdr,
            pval_adj,
            permutations,
            curves,
        }
    }

    pub fn n_tests(&self) -> usize {
        self.pval_raw.len()
    }

    pub fn n_significant(&self) -> usize {
        self.pval_fdr.iter().filter(|&&s| s).count()
    }

    /// Significant (acid, position, score, p-value) tuples, acid-major
    pub fn significant(&self) -> Vec<(u8, Position, f64, f64)> {
        let mut hits = Vec::new();
        for (a, &acid) in self.acids.iter().enumerate() {
            for (p, &position) in self.positions.iter().enumerate() {
                if self.pval_fdr[(p, a)] {
                    hits.push((acid, position, self.score[(p, a)], self.pval_raw[(p, a)]));
                }
            }
        }
        hits
    }
}

fn acid_symbol<S: Serializer>(acid: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_char(*acid as char)
}

fn position_label<S: Serializer>(position: &Position, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&position.label())
}

fn nine_decimals<S: Serializer>(x: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{x:.9}"))
}

/// Change of the score of (acid2, position2) once the peptides are restricted
/// to those carrying acid1 at position1
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct ConditionalInteraction {
    #[serde(serialize_with = "acid_symbol")]
    pub acid1: u8,
    #[serde(serialize_with = "position_label")]
    pub position1: Position,
    /// Unconditioned score of (acid1, position1)
    #[serde(serialize_with = "nine_decimals")]
    pub score1: f64,
    #[serde(serialize_with = "acid_symbol")]
    pub acid2: u8,
    #[serde(serialize_with = "position_label")]
    pub position2: Position,
    #[serde(serialize_with = "nine_decimals")]
    pub score2_original: f64,
    #[serde(serialize_with = "nine_decimals")]
    pub score2_conditioned: f64,
    #[serde(serialize_with = "nine_decimals")]
    pub delta: f64,
}

pub struct InteractionReport {
    pub interactions: Vec<ConditionalInteraction>,
}
impl InteractionReport {
    pub fn from_vec(interactions: Vec<ConditionalInteraction>, order: ReportOrder) -> Self {
        let mut report = Self { interactions };
        report.order_by(order);
        report
    }

    /// Reorders the interactions; `Insertion` leaves them untouched
    pub fn order_by(&mut self, order: ReportOrder) {
        if order == ReportOrder::DeltaDescending {
            // Stable, undefined deltas last
            self.interactions
                .sort_by(|a, b| match (a.delta.is_nan(), b.delta.is_nan()) {
                    (false, false) => b.delta.total_cmp(&a.delta),
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (true, true) => Ordering::Equal,
                });
        }
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}
