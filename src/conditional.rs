//! Conditional (epistatic) effects between positions
//!
//! Fixing an acid at one position and rescoring every other (position, acid)
//! on the remaining peptides shows whether the two occur together among the
//! best-ranked peptides more or less often than their individual scores suggest.

use itertools::Itertools;
use ndarray::Array2;
use rayon::prelude::*;

use crate::{
    config::{ConditionalConfig, ScoreMode},
    curve::enrichment_curve,
    results::{ConditionalInteraction, InteractionReport},
    table::PositionalMatrix,
};

/// Score of every (position, acid) pair, `NaN` where the acid is absent
///
/// No permutations are drawn and no stop codons are removed.
pub fn score_matrix(matrix: &PositionalMatrix, acids: &[u8], mode: ScoreMode) -> Array2<f64> {
    let columns = (0..matrix.n_positions())
        .map(|j| matrix.column(j))
        .collect::<Vec<_>>();
    Array2::from_shape_fn((columns.len(), acids.len()), |(j, a)| {
        enrichment_curve(&columns[j], acids[a]).map_or(f64::NAN, |curve| mode.reduce(&curve))
    })
}

pub struct ConditionalScan<'a> {
    matrix: &'a PositionalMatrix,
    config: ConditionalConfig,
}
impl<'a> ConditionalScan<'a> {
    pub fn new(matrix: &'a PositionalMatrix, config: ConditionalConfig) -> Self {
        Self { matrix, config }
    }

    /// Conditions on every (position, acid) pair in turn
    ///
    /// Pairs are visited by position, then acid. Each conditioning step is
    /// independent; their interactions are concatenated in visiting order
    /// before the report ordering is applied.
    pub fn run(&self) -> InteractionReport {
        let acids = self.matrix.acids();
        let original = score_matrix(self.matrix, &acids, self.config.mode);
        log::info!(
            "Conditioning on {} positions x {} acids ({} mode)",
            self.matrix.n_positions(),
            acids.len(),
            self.config.mode
        );

        let pairs = (0..self.matrix.n_positions())
            .cartesian_product(0..acids.len())
            .collect::<Vec<_>>();
        let interactions = pairs
            .par_iter()
            .map(|&(j, a)| self.condition_on(j, a, &acids, &original))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        InteractionReport::from_vec(interactions, self.config.order)
    }

    /// Interactions of all other pairs with acid `a` fixed at position `j`
    ///
    /// The fixed position is dropped from the filtered peptides. Nothing is
    /// emitted when no peptide carries the acid there.
    fn condition_on(
        &self,
        j: usize,
        a: usize,
        acids: &[u8],
        original: &Array2<f64>,
    ) -> Vec<ConditionalInteraction> {
        let acid1 = acids[a];
        let position1 = self.matrix.positions()[j];
        let rows = self.matrix.rows_matching(j, acid1);
        if rows.is_empty() {
            return Vec::new();
        }
        log::debug!("at {}, position {}", acid1 as char, position1);

        let filtered = self.matrix.select_rows(&rows).drop_position(j);
        let filtered_acids = filtered.acids();
        let conditioned = score_matrix(&filtered, &filtered_acids, self.config.mode);
        let score1 = original[(j, a)];

        let mut interactions = Vec::new();
        for (k, &position2) in filtered.positions().iter().enumerate() {
            // Index of position2 before the fixed position was dropped
            let j2 = if k < j { k } else { k + 1 };
            for (b, &acid2) in filtered_acids.iter().enumerate() {
                let Ok(a2) = acids.binary_search(&acid2) else {
                    continue;
                };
                let score2_original = original[(j2, a2)];
                let score2_conditioned = conditioned[(k, b)];
                interactions.push(ConditionalInteraction::new(
                    acid1,
                    position1,
                    score1,
                    acid2,
                    position2,
                    score2_original,
                    score2_conditioned,
                    score2_conditioned - score2_original,
                ));
            }
        }
        interactions
    }
}
