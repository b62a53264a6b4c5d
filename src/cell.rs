use bon::Builder;
use derive_new::new;

use crate::{
    config::EnrichmentConfig,
    curve::{cumsum, increments},
    math::{twosided_pvalue, zscore},
    null::{cell_rng, permutation_null},
};

/// A single (position, acid) enrichment test
///
/// Holds the ranked column of the position, already cleared of peptides
/// terminated by an earlier stop codon.
#[derive(new)]
pub struct CellTest<'a> {
    /// Index into the position universe
    position: usize,
    /// Index into the acid universe
    acid: usize,
    /// Symbol of the tested acid
    symbol: u8,
    column: &'a [u8],
    config: &'a EnrichmentConfig,
    /// Random stream of this cell's permutations
    stream: u64,
}

/// Outcome of a (position, acid) enrichment test
///
/// Cells without any occurrence of the acid keep the defaults: zero count,
/// undefined score and z-score, and a p-value of 1.0.
#[derive(Debug, Clone, Builder)]
pub struct CellResult {
    pub position: usize,
    pub acid: usize,
    #[builder(default)]
    pub count: usize,
    #[builder(default = f64::NAN)]
    pub score: f64,
    #[builder(default = f64::NAN)]
    pub zscore: f64,
    #[builder(default = 1.0)]
    pub pvalue: f64,
    /// Null scores in permutation order
    #[builder(default)]
    pub null: Vec<f64>,
    pub curve: Option<Vec<f64>>,
}
impl CellResult {
    pub fn is_present(&self) -> bool {
        self.count > 0
    }
}

impl From<CellTest<'_>> for CellResult {
    fn from(test: CellTest<'_>) -> Self {
        log::debug!("testing acid {} at position index {}", test.symbol as char, test.position);

        let Some(steps) = increments(test.column, test.symbol) else {
            return CellResult::builder()
                .position(test.position)
                .acid(test.acid)
                .build();
        };
        let count = test.column.iter().filter(|&&a| a == test.symbol).count();

        let curve = cumsum(&steps);
        let mode = test.config.mode;
        let score = mode.reduce(&curve);

        let mut rng = cell_rng(test.config.seed, test.stream);
        let null = permutation_null(&steps, test.config.n_perm, mode, &mut rng);

        CellResult::builder()
            .position(test.position)
            .acid(test.acid)
            .count(count)
            .score(score)
            .zscore(zscore(score, &null))
            .pvalue(twosided_pvalue(score, &null))
            .null(null)
            .maybe_curve(test.config.store_curves.then_some(curve))
            .build()
    }
}
