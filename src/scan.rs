use rayon::prelude::*;

use crate::{
    cell::{CellResult, CellTest},
    config::EnrichmentConfig,
    error::Result,
    results::ScanResults,
    stop_codon::StopCodons,
    table::PositionalMatrix,
};

/// Permutation-tested enrichment of every (position, acid) pair
pub struct EnrichmentScan<'a> {
    matrix: &'a PositionalMatrix,
    stop_codons: StopCodons,
    config: EnrichmentConfig,
}
impl<'a> EnrichmentScan<'a> {
    /// Prepares a scan of the matrix, locating its stop codons
    pub fn new(matrix: &'a PositionalMatrix, config: EnrichmentConfig) -> Result<Self> {
        config.validate()?;
        let stop_codons = StopCodons::locate(matrix);
        Ok(Self {
            matrix,
            stop_codons,
            config,
        })
    }

    /// Replaces the located stop codons
    pub fn with_stop_codons(mut self, stop_codons: StopCodons) -> Self {
        self.stop_codons = stop_codons;
        self
    }

    /// Run the scan
    ///
    /// 1. Clear each position of peptides terminated before it
    /// 2. Score and permutation-test every (acid, position) cell
    /// 3. Correct all raw p-values at once
    ///
    /// Cell `i` (acid-major) draws its permutations from random stream `i`,
    /// so the results do not depend on the number of threads.
    pub fn run(&self) -> ScanResults {
        let positions = self.matrix.positions().to_vec();
        let acids = self.matrix.acids();
        let n_positions = positions.len();
        log::info!(
            "Scanning {} positions x {} acids over {} peptides ({} permutations, {} mode)",
            n_positions,
            acids.len(),
            self.matrix.n_rows(),
            self.config.n_perm,
            self.config.mode,
        );

        let columns = (0..n_positions)
            .map(|j| self.stop_codons.filter_column(self.matrix, j))
            .collect::<Vec<_>>();

        let cells = acids
            .iter()
            .enumerate()
            .flat_map(|(a, &symbol)| (0..n_positions).map(move |p| (a, symbol, p)))
            .collect::<Vec<_>>();

        let results = cells
            .into_par_iter()
            .enumerate()
            .map(|(stream, (a, symbol, p))| {
                CellTest::new(p, a, symbol, &columns[p], &self.config, stream as u64).into()
            })
            .collect::<Vec<CellResult>>();

        ScanResults::from_cells(positions, acids, results, self.config.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ScoreMode, stop_codon::StopSite};
    use approx::assert_relative_eq;

    fn matrix() -> PositionalMatrix {
        PositionalMatrix::from_sequences(
            [
                ("r0", "AK"),
                ("r1", "AQ"),
                ("r2", "BK"),
                ("r3", "B*"),
                ("r4", "BQ"),
            ],
            &[0, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_toy_scan() {
        let matrix = matrix();
        let config = EnrichmentConfig::builder().n_perm(20).seed(1).build();
        let results = EnrichmentScan::new(&matrix, config).unwrap().run();

        assert_eq!(results.acids, b"*ABKQ".to_vec());
        assert_eq!(results.score.dim(), (2, 5));

        // Pos01, acid A
        assert_eq!(results.counts[(0, 1)], 2);
        assert_relative_eq!(results.score[(0, 1)], 0.5, epsilon = 1e-12);
        // Pos01 has no K
        assert_eq!(results.counts[(0, 3)], 0);
        assert!(results.score[(0, 3)].is_nan());
        assert_relative_eq!(results.pval_raw[(0, 3)], 1.0);

        for record in &results.permutations {
            assert_eq!(record.null.len(), 20);
        }
        assert!(results.curves.is_empty());
    }

    #[test]
    fn test_scan_reproducible() {
        let matrix = matrix();
        let config = EnrichmentConfig::builder()
            .n_perm(30)
            .mode(ScoreMode::Max)
            .seed(9)
            .store_curves(true)
            .build();
        let a = EnrichmentScan::new(&matrix, config.clone()).unwrap().run();
        let b = EnrichmentScan::new(&matrix, config).unwrap().run();
        assert_eq!(a.permutations, b.permutations);
        assert_eq!(a.curves, b.curves);
        assert_eq!(a.pval_fdr, b.pval_fdr);
        assert_eq!(a.curves.len(), a.permutations.len());
    }

    #[test]
    fn test_injected_stop_codons() {
        let matrix = matrix();
        let config = EnrichmentConfig::builder().n_perm(0).build();
        let located = EnrichmentScan::new(&matrix, config.clone()).unwrap().run();
        // r3 stops at Pos02 itself and is kept
        assert_eq!(located.counts[(1, 0)], 1);
        assert_eq!(located.counts[(1, 3)], 2);

        // A stop in r0 at Pos01 clears it from Pos02
        let injected = EnrichmentScan::new(&matrix, config.clone())
            .unwrap()
            .with_stop_codons(StopCodons::from_sites(vec![StopSite::new(0, 1)]))
            .run();
        assert_eq!(injected.counts[(0, 1)], 2);
        assert_eq!(injected.counts[(1, 3)], 1);
        assert_eq!(injected.counts[(1, 0)], 1);
        // Pos02 column QK*Q: curve -1/3, 2/3, 1/3, 0
        assert_relative_eq!(injected.score[(1, 3)], 1.0 / 6.0, epsilon = 1e-12);
        // Pos02 column KQK*Q: curve 1/2, 1/6, 2/3, 1/3, 0
        assert_relative_eq!(located.score[(1, 3)], 1.0 / 3.0, epsilon = 1e-12);

        let none = StopCodons::from_sites(Vec::new());
        assert!(none.is_empty());
        let unfiltered = EnrichmentScan::new(&matrix, config)
            .unwrap()
            .with_stop_codons(none)
            .run();
        assert_eq!(unfiltered.counts, located.counts);
    }

    #[test]
    fn test_invalid_alpha() {
        let matrix = matrix();
        let config = EnrichmentConfig::builder().alpha(1.5).build();
        assert!(EnrichmentScan::new(&matrix, config).is_err());
    }
}
