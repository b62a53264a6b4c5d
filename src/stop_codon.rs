use derive_new::new;
use itertools::Itertools;

use crate::table::{PositionalMatrix, STOP_CODON};

/// A premature stop codon observed in a peptide
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct StopSite {
    /// Row of the peptide in the ranked matrix
    pub row: usize,
    /// 1-based sequence position of the stop codon
    pub position: usize,
}

/// All stop codons of a positional matrix
///
/// Sequence past a stop codon is not translated, so a peptide carries no
/// information about any position after its first stop.
#[derive(Debug, Clone, Default)]
pub struct StopCodons {
    sites: Vec<StopSite>,
}
impl StopCodons {
    pub fn from_sites(sites: Vec<StopSite>) -> Self {
        Self { sites }
    }

    /// Collects the stop codons in the analyzed positions of the matrix
    pub fn locate(matrix: &PositionalMatrix) -> Self {
        let sites = matrix
            .cells()
            .indexed_iter()
            .filter(|(_, acid)| **acid == STOP_CODON)
            .map(|((row, j), _)| StopSite::new(row, matrix.positions()[j].number()))
            .collect();
        Self { sites }
    }

    pub fn sites(&self) -> &[StopSite] {
        &self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Rows with a stop codon strictly before the 1-based `position`
    pub fn rows_before(&self, position: usize) -> Vec<usize> {
        self.sites
            .iter()
            .filter(|site| site.position < position)
            .map(|site| site.row)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Acids at the `j`-th position of the matrix, without the peptides
    /// terminated before it
    ///
    /// Stops at or after the position itself keep the peptide. Surviving rows
    /// stay in rank order.
    pub fn filter_column(&self, matrix: &PositionalMatrix, j: usize) -> Vec<u8> {
        let column = matrix.column(j);
        if self.is_empty() {
            return column;
        }
        let removed = self.rows_before(matrix.positions()[j].number());
        if removed.is_empty() {
            return column;
        }
        column
            .into_iter()
            .enumerate()
            .filter(|(row, _)| removed.binary_search(row).is_err())
            .map(|(_, acid)| acid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> PositionalMatrix {
        PositionalMatrix::from_sequences(
            [
                ("r0", "MKAWLE"),
                ("r1", "MQ*WLE"),
                ("r2", "MKCYLD"),
                ("r3", "MKCY*D"),
                ("r4", "MKCYLD"),
            ],
            &[0, 1, 2, 3, 4, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_locate() {
        let stops = StopCodons::locate(&matrix());
        assert_eq!(stops.sites(), &[StopSite::new(1, 3), StopSite::new(3, 5)]);
    }

    #[test]
    fn test_stop_at_position_is_kept() {
        let matrix = matrix();
        let stops = StopCodons::locate(&matrix);

        // Pos05: row 3 carries its stop here and must stay
        let column = stops.filter_column(&matrix, 4);
        assert_eq!(column, b"LL*L".to_vec());
        assert_eq!(stops.rows_before(5), vec![1]);
    }

    #[test]
    fn test_stop_before_position_is_dropped() {
        let matrix = matrix();
        let stops = StopCodons::locate(&matrix);
        assert_eq!(stops.filter_column(&matrix, 5), b"EDD".to_vec());
        assert_eq!(stops.rows_before(6), vec![1, 3]);
    }

    #[test]
    fn test_no_removal_returns_column() {
        let matrix = matrix();
        let stops = StopCodons::locate(&matrix);
        assert_eq!(stops.filter_column(&matrix, 0), matrix.column(0));
        assert_eq!(stops.filter_column(&matrix, 2), matrix.column(2));
    }

    #[test]
    fn test_explicit_sites() {
        let matrix = matrix();
        let stops = StopCodons::from_sites(vec![StopSite::new(0, 1), StopSite::new(4, 2)]);
        assert_eq!(stops.filter_column(&matrix, 1), b"QKKK".to_vec());
        assert_eq!(stops.filter_column(&matrix, 0), matrix.column(0));
    }
}
