//! Ranked peptide tables and their per-position view

use std::{fmt, ops::Range, path::Path};

use itertools::Itertools;
use ndarray::{Array2, Axis};

use crate::{
    error::{EnrichmentError, Result},
    utils::{index_mask, select_indices},
};

/// Sentinel for a premature stop codon in a peptide sequence
pub const STOP_CODON: u8 = b'*';

/// Offsets analyzed when no subset is requested
pub const DEFAULT_POSITIONS: Range<usize> = 0..23;

const SEQUENCE_COLUMN: &str = "Sequence";
const FOLD_CHANGE_COLUMN: &str = "shrunken.log2.fold.change";
const ID_COLUMN: &str = "ID";

/// A position within the peptide sequence, stored as its 0-based offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);
impl Position {
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    pub fn offset(&self) -> usize {
        self.0
    }

    /// 1-based position in the sequence
    pub fn number(&self) -> usize {
        self.0 + 1
    }

    /// Column label, e.g. `Pos05`
    pub fn label(&self) -> String {
        format!("Pos{:02}", self.number())
    }
}
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Peptides (rows, in rank order) by positions (columns) of single acids
///
/// Rows are kept in the order of the source table, which encodes the activity
/// ranking. Every row operation preserves the relative order of the rows it keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalMatrix {
    row_ids: Vec<String>,
    positions: Vec<Position>,
    cells: Array2<u8>,
}
impl PositionalMatrix {
    /// Loads a ranked peptide table
    ///
    /// The first column holds the row identifiers. The table must provide the
    /// `Sequence`, `shrunken.log2.fold.change` and `ID` columns; only the
    /// sequences are kept beyond validation.
    pub fn load<P: AsRef<Path>>(path: P, offsets: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        let read_err = |source| EnrichmentError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(read_err)?;
        let headers = reader.headers().map_err(read_err)?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EnrichmentError::MissingColumn {
                    column: name.to_string(),
                    path: path.to_path_buf(),
                })
        };
        let sequence_idx = column_index(SEQUENCE_COLUMN)?;
        column_index(FOLD_CHANGE_COLUMN)?;
        column_index(ID_COLUMN)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            let row_id = record.get(0).unwrap_or_default().to_string();
            let sequence = record.get(sequence_idx).unwrap_or_default().to_string();
            records.push((row_id, sequence));
        }
        log::info!("Loaded {} peptides from {}", records.len(), path.display());

        Self::from_sequences(records, offsets)
    }

    /// Builds the matrix from `(row id, sequence)` pairs given in rank order
    pub fn from_sequences<I, S, T>(records: I, offsets: &[usize]) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let positions = offsets
            .iter()
            .copied()
            .sorted_unstable()
            .dedup()
            .map(Position::new)
            .collect::<Vec<_>>();
        let Some(last) = positions.last().copied() else {
            return Err(EnrichmentError::InvalidConfig {
                reason: "no positions requested".to_string(),
            });
        };

        let mut row_ids = Vec::new();
        let mut sequences = Vec::new();
        for (row_id, sequence) in records {
            let row_id = row_id.into();
            let sequence = sequence.as_ref().as_bytes().to_vec();
            if sequence.len() <= last.offset() {
                return Err(EnrichmentError::SequenceTooShort {
                    row: row_id,
                    length: sequence.len(),
                    position: last.number(),
                });
            }
            row_ids.push(row_id);
            sequences.push(sequence);
        }
        if row_ids.is_empty() {
            return Err(EnrichmentError::EmptyTable {
                reason: "no peptides found".to_string(),
            });
        }

        let cells = Array2::from_shape_fn((sequences.len(), positions.len()), |(i, j)| {
            sequences[i][positions[j].offset()]
        });
        Ok(Self {
            row_ids,
            positions,
            cells,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn n_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    /// Acids of all peptides at the `j`-th position, in rank order
    pub fn column(&self, j: usize) -> Vec<u8> {
        self.cells.column(j).to_vec()
    }

    /// Sorted set of all symbols in the matrix, stop codons included
    pub fn acids(&self) -> Vec<u8> {
        self.cells.iter().copied().sorted_unstable().dedup().collect()
    }

    /// Rows carrying `acid` at the `j`-th position
    pub fn rows_matching(&self, j: usize, acid: u8) -> Vec<usize> {
        index_mask(&acid, &self.column(j))
    }

    /// Keeps the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            row_ids: select_indices(rows, &self.row_ids),
            positions: self.positions.clone(),
            cells: self.cells.select(Axis(0), rows),
        }
    }

    /// Removes the `j`-th position
    pub fn drop_position(&self, j: usize) -> Self {
        let keep = (0..self.n_positions()).filter(|&k| k != j).collect::<Vec<_>>();
        Self {
            row_ids: self.row_ids.clone(),
            positions: select_indices(&keep, &self.positions),
            cells: self.cells.select(Axis(1), &keep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toy() -> PositionalMatrix {
        PositionalMatrix::from_sequences(
            [("p1", "MKAW"), ("p2", "MQAW"), ("p3", "M*CW"), ("p4", "MKCY")],
            &[1, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_position_labels() {
        assert_eq!(Position::new(0).label(), "Pos01");
        assert_eq!(Position::new(8).label(), "Pos09");
        assert_eq!(Position::new(9).label(), "Pos10");
        assert_eq!(Position::new(22).to_string(), "Pos23");
    }

    #[test]
    fn test_from_sequences() {
        let matrix = toy();
        assert_eq!(matrix.n_rows(), 4);
        assert_eq!(matrix.n_positions(), 3);
        assert_eq!(matrix.column(0), b"KQ*K".to_vec());
        assert_eq!(matrix.column(2), b"WWWY".to_vec());
        assert_eq!(matrix.acids(), b"*ACKQWY".to_vec());
    }

    #[test]
    fn test_offsets_sorted_and_deduplicated() {
        let matrix = PositionalMatrix::from_sequences([("p1", "ABCDE")], &[3, 0, 3]).unwrap();
        let labels = matrix.positions().iter().map(|p| p.label()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Pos01", "Pos04"]);
        assert_eq!(matrix.column(1), b"D".to_vec());
    }

    #[test]
    fn test_sequence_too_short() {
        let result = PositionalMatrix::from_sequences([("p1", "ABCDE"), ("p2", "AB")], &[0, 4]);
        assert!(matches!(
            result,
            Err(EnrichmentError::SequenceTooShort { ref row, length: 2, position: 5 }) if row == "p2"
        ));
    }

    #[test]
    fn test_no_positions() {
        let result = PositionalMatrix::from_sequences([("p1", "ABCDE")], &[]);
        assert!(matches!(result, Err(EnrichmentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_select_rows_and_drop_position() {
        let matrix = toy();
        let rows = matrix.rows_matching(0, b'K');
        assert_eq!(rows, vec![0, 3]);

        let filtered = matrix.select_rows(&rows).drop_position(0);
        assert_eq!(filtered.row_ids(), &["p1".to_string(), "p4".to_string()]);
        assert_eq!(filtered.n_positions(), 2);
        assert_eq!(filtered.positions()[0].label(), "Pos03");
        assert_eq!(filtered.column(0), b"AC".to_vec());
        assert_eq!(filtered.acids(), b"ACWY".to_vec());
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ",ID,Sequence,shrunken.log2.fold.change").unwrap();
        writeln!(file, "0,pep_a,MKAW,3.2").unwrap();
        writeln!(file, "1,pep_b,MQAW,1.1").unwrap();
        writeln!(file, "2,pep_c,MKCY,-0.4").unwrap();
        file.flush().unwrap();

        let matrix = PositionalMatrix::load(file.path(), &[1, 3]).unwrap();
        assert_eq!(matrix.row_ids(), &["0", "1", "2"]);
        assert_eq!(matrix.column(0), b"KQK".to_vec());
        assert_eq!(matrix.column(1), b"WWY".to_vec());
    }

    #[test]
    fn test_load_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ",Sequence,shrunken.log2.fold.change").unwrap();
        writeln!(file, "0,MKAW,3.2").unwrap();
        file.flush().unwrap();

        let result = PositionalMatrix::load(file.path(), &[1]);
        assert!(matches!(
            result,
            Err(EnrichmentError::MissingColumn { ref column, .. }) if column == "ID"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = PositionalMatrix::load("does/not/exist.csv", &[0]);
        assert!(matches!(result, Err(EnrichmentError::Read { .. })));
    }
}
