//! Error types for the enrichment pipeline

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing column `{column}` in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("sequence of row `{row}` has length {length}, but position {position} was requested")]
    SequenceTooShort {
        row: String,
        length: usize,
        position: usize,
    },

    #[error("empty table: {reason}")]
    EmptyTable { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("could not create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, EnrichmentError>;
