//! pepgsea: positional amino-acid enrichment of ranked peptide screens
//!
//! Peptides are ranked by activity. For every sequence position and amino acid
//! a running-sum enrichment curve (as in gene set enrichment analysis) measures
//! whether the acid is concentrated among the best peptides. Curve scores are
//! tested against permuted rankings and corrected for multiple testing, and a
//! conditional scan measures how fixing one acid at one position changes the
//! scores everywhere else.
//!
//! The main components of this library are:
//! - `PositionalMatrix`: ranked peptides split into per-position acids
//! - `EnrichmentScan`: permutation-tested scores of every (position, acid) pair
//! - `ConditionalScan`: score deltas under every single-acid condition
//! - `EnrichmentConfig` / `ConditionalConfig`: run parameters
//! - `ScanResults` / `InteractionReport`: results and their CSV writers in `report`

mod cell;
pub mod cli;
mod conditional;
mod config;
pub mod curve;
mod error;
pub mod fdr;
pub mod math;
pub mod null;
pub mod report;
mod results;
mod scan;
mod stop_codon;
mod table;
mod utils;

pub use conditional::{score_matrix, ConditionalScan};
pub use config::{ConditionalConfig, EnrichmentConfig, ReportOrder, ScoreMode};
pub use error::{EnrichmentError, Result};
pub use results::{
    ConditionalInteraction, CurveRecord, InteractionReport, PermutationRecord, ScanResults,
};
pub use scan::EnrichmentScan;
pub use stop_codon::{StopCodons, StopSite};
pub use table::{Position, PositionalMatrix, DEFAULT_POSITIONS, STOP_CODON};
pub use utils::Timer;
