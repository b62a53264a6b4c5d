//! Command-line interface for pepgsea

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    config::{ReportOrder, ScoreMode},
    table::DEFAULT_POSITIONS,
};

#[derive(Parser)]
#[command(name = "pepgsea")]
#[command(version)]
#[command(about = "Positional amino-acid enrichment of ranked peptide screens")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of worker threads (0 = all cores)
    #[arg(short, long, global = true, default_value_t = 0)]
    pub threads: usize,
}

#[derive(Args)]
pub struct InputArgs {
    /// Ranked peptide table (CSV, best peptide first)
    #[arg(short, long)]
    pub input: PathBuf,

    /// 0-based sequence offsets to analyze, comma separated [default: 0-22]
    #[arg(short, long, value_delimiter = ',')]
    pub positions: Vec<usize>,
}
impl InputArgs {
    pub fn offsets(&self) -> Vec<usize> {
        if self.positions.is_empty() {
            DEFAULT_POSITIONS.collect()
        } else {
            self.positions.clone()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every (position, acid) pair and test it against permuted rankings
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "enrichment")]
        outdir: PathBuf,

        /// Permutations per (position, acid); runtime grows linearly with it
        #[arg(short, long, default_value_t = 10)]
        n_perm: usize,

        #[arg(short, long, value_enum, default_value_t = ScoreMode::Auc)]
        mode: ScoreMode,

        /// False discovery rate of the Benjamini-Hochberg mask
        #[arg(short, long, default_value_t = 0.1)]
        alpha: f64,

        /// Also write every enrichment curve (large)
        #[arg(long)]
        store_curves: bool,

        /// Seed of the permutations
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },

    /// Write the score of every (position, acid) pair without testing
    Scores {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "scores")]
        outdir: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ScoreMode::Auc)]
        mode: ScoreMode,
    },

    /// Rescore all pairs with one acid fixed at one position, for every such condition
    Conditional {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "conditional")]
        outdir: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ScoreMode::Auc)]
        mode: ScoreMode,

        /// Row order of the report
        #[arg(long, value_enum, default_value_t = ReportOrder::DeltaDescending)]
        order: ReportOrder,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::parse_from([
            "pepgsea", "scan", "-i", "ranked.csv", "-p", "4,17,18", "-n", "100", "-m", "max",
        ]);
        match cli.command {
            Commands::Scan {
                input, n_perm, mode, alpha, ..
            } => {
                assert_eq!(input.offsets(), vec![4, 17, 18]);
                assert_eq!(n_perm, 100);
                assert_eq!(mode, ScoreMode::Max);
                assert_eq!(alpha, 0.1);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_default_positions() {
        let cli = Cli::parse_from(["pepgsea", "conditional", "-i", "ranked.csv"]);
        match cli.command {
            Commands::Conditional { input, order, .. } => {
                assert_eq!(input.offsets(), (0..23).collect::<Vec<_>>());
                assert_eq!(order, ReportOrder::DeltaDescending);
            }
            _ => panic!("expected conditional"),
        }
    }
}
