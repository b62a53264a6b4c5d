//! pepgsea command-line interface

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use pepgsea::{
    cli::{Cli, Commands, InputArgs},
    report::{write_interactions, write_scan, write_scores},
    score_matrix, ConditionalConfig, ConditionalScan, EnrichmentConfig, EnrichmentScan,
    PositionalMatrix, ReportOrder, ScoreMode, Timer,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("failed to configure the thread pool")?;
    }

    match cli.command {
        Commands::Scan {
            input,
            outdir,
            n_perm,
            mode,
            alpha,
            store_curves,
            seed,
        } => {
            let config = EnrichmentConfig::builder()
                .n_perm(n_perm)
                .mode(mode)
                .alpha(alpha)
                .store_curves(store_curves)
                .seed(seed)
                .build();
            run_scan(&input, &outdir, config)
        }
        Commands::Scores {
            input,
            outdir,
            mode,
        } => run_scores(&input, &outdir, mode),
        Commands::Conditional {
            input,
            outdir,
            mode,
            order,
        } => run_conditional(&input, &outdir, mode, order),
    }
}

fn load(input: &InputArgs) -> Result<PositionalMatrix> {
    PositionalMatrix::load(&input.input, &input.offsets())
        .with_context(|| format!("could not load {}", input.input.display()))
}

fn run_scan(input: &InputArgs, outdir: &Path, config: EnrichmentConfig) -> Result<()> {
    let matrix = load(input)?;
    let results = {
        let _timer = Timer::new("permutations");
        EnrichmentScan::new(&matrix, config.clone())?.run()
    };
    log::info!(
        "{} of {} tests significant at FDR {}",
        results.n_significant(),
        results.n_tests(),
        config.alpha
    );
    for (acid, position, score, pvalue) in results.significant() {
        log::debug!(
            "significant: {} at {} (score {:.4}, p {})",
            acid as char,
            position,
            score,
            pvalue
        );
    }
    write_scan(&results, outdir, &config)?;
    Ok(())
}

fn run_scores(input: &InputArgs, outdir: &Path, mode: ScoreMode) -> Result<()> {
    let matrix = load(input)?;
    let acids = matrix.acids();
    let scores = score_matrix(&matrix, &acids, mode);
    let path = outdir.join(format!("{mode}_values.csv"));
    write_scores(&path, matrix.positions(), &acids, &scores)?;
    Ok(())
}

fn run_conditional(
    input: &InputArgs,
    outdir: &Path,
    mode: ScoreMode,
    order: ReportOrder,
) -> Result<()> {
    let matrix = load(input)?;
    let config = ConditionalConfig::builder().mode(mode).order(order).build();
    let report = {
        let _timer = Timer::new("conditional scan");
        ConditionalScan::new(&matrix, config).run()
    };
    let path = outdir.join(format!("conditional_{mode}.csv"));
    write_interactions(&path, &report)?;
    Ok(())
}
