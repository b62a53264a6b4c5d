//! CSV output of scan results and interaction reports
//!
//! Metric matrices are written transposed: one row per acid, one column per
//! position, with an empty first header cell. Undefined values are written as `NaN`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ndarray::Array2;

use crate::{
    config::EnrichmentConfig,
    error::{EnrichmentError, Result},
    results::{InteractionReport, ScanResults},
    table::Position,
};

fn write_err(path: &Path) -> impl Fn(csv::Error) -> EnrichmentError + '_ {
    move |source| EnrichmentError::Write {
        path: path.to_path_buf(),
        source,
    }
}

pub fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| EnrichmentError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes a (position x acid) matrix with acids as rows
pub fn write_matrix<T, F>(
    path: &Path,
    positions: &[Position],
    acids: &[u8],
    matrix: &Array2<T>,
    format: F,
) -> Result<()>
where
    F: Fn(&T) -> String,
{
    let mut writer = csv::Writer::from_path(path).map_err(write_err(path))?;

    let header = std::iter::once(String::new()).chain(positions.iter().map(Position::label));
    writer.write_record(header).map_err(write_err(path))?;

    for (a, &acid) in acids.iter().enumerate() {
        let column = matrix.column(a);
        let row = std::iter::once((acid as char).to_string()).chain(column.iter().map(&format));
        writer.write_record(row).map_err(write_err(path))?;
    }
    writer.flush().map_err(|e| write_err(path)(e.into()))?;
    Ok(())
}

/// Writes headerless rows of `acid,position,values...`
fn write_records<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = (u8, Position, &'a [f64])>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(write_err(path))?;
    for (acid, position, values) in records {
        let row = [(acid as char).to_string(), position.label()]
            .into_iter()
            .chain(values.iter().map(f64::to_string));
        writer.write_record(row).map_err(write_err(path))?;
    }
    writer.flush().map_err(|e| write_err(path)(e.into()))?;
    Ok(())
}

fn bool_label(x: &bool) -> String {
    if *x { "True" } else { "False" }.to_string()
}

/// Writes every artifact of an enrichment scan into `outdir`
///
/// Returns the paths written, in order.
pub fn write_scan(
    results: &ScanResults,
    outdir: &Path,
    config: &EnrichmentConfig,
) -> Result<Vec<PathBuf>> {
    create_dir(outdir)?;
    let prefix = outdir.join(config.prefix());
    let named = |suffix: &str| {
        let mut name = prefix.clone().into_os_string();
        name.push(format!("_{suffix}.csv"));
        PathBuf::from(name)
    };
    let mut written = Vec::new();

    let float_metrics = [
        (config.mode.to_string(), &results.score),
        ("zscore".to_string(), &results.zscore),
        ("pval_raw".to_string(), &results.pval_raw),
        ("pval_adj".to_string(), &results.pval_adj),
    ];
    for (metric, matrix) in float_metrics {
        let path = named(&metric);
        write_matrix(&path, &results.positions, &results.acids, matrix, f64::to_string)?;
        written.push(path);
    }

    let path = named("counts");
    write_matrix(&path, &results.positions, &results.acids, &results.counts, usize::to_string)?;
    written.push(path);

    let path = named("pval_fdr");
    write_matrix(&path, &results.positions, &results.acids, &results.pval_fdr, bool_label)?;
    written.push(path);

    // Observed score followed by the null scores
    let path = named("permutations");
    let rows = results
        .permutations
        .iter()
        .map(|record| {
            let values = std::iter::once(record.observed)
                .chain(record.null.iter().copied())
                .collect::<Vec<_>>();
            (record.acid, record.position, values)
        })
        .collect::<Vec<_>>();
    write_records(&path, rows.iter().map(|(a, p, v)| (*a, *p, v.as_slice())))?;
    written.push(path);

    if config.store_curves {
        let path = outdir.join("enrichment_curves.csv");
        write_records(
            &path,
            results
                .curves
                .iter()
                .map(|record| (record.acid, record.position, record.curve.as_slice())),
        )?;
        written.push(path);
    }

    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    Ok(written)
}

/// Writes a score matrix with nine decimals
pub fn write_scores(
    path: &Path,
    positions: &[Position],
    acids: &[u8],
    scores: &Array2<f64>,
) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir(dir)?;
    }
    write_matrix(path, positions, acids, scores, |x| format!("{x:.9}"))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

const INTERACTION_HEADER: [&str; 8] = [
    "acid1",
    "position1",
    "score1",
    "acid2",
    "position2",
    "score2_original",
    "score2_conditioned",
    "delta",
];

/// Writes the conditional interactions, one per row, in report order
pub fn write_interactions(path: &Path, report: &InteractionReport) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir(dir)?;
    }
    // Header written explicitly, also for an empty report
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_err(path))?;
    writer.write_record(INTERACTION_HEADER).map_err(write_err(path))?;
    for interaction in &report.interactions {
        writer.serialize(interaction).map_err(write_err(path))?;
    }
    writer.flush().map_err(|e| write_err(path)(e.into()))?;
    log::info!("Wrote {} interactions to {}", report.len(), path.display());
    Ok(())
}
