//! Running-sum enrichment curves
//!
//! Walking down the ranked peptides, every peptide carrying the acid of interest
//! steps the curve up by `1/m` and every other peptide steps it down by `1/(n - m)`,
//! where `n` is the number of peptides and `m` the number of hits. This is the
//! unweighted (`p = 0`) random walk of Subramanian et al. (2005).

/// Signed per-peptide steps of the enrichment curve
///
/// Returns `None` when the acid does not occur in the column.
pub fn increments(column: &[u8], acid: u8) -> Option<Vec<f64>> {
    let n = column.len();
    let m = column.iter().filter(|&&a| a == acid).count();
    if m == 0 {
        return None;
    }
    let hit = 1.0 / m as f64;
    // Unused when every peptide is a hit
    let miss = -1.0 / (n - m) as f64;
    Some(
        column
            .iter()
            .map(|&a| if a == acid { hit } else { miss })
            .collect(),
    )
}

pub fn cumsum(x: &[f64]) -> Vec<f64> {
    x.iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Enrichment curve of `acid` over a ranked column, `None` if the acid is absent
pub fn enrichment_curve(column: &[u8], acid: u8) -> Option<Vec<f64>> {
    increments(column, acid).map(|steps| cumsum(&steps))
}
