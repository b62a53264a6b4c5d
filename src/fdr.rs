//! Multiple testing correction across all (position, acid) tests

use adjustp::{adjust, Procedure};
use ndarray::Array2;

/// Benjamini-Hochberg step-up comparison
///
/// Each p-value is compared against `alpha * rank / N` of its own rank only,
/// without the running minimum of adjusted q-values. Ties are ranked in input
/// order. Returns the significance flags and the per-test thresholds, both in
/// input order.
pub fn benjamini_hochberg(pvalues: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let n = pvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));

    let mut thresholds = vec![1.0; n];
    for (rank, &idx) in order.iter().enumerate() {
        thresholds[idx] = alpha * (rank + 1) as f64 / n as f64;
    }
    let significant = pvalues
        .iter()
        .zip(thresholds.iter())
        .map(|(p, q)| p <= q)
        .collect();
    (significant, thresholds)
}

/// Global significance mask of a (position x acid) p-value matrix
///
/// The matrix is flattened row-major, corrected in a single call and reshaped.
pub fn fdr_mask(pvalues: &Array2<f64>, alpha: f64) -> Array2<bool> {
    let flat = pvalues.iter().copied().collect::<Vec<_>>();
    let (significant, _) = benjamini_hochberg(&flat, alpha);
    let n_cols = pvalues.ncols();
    Array2::from_shape_fn(pvalues.dim(), |(i, j)| significant[i * n_cols + j])
}

/// Monotone Benjamini-Hochberg adjusted p-values of a (position x acid) matrix
pub fn adjusted_pvalues(pvalues: &Array2<f64>) -> Array2<f64> {
    let flat = pvalues.iter().copied().collect::<Vec<_>>();
    let adjusted = adjust(&flat, Procedure::BenjaminiHochberg);
    let n_cols = pvalues.ncols();
    Array2::from_shape_fn(pvalues.dim(), |(i, j)| adjusted[i * n_cols + j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_bh_step_up_example() {
        let (significant, thresholds) = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.20], 0.1);
        assert_eq!(significant, vec![true, true, true, false]);
        let expected = [0.025, 0.075, 0.05, 0.1];
        for (t, e) in thresholds.iter().zip(expected) {
            assert_relative_eq!(*t, e);
        }
    }

    #[test]
    fn test_bh_not_monotonised() {
        // 0.03 fails its own threshold (0.025) even though 0.04 passes at rank 2
        let (significant, _) = benjamini_hochberg(&[0.03, 0.04, 0.9, 0.9], 0.1);
        assert_eq!(significant, vec![false, true, false, false]);
    }

    #[test]
    fn test_bh_ties_follow_input_order() {
        let (significant, thresholds) = benjamini_hochberg(&[0.05, 0.05, 0.05, 0.05], 0.1);
        assert_relative_eq!(thresholds[0], 0.025);
        assert_relative_eq!(thresholds[3], 0.1);
        assert_eq!(significant, vec![false, true, true, true]);
    }

    #[test]
    fn test_mask_all_zero() {
        let pvalues = Array2::<f64>::zeros((3, 4));
        for alpha in [1e-6, 0.05, 0.5] {
            assert!(fdr_mask(&pvalues, alpha).iter().all(|&s| s));
        }
    }

    #[test]
    fn test_mask_all_one() {
        let pvalues = Array2::<f64>::ones((3, 4));
        for alpha in [0.05, 0.5, 0.99] {
            assert!(fdr_mask(&pvalues, alpha).iter().all(|&s| !s));
        }
    }

    #[test]
    fn test_mask_flattens_row_major() {
        let pvalues = array![[0.01, 0.04], [0.03, 0.20]];
        let mask = fdr_mask(&pvalues, 0.1);
        assert_eq!(mask, array![[true, true], [true, false]]);

        // Tied p-values are ranked position by position
        let pvalues = array![[0.05, 0.9], [0.05, 0.9]];
        let mask = fdr_mask(&pvalues, 0.1);
        assert_eq!(mask, array![[false, false], [true, false]]);
    }

    #[test]
    fn test_adjusted_pvalues_shape() {
        let pvalues = array![[0.01, 0.04], [0.03, 0.20]];
        let adjusted = adjusted_pvalues(&pvalues);
        assert_eq!(adjusted.dim(), (2, 2));
        for (p, q) in pvalues.iter().zip(adjusted.iter()) {
            assert!(q >= p);
            assert!(*q <= 1.0);
        }
    }
}
