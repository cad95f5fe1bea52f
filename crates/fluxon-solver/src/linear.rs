//! Dense linear algebra helpers.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Solve a linear system Ax = b using LU decomposition.
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    a.clone().lu().solve(b).ok_or(Error::SingularMatrix)
}

/// Weighted RMS norm used for step-size control.
///
/// Each component is scaled by `atol + rtol·max(|a|, |b|)`.
pub fn scaled_rms(err: &[f64], a: &[f64], b: &[f64], rtol: f64, atol: &[f64]) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(a.iter().zip(b))
        .zip(atol)
        .map(|((e, (x, y)), tol)| {
            let scale = tol + rtol * x.abs().max(y.abs());
            (e / scale).powi(2)
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_solve_simple() {
        // 2x + y = 5
        // x + 3y = 6
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let b = dvector![5.0, 6.0];

        let x = solve_dense(&a, &b).unwrap();

        assert!((x[0] - 1.8).abs() < 1e-10);
        assert!((x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_singular_matrix() {
        let a = dmatrix![1.0, 2.0; 2.0, 4.0];
        let b = dvector![1.0, 2.0];

        let result = solve_dense(&a, &b);
        assert!(matches!(result, Err(Error::SingularMatrix)));
    }

    #[test]
    fn test_scaled_rms() {
        let err = [1e-6, 0.0];
        let x = [1.0, 0.0];
        let atol = [0.0, 1.0];
        let norm = scaled_rms(&err, &x, &x, 1e-6, &atol);
        assert!((norm - (0.5f64).sqrt()).abs() < 1e-12);
        assert_eq!(scaled_rms(&[], &[], &[], 1e-6, &[]), 0.0);
    }
}
