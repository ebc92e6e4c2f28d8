//! Least squares solver.
//!
//! We solve one small problem per refit:
//!
//! ```text
//! minimize ||A·c - y||
//! ```
//!
//! Implementation choices:
//! - SVD handles tall, square and wide design matrices alike.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The numerical rank decides solvability: a matrix with fewer independent
//!   columns than `min(rows, cols)` is singular for our purposes and is
//!   rejected instead of being silently regularized.
//! - A wide system (fewer rows than columns) of full row rank yields the
//!   minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns a short reason when the system is singular, mis-shaped, or the
/// solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, String> {
    let (rows, cols) = x.shape();
    if rows != y.len() {
        return Err(format!(
            "design matrix has {rows} rows but target has {} entries",
            y.len()
        ));
    }
    if rows == 0 || cols == 0 {
        return Err("empty design matrix".to_string());
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err("non-finite value in inputs".to_string());
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = sigma_max * rows.max(cols) as f64 * f64::EPSILON;

    let required = rows.min(cols);
    let rank = svd.rank(tol);
    if rank < required {
        return Err(format!("singular design matrix (rank {rank} < {required})"));
    }

    let beta = svd.solve(y, tol).map_err(|e| e.to_string())?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err("solution is not finite".to_string());
    }

    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn duplicate_columns_are_singular() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = solve_least_squares(&x, &y).unwrap_err();
        assert!(err.contains("singular"), "{err}");
    }

    #[test]
    fn wide_system_returns_minimum_norm() {
        // One equation, two unknowns: c0 + c1 = 2 -> minimum norm is (1, 1).
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[2.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-12);
        assert!((beta[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_finite_and_mismatched_inputs() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, f64::NAN]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_least_squares(&x, &y).is_err());

        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0]);
        assert!(solve_least_squares(&x, &y).is_err());
    }
}
