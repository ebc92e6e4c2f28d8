//! Cubic least-squares fitting.
//!
//! Given calibration points `(x_i, y_i)` we build the design matrix with rows
//! `[1, x_i, x_i², x_i³]` and solve `minimize ||A·c - y||` for the four
//! coefficients. Row order follows point order.
//!
//! There is no retry and no fallback to a lower degree: a singular solve is a
//! failed fit. Fewer than four points are passed to the solver unchanged; it
//! returns the minimum-norm interpolant when the inputs are distinct.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CalibrationPoint, FitQuality, FitResult, Model};
use crate::error::FitError;
use crate::math::solve_least_squares;
use crate::models::{COEFF_LEN, DEGREE, evaluate, fill_design_row};

/// Fit the cubic portion model to `points`.
pub fn fit(points: &[CalibrationPoint]) -> Result<FitResult, FitError> {
    if points.is_empty() {
        log::warn!("No feeding data to train model");
        return Err(FitError::NoData);
    }

    let n = points.len();
    let mut design = DMatrix::<f64>::zeros(n, COEFF_LEN);
    let mut row = [0.0; COEFF_LEN];
    for (i, p) in points.iter().enumerate() {
        fill_design_row(p.weight_kg, &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }
    let target = DVector::from_iterator(n, points.iter().map(|p| p.daily_gr));

    let beta = solve_least_squares(&design, &target).map_err(|reason| {
        log::error!("Failed to train model error={reason}");
        FitError::FitFailed(reason)
    })?;

    let mut coefficients = [0.0; COEFF_LEN];
    for (slot, v) in coefficients.iter_mut().zip(beta.iter()) {
        *slot = *v;
    }
    let model = Model::new(coefficients);
    let quality = fit_quality(points, &model);

    log::info!("Trained polynomial regression model degree={DEGREE} data_points={n}");

    Ok(FitResult { model, quality })
}

/// Residual diagnostics of `model` on `points` (raw curve, not portions).
pub fn fit_quality(points: &[CalibrationPoint], model: &Model) -> FitQuality {
    let n = points.len();
    let sse: f64 = points
        .iter()
        .map(|p| {
            let r = p.daily_gr - evaluate(model.coefficients(), p.weight_kg);
            r * r
        })
        .sum();
    let rmse = if n > 0 { (sse / n as f64).sqrt() } else { 0.0 };

    let mean = if n > 0 {
        points.iter().map(|p| p.daily_gr).sum::<f64>() / n as f64
    } else {
        0.0
    };
    let sst: f64 = points.iter().map(|p| (p.daily_gr - mean).powi(2)).sum();
    let r_squared = (sst > 0.0).then(|| 1.0 - sse / sst);

    FitQuality {
        sse,
        rmse,
        r_squared,
        n,
    }
}
