//! Cubic evaluation and portion prediction.
//!
//! The fitter and the predictor rely on two primitive operations:
//! - build a design row `[1, x, x², x³]` for a given weight (for OLS)
//! - evaluate `c0 + c1·x + c2·x² + c3·x³` for given coefficients
//!
//! Prediction adds one domain rule on top of evaluation: the fitted curve
//! describes a daily total, and the reported portion is half of it.

use crate::error::PredictError;

/// Polynomial degree of the portion model.
pub const DEGREE: usize = 3;

/// Number of coefficients (`DEGREE + 1`).
pub const COEFF_LEN: usize = DEGREE + 1;

/// The curve predicts a daily total; one portion is this fraction of it.
pub const PORTION_DIVISOR: f64 = 2.0;

/// Fill a design row for weight `x`.
///
/// # Panics
/// Panics if `out` is shorter than `COEFF_LEN`.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = x;
    out[2] = x * x;
    out[3] = x * x * x;
}

/// Evaluate the raw polynomial (before the portion rule).
///
/// # Panics
/// Panics if `coefficients` is shorter than `COEFF_LEN`.
pub fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients[0] + coefficients[1] * x + coefficients[2] * x * x + coefficients[3] * x * x * x
}

/// Portion for `weight`, or an explicit error when there is no usable model.
pub fn try_predict(weight: f64, coefficients: Option<&[f64]>) -> Result<f64, PredictError> {
    let coefficients = match coefficients {
        Some(c) if c.len() == COEFF_LEN => c,
        Some(c) => {
            return Err(PredictError::ModelUnavailable {
                coefficients: Some(c.len()),
            });
        }
        None => return Err(PredictError::ModelUnavailable { coefficients: None }),
    };

    let prediction = evaluate(coefficients, weight);
    log::debug!("Calculated portion size weight={weight} prediction={prediction}");

    Ok(prediction / PORTION_DIVISOR)
}

/// Portion for `weight`, with `0.0` standing in for "no model".
///
/// Callers that must tell a genuine zero apart from a missing model should
/// use [`try_predict`].
pub fn predict(weight: f64, coefficients: Option<&[f64]>) -> f64 {
    match try_predict(weight, coefficients) {
        Ok(portion) => portion,
        Err(_) => {
            log::warn!("Model not trained or invalid coefficients");
            0.0
        }
    }
}
