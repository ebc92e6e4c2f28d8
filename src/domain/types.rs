//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and prediction
//! - persisted as the calibration table JSON
//! - exported as a model file and reloaded later for plotting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::COEFF_LEN;

/// One row of the feeding guide: a known body weight and its daily amount.
///
/// Field names match the on-disk JSON (`weight_kg`, `daily_gr`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub weight_kg: f64,
    pub daily_gr: f64,
}

impl CalibrationPoint {
    /// Build a point, rejecting non-finite or negative values.
    pub fn new(weight_kg: f64, daily_gr: f64) -> Result<Self, String> {
        let point = Self { weight_kg, daily_gr };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.weight_kg.is_finite() || self.weight_kg < 0.0 {
            return Err(format!("Invalid weight value: {}", self.weight_kg));
        }
        if !self.daily_gr.is_finite() || self.daily_gr < 0.0 {
            return Err(format!("Invalid daily grams value: {}", self.daily_gr));
        }
        Ok(())
    }
}

/// A fitted cubic `c0 + c1·x + c2·x² + c3·x³`.
///
/// Coefficients are stored in ascending power order. A model is never mutated
/// after construction; a refit produces a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Model {
    coefficients: [f64; COEFF_LEN],
}

impl Model {
    pub fn new(coefficients: [f64; COEFF_LEN]) -> Self {
        Self { coefficients }
    }

    /// Build a model from a slice, returning `None` unless it has exactly four entries.
    pub fn from_slice(coefficients: &[f64]) -> Option<Self> {
        let coefficients: [f64; COEFF_LEN] = coefficients.try_into().ok()?;
        Some(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Polynomial degree (fixed).
    pub fn degree(&self) -> usize {
        COEFF_LEN - 1
    }
}

/// Fit quality diagnostics computed on the calibration points.
///
/// Informational only; prediction never consults these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    /// Coefficient of determination. `None` when the outputs have zero variance.
    pub r_squared: Option<f64>,
    pub n: usize,
}

/// Output of a successful fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: Model,
    pub quality: FitQuality,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub degree: usize,
    pub model: Model,
    pub fit_quality: FitQuality,
    pub grid: ModelGrid,
}

/// Precomputed portions over the calibrated weight range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelGrid {
    pub weight_kg: Vec<f64>,
    pub portion_gr: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_rejects_negative_and_nan() {
        assert!(CalibrationPoint::new(5.5, 100.0).is_ok());
        assert!(CalibrationPoint::new(-1.0, 100.0).is_err());
        assert!(CalibrationPoint::new(1.0, f64::NAN).is_err());
        assert!(CalibrationPoint::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn model_from_slice_requires_four() {
        assert!(Model::from_slice(&[1.0, 2.0]).is_none());
        assert!(Model::from_slice(&[]).is_none());
        let m = Model::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.coefficients(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.degree(), 3);
    }

    #[test]
    fn point_json_field_names() {
        let p: CalibrationPoint = serde_json::from_str(r#"{"weight_kg": 5.5, "daily_gr": 100}"#).unwrap();
        assert_eq!(p, CalibrationPoint { weight_kg: 5.5, daily_gr: 100.0 });
    }
}
