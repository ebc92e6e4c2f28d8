//! Read/write model JSON files.
//!
//! Model JSON is the "portable" representation of a fitted model:
//! - the four coefficients and fit diagnostics
//! - when it was generated
//! - a precomputed portion grid for quick plotting
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CalibrationTable, FitResult, ModelFile, ModelGrid};
use crate::error::{AppError, EXIT_INPUT};
use crate::models::predict;

/// Number of grid samples written to a model file.
pub const GRID_POINTS: usize = 101;

/// Write a model JSON file.
pub fn write_model_json(path: &Path, fit: &FitResult, table: &CalibrationTable) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to create model JSON '{}': {e}", path.display()),
        )
    })?;

    let model_file = build_model_file(fit, table);
    serde_json::to_writer_pretty(file, &model_file)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write model JSON: {e}")))?;

    log::info!("Exported model path={}", path.display());
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open model JSON '{}': {e}", path.display()),
        )
    })?;
    let model: ModelFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid model JSON: {e}")))?;
    Ok(model)
}

pub fn build_model_file(fit: &FitResult, table: &CalibrationTable) -> ModelFile {
    let (w_min, w_max) = weight_range(table);
    ModelFile {
        tool: "fedo".to_string(),
        generated_at: Utc::now(),
        degree: fit.model.degree(),
        model: fit.model,
        fit_quality: fit.quality.clone(),
        grid: build_grid(fit, w_min, w_max, GRID_POINTS),
    }
}

/// Weight range covered by the table, with a fallback for empty or one-point tables.
pub fn weight_range(table: &CalibrationTable) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in table.points() {
        lo = lo.min(p.weight_kg);
        hi = hi.max(p.weight_kg);
    }
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return (0.0, 100.0);
    }
    (lo, hi)
}

fn build_grid(fit: &FitResult, w_min: f64, w_max: f64, n: usize) -> ModelGrid {
    let n = n.max(2);
    let mut weight_kg = Vec::with_capacity(n);
    let mut portion_gr = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let w = w_min + u * (w_max - w_min);
        weight_kg.push(w);
        portion_gr.push(predict(w, Some(fit.model.coefficients())));
    }

    ModelGrid { weight_kg, portion_gr }
}
