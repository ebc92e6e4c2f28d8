//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (CLI and TUI print the same messages)

use crate::app::query::round_portion;
use crate::domain::{CalibrationTable, FitQuality, Model, ModelFile};

/// The result line shown for a successful query.
pub fn format_portion(weight: f64, portion: f64) -> String {
    format!(
        "For a dog weighing {weight:.2} kg, the portion size is {:.2} grams.",
        round_portion(portion)
    )
}

/// Numbered listing of the calibration table.
pub fn format_table(table: &CalibrationTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>4}  {:>12}  {:>12}\n", "#", "weight (kg)", "daily (g)"));
    for (idx, p) in table.points().iter().enumerate() {
        out.push_str(&format!("{idx:>4}  {:>12.2}  {:>12.2}\n", p.weight_kg, p.daily_gr));
    }
    out.push_str(&format!("{} rows\n", table.len()));
    out
}

/// Coefficients and diagnostics of a fit.
pub fn format_fit_summary(model: &Model, quality: &FitQuality) -> String {
    let mut out = String::new();

    out.push_str("=== fedo - portion model ===\n");
    out.push_str(&format!("Degree: {} | points: {}\n", model.degree(), quality.n));
    out.push_str(&format!("Coefficients: {}\n", fmt_vec(model.coefficients())));
    out.push_str(&format!(
        "SSE={:.3} RMSE={:.3}g R²={}\n",
        quality.sse,
        quality.rmse,
        quality
            .r_squared
            .map(|r| format!("{r:.5}"))
            .unwrap_or_else(|| "-".to_string()),
    ));

    out
}

/// Tabulate a stored model grid, thinned to at most `rows` lines.
pub fn format_model_grid(file: &ModelFile, rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} model (degree {}) generated {}\n",
        file.tool,
        file.degree,
        file.generated_at.to_rfc3339()
    ));
    out.push_str(&format!("Coefficients: {}\n", fmt_vec(file.model.coefficients())));
    out.push_str(&format!("{:>12}  {:>12}\n", "weight (kg)", "portion (g)"));

    let n = file.grid.weight_kg.len().min(file.grid.portion_gr.len());
    if n == 0 {
        return out;
    }
    let step = n.div_ceil(rows.max(1)).max(1);
    let mut idx = 0;
    while idx < n {
        out.push_str(&format!(
            "{:>12.2}  {:>12.2}\n",
            file.grid.weight_kg[idx], file.grid.portion_gr[idx]
        ));
        idx += step;
    }
    if (n - 1) % step != 0 {
        out.push_str(&format!(
            "{:>12.2}  {:>12.2}\n",
            file.grid.weight_kg[n - 1],
            file.grid.portion_gr[n - 1]
        ));
    }
    out
}

pub fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}
