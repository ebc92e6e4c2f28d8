//! Calibration table persistence.
//!
//! The on-disk format is a pretty-printed JSON array:
//!
//! ```json
//! [
//!   { "weight_kg": 1.0, "daily_gr": 30.0 }
//! ]
//! ```
//!
//! Every table read from disk or pasted in by the user goes through
//! [`parse_table_json`], so the engine only ever sees validated points.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::domain::{CalibrationPoint, CalibrationTable, default_table};
use crate::error::{AppError, EXIT_INPUT};

/// Parse and validate a table from JSON text.
pub fn parse_table_json(text: &str) -> Result<CalibrationTable, AppError> {
    let points: Vec<CalibrationPoint> = serde_json::from_str(text)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("JSON parsing error: {e}")))?;
    Ok(CalibrationTable::new(points)?)
}

/// Read a table file.
pub fn read_table(path: &Path) -> Result<CalibrationTable, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to read feeding data file '{}': {e}", path.display()),
        )
    })?;
    parse_table_json(&text)
}

/// Write a table file, creating parent directories as needed.
pub fn save_table(path: &Path, table: &CalibrationTable) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                EXIT_INPUT,
                format!("Failed to create data directory '{}': {e}", parent.display()),
            )
        })?;
    }

    let json = serde_json::to_string_pretty(table)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to marshal feeding data: {e}")))?;
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to write feeding data file '{}': {e}", path.display()),
        )
    })?;
    file.write_all(json.as_bytes())
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write feeding data: {e}")))?;

    log::info!("Saved feeding data count={}", table.len());
    Ok(())
}

/// Load the table at `path`, seeding it with the default guide if it does not exist yet.
pub fn load_or_init(path: &Path) -> Result<CalibrationTable, AppError> {
    if !path.exists() {
        let table = default_table();
        save_table(path, &table).inspect_err(|e| {
            log::error!("Failed to create initial feeding data file error={e}");
        })?;
        log::info!("Created initial feeding data file count={}", table.len());
        return Ok(table);
    }

    let table = read_table(path).inspect_err(|e| log::error!("Failed to load feeding data error={e}"))?;
    log::info!("Loaded feeding data count={}", table.len());
    Ok(table)
}
