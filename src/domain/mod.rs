//! Domain types used throughout the calculator.
//!
//! This module defines:
//!
//! - calibration points and the editable calibration table
//! - the fitted cubic model and its diagnostics
//! - the portable model file written by `fedo fit --export-model`

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
