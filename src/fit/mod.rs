//! Model fitting.
//!
//! Responsibilities:
//!
//! - turn calibration points into a cubic least-squares problem
//! - report the fitted model together with residual diagnostics

pub mod fitter;

pub use fitter::*;
