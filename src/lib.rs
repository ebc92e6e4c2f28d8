//! `fedo` library crate.
//!
//! The binary (`fedo`) is a thin wrapper around this library so that:
//!
//! - the fit/predict engine is testable without spawning processes
//! - the CLI and the TUI share one calculator state and one set of messages
//!
//! The engine itself is two functions: [`fit::fit`] turns calibration points
//! into a cubic [`domain::Model`], and [`models::predict`] turns a weight and
//! a model into a portion.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod tui;

pub use app::Calculator;
pub use domain::{CalibrationPoint, CalibrationTable, FitResult, Model};
pub use error::{AppError, FitError, PredictError};
pub use fit::fit;
pub use models::{predict, try_predict};
