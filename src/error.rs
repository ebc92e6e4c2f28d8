//! Error types.
//!
//! `AppError` is what the binary ultimately reports (message + process exit
//! code). The engine itself never produces an `AppError`; it reports through
//! the small typed errors below, which callers convert at the boundary.

use std::fmt;

/// Exit code for bad input, unreadable files, or invalid table edits.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for "nothing to work with" (no data, no model).
pub const EXIT_NO_MODEL: u8 = 3;
/// Exit code for numerical or terminal failures.
pub const EXIT_INTERNAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a fit produced no model.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// The calibration table was empty.
    NoData,
    /// The least-squares solve was singular, degenerate, or non-finite.
    FitFailed(String),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::NoData => write!(f, "No feeding data to train model."),
            FitError::FitFailed(reason) => write!(f, "Failed to train model: {reason}"),
        }
    }
}

impl std::error::Error for FitError {}

impl From<FitError> for AppError {
    fn from(value: FitError) -> Self {
        let code = match value {
            FitError::NoData => EXIT_NO_MODEL,
            FitError::FitFailed(_) => EXIT_INTERNAL,
        };
        AppError::new(code, value.to_string())
    }
}

/// Prediction was requested without a usable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictError {
    /// `coefficients` is the length of the rejected coefficient set, or
    /// `None` when no model was fitted at all.
    ModelUnavailable { coefficients: Option<usize> },
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::ModelUnavailable { coefficients: None } => write!(f, "Model not trained."),
            PredictError::ModelUnavailable {
                coefficients: Some(n),
            } => write!(f, "Model not trained: expected 4 coefficients, got {n}."),
        }
    }
}

impl std::error::Error for PredictError {}

impl From<PredictError> for AppError {
    fn from(value: PredictError) -> Self {
        AppError::new(EXIT_NO_MODEL, value.to_string())
    }
}
