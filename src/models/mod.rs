//! Cubic portion model.
//!
//! Kept as small, pure functions so the fitter and every caller of
//! prediction share exactly one definition of the polynomial.

pub mod cubic;

pub use cubic::*;
