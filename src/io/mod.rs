//! Input/output helpers.
//!
//! - calibration table JSON load/save/import (`table`)
//! - fitted model JSON read/write (`model`)

pub mod model;
pub mod table;

pub use model::*;
pub use table::*;
