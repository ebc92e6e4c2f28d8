//! Shared calculator state used by both CLI and TUI front-ends.
//!
//! One `Calculator` owns the calibration table and the fitted model. Each
//! lives behind its own reader/writer lock:
//!
//! - predictions hold the model read lock while evaluating
//! - a refit fits outside any model lock, then swaps the model under the
//!   write lock
//!
//! A prediction that starts before a refit finishes sees the old model; one
//! that starts after sees the new one.

use parking_lot::RwLock;

use crate::domain::{CalibrationTable, FitQuality, Model, TableError};
use crate::error::{FitError, PredictError};
use crate::fit::fit;
use crate::models;

#[derive(Debug, Clone, PartialEq)]
struct Fitted {
    model: Model,
    quality: FitQuality,
}

#[derive(Debug, Default)]
pub struct Calculator {
    table: RwLock<CalibrationTable>,
    model: RwLock<Option<Fitted>>,
}

impl Calculator {
    /// Take ownership of `table` and train the initial model.
    ///
    /// A failed initial fit is not fatal; the calculator starts without a
    /// model and predictions return the "no model" result.
    pub fn new(table: CalibrationTable) -> Self {
        let calc = Self {
            table: RwLock::new(table),
            model: RwLock::new(None),
        };
        let _ = calc.refit();
        calc
    }

    /// Refit from the current table and replace the model wholesale.
    ///
    /// On failure the previous model is discarded.
    pub fn refit(&self) -> Result<Model, FitError> {
        let outcome = {
            let table = self.table.read();
            fit(table.points())
        };

        let mut slot = self.model.write();
        match outcome {
            Ok(result) => {
                *slot = Some(Fitted {
                    model: result.model,
                    quality: result.quality,
                });
                Ok(result.model)
            }
            Err(err) => {
                *slot = None;
                Err(err)
            }
        }
    }

    /// Swap in a new table (e.g. an import) and refit.
    pub fn replace_table(&self, table: CalibrationTable) -> Result<Model, FitError> {
        *self.table.write() = table;
        self.refit()
    }

    /// Apply an edit to the table under the write lock, then refit.
    ///
    /// A rejected edit leaves both table and model untouched.
    pub fn edit_table<T>(
        &self,
        edit: impl FnOnce(&mut CalibrationTable) -> Result<T, TableError>,
    ) -> Result<(T, Result<Model, FitError>), TableError> {
        let value = {
            let mut table = self.table.write();
            edit(&mut table)?
        };
        Ok((value, self.refit()))
    }

    /// Snapshot of the calibration table.
    pub fn table(&self) -> CalibrationTable {
        self.table.read().clone()
    }

    /// Snapshot of the current model, if any.
    pub fn model(&self) -> Option<Model> {
        self.model.read().as_ref().map(|f| f.model)
    }

    /// Diagnostics of the current model, if any.
    pub fn quality(&self) -> Option<FitQuality> {
        self.model.read().as_ref().map(|f| f.quality.clone())
    }

    /// Portion for `weight`; `0.0` when no model is available.
    pub fn predict(&self, weight: f64) -> f64 {
        let guard = self.model.read();
        models::predict(weight, guard.as_ref().map(|f| f.model.coefficients()))
    }

    /// Portion for `weight`, or why there is none.
    pub fn try_predict(&self, weight: f64) -> Result<f64, PredictError> {
        let guard = self.model.read();
        models::try_predict(weight, guard.as_ref().map(|f| f.model.coefficients()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CalibrationPoint, default_table};

    fn pt(w: f64, d: f64) -> CalibrationPoint {
        CalibrationPoint {
            weight_kg: w,
            daily_gr: d,
        }
    }

    #[test]
    fn new_trains_initial_model() {
        let calc = Calculator::new(default_table());
        assert!(calc.model().is_some());
        assert!(calc.try_predict(20.0).unwrap() > 0.0);
    }

    #[test]
    fn empty_table_has_no_model() {
        let calc = Calculator::default();
        assert_eq!(calc.refit(), Err(FitError::NoData));
        assert_eq!(calc.predict(5.0), 0.0);
        assert!(calc.try_predict(5.0).is_err());
    }

    #[test]
    fn edit_replaces_model() {
        let calc = Calculator::new(default_table());
        let before = calc.model().unwrap();
        let (idx, refit) = calc.edit_table(|t| t.add(pt(90.0, 1000.0))).unwrap();
        assert_eq!(idx, 12);
        let after = refit.unwrap();
        assert_ne!(before, after);
        assert_eq!(calc.model(), Some(after));
    }

    #[test]
    fn rejected_edit_keeps_model() {
        let table = CalibrationTable::new(vec![pt(1.0, 30.0), pt(2.0, 50.0), pt(3.0, 70.0)]).unwrap();
        let calc = Calculator::new(table);
        let before = calc.model();
        let err = calc.edit_table(|t| t.delete(0)).unwrap_err();
        assert_eq!(err, TableError::MinimumRows { min: 3 });
        assert_eq!(calc.model(), before);
        assert_eq!(calc.table().len(), 3);
    }

    #[test]
    fn failed_refit_clears_model() {
        let calc = Calculator::new(default_table());
        let degenerate =
            CalibrationTable::new(vec![pt(5.0, 1.0), pt(5.0, 2.0), pt(5.0, 3.0), pt(5.0, 4.0)]).unwrap();
        assert!(matches!(calc.replace_table(degenerate), Err(FitError::FitFailed(_))));
        assert!(calc.model().is_none());
        assert_eq!(calc.predict(10.0), 0.0);
    }
}
