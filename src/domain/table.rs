//! The editable calibration table.
//!
//! Row order is insertion order. It has no effect on the fit but is kept so
//! the table displays the way the user entered it.

use std::fmt;

use serde::Serialize;

use crate::domain::CalibrationPoint;
use crate::error::{AppError, EXIT_INPUT};

/// The table never shrinks below this many rows through `delete`.
pub const MIN_TABLE_ROWS: usize = 3;

/// A rejected table edit.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    MinimumRows { min: usize },
    IndexOutOfRange { index: usize, len: usize },
    InvalidPoint { index: usize, message: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MinimumRows { min } => {
                write!(f, "Cannot delete: minimum {min} records required")
            }
            TableError::IndexOutOfRange { index, len } => {
                write!(f, "Row {index} does not exist (table has {len} rows)")
            }
            TableError::InvalidPoint { index, message } => write!(f, "Row {index}: {message}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<TableError> for AppError {
    fn from(value: TableError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    points: Vec<CalibrationPoint>,
}

impl CalibrationTable {
    /// Build a table, validating every row.
    pub fn new(points: Vec<CalibrationPoint>) -> Result<Self, TableError> {
        for (index, p) in points.iter().enumerate() {
            p.validate()
                .map_err(|message| TableError::InvalidPoint { index, message })?;
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CalibrationPoint> {
        self.points.get(index)
    }

    pub fn add(&mut self, point: CalibrationPoint) -> Result<usize, TableError> {
        let index = self.points.len();
        point
            .validate()
            .map_err(|message| TableError::InvalidPoint { index, message })?;
        self.points.push(point);
        Ok(index)
    }

    /// Append a zeroed row for the user to fill in.
    pub fn add_blank(&mut self) -> usize {
        self.points.push(CalibrationPoint {
            weight_kg: 0.0,
            daily_gr: 0.0,
        });
        self.points.len() - 1
    }

    pub fn edit(&mut self, index: usize, point: CalibrationPoint) -> Result<(), TableError> {
        let len = self.points.len();
        point
            .validate()
            .map_err(|message| TableError::InvalidPoint { index, message })?;
        let slot = self
            .points
            .get_mut(index)
            .ok_or(TableError::IndexOutOfRange { index, len })?;
        *slot = point;
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<CalibrationPoint, TableError> {
        let len = self.points.len();
        if index >= len {
            return Err(TableError::IndexOutOfRange { index, len });
        }
        if len <= MIN_TABLE_ROWS {
            return Err(TableError::MinimumRows { min: MIN_TABLE_ROWS });
        }
        Ok(self.points.remove(index))
    }
}

/// The feeding guide a fresh install starts with.
pub fn default_table() -> CalibrationTable {
    const ROWS: [(f64, f64); 12] = [
        (1.0, 30.0),
        (2.25, 50.0),
        (4.5, 100.0),
        (9.0, 150.0),
        (13.5, 200.0),
        (18.0, 233.0),
        (27.0, 325.0),
        (36.0, 375.0),
        (45.0, 450.0),
        (57.0, 525.0),
        (68.0, 600.0),
        (79.0, 666.0),
    ];
    CalibrationTable {
        points: ROWS
            .iter()
            .map(|&(weight_kg, daily_gr)| CalibrationPoint { weight_kg, daily_gr })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(w: f64, d: f64) -> CalibrationPoint {
        CalibrationPoint {
            weight_kg: w,
            daily_gr: d,
        }
    }

    #[test]
    fn delete_refuses_below_minimum() {
        let mut table = CalibrationTable::new(vec![pt(1.0, 30.0), pt(2.0, 50.0), pt(3.0, 70.0), pt(4.0, 90.0)]).unwrap();
        assert_eq!(table.delete(1).unwrap(), pt(2.0, 50.0));
        assert_eq!(table.delete(0), Err(TableError::MinimumRows { min: 3 }));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn delete_out_of_range() {
        let mut table = default_table();
        let err = table.delete(12).unwrap_err();
        assert_eq!(err, TableError::IndexOutOfRange { index: 12, len: 12 });
    }

    #[test]
    fn edits_preserve_order() {
        let mut table = default_table();
        table.edit(0, pt(1.5, 40.0)).unwrap();
        let idx = table.add(pt(90.0, 700.0)).unwrap();
        assert_eq!(idx, 12);
        assert_eq!(table.get(0), Some(&pt(1.5, 40.0)));
        assert_eq!(table.points().last(), Some(&pt(90.0, 700.0)));
        assert_eq!(table.add_blank(), 13);
        assert_eq!(table.get(13), Some(&pt(0.0, 0.0)));
    }

    #[test]
    fn invalid_rows_are_rejected() {
        let mut table = default_table();
        assert!(matches!(
            table.edit(2, pt(-1.0, 10.0)),
            Err(TableError::InvalidPoint { index: 2, .. })
        ));
        assert!(CalibrationTable::new(vec![pt(1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn table_serializes_as_plain_array() {
        let table = CalibrationTable::new(vec![pt(1.0, 30.0)]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"weight_kg":1.0,"daily_gr":30.0}]"#);
    }
}
