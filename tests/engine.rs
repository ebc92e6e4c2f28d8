//! End-to-end checks of the fit → predict flow through the public API.

use std::sync::Arc;
use std::thread;

use fedo::domain::default_table;
use fedo::{CalibrationPoint, CalibrationTable, Calculator, FitError, PredictError, fit, predict, try_predict};

fn pts(rows: &[(f64, f64)]) -> Vec<CalibrationPoint> {
    rows.iter()
        .map(|&(weight_kg, daily_gr)| CalibrationPoint { weight_kg, daily_gr })
        .collect()
}

#[test]
fn linear_data_predicts_half_of_fitted_value() {
    let points = pts(&[(1.0, 30.0), (2.0, 50.0), (3.0, 70.0), (4.0, 90.0), (5.0, 110.0)]);
    let result = fit(&points).unwrap();
    assert_eq!(result.model.coefficients().len(), 4);

    let portion = predict(3.0, Some(result.model.coefficients()));
    assert!((portion - 35.0).abs() < 1e-6, "portion {portion}");
}

#[test]
fn known_coefficients() {
    assert_eq!(predict(5.0, Some(&[1.0, 2.0, 3.0, 4.0])), 293.0);
}

#[test]
fn absent_or_malformed_model_is_zero() {
    assert_eq!(predict(5.0, None), 0.0);
    assert_eq!(predict(5.0, Some(&[1.0, 2.0])), 0.0);
    assert_eq!(
        try_predict(5.0, Some(&[1.0, 2.0])),
        Err(PredictError::ModelUnavailable { coefficients: Some(2) })
    );
}

#[test]
fn empty_fit_is_absent_and_small_fits_are_repeatable() {
    assert_eq!(fit(&[]), Err(FitError::NoData));

    let three = pts(&[(1.0, 30.0), (2.0, 50.0), (3.0, 70.0)]);
    let first = fit(&three);
    for _ in 0..5 {
        assert_eq!(fit(&three), first);
    }
}

#[test]
fn readers_and_writer_share_one_calculator() {
    let calc = Arc::new(Calculator::new(default_table()));
    let steep = CalibrationTable::new(pts(&[(1.0, 100.0), (2.0, 200.0), (3.0, 300.0), (4.0, 400.0), (5.0, 500.0)]))
        .unwrap();
    let old = calc.predict(3.0);
    let new = {
        let r = fit(steep.points()).unwrap();
        predict(3.0, Some(r.model.coefficients()))
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let calc = Arc::clone(&calc);
            thread::spawn(move || {
                for _ in 0..500 {
                    let p = calc.predict(3.0);
                    // Every read sees one complete model, old or new.
                    assert!((p - old).abs() < 1e-9 || (p - new).abs() < 1e-9, "torn read {p}");
                }
            })
        })
        .collect();

    let writer = {
        let calc = Arc::clone(&calc);
        thread::spawn(move || calc.replace_table(steep).unwrap())
    };

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert!((calc.predict(3.0) - new).abs() < 1e-9);
}
