//! Caller-side checks on a user's weight query.
//!
//! The predictor accepts any number; range limits and display rounding
//! belong to whoever is asking.

use crate::config::{WEIGHT_MAX_KG, WEIGHT_MIN_KG};

/// Parse a weight typed by the user.
pub fn parse_weight(text: &str) -> Result<f64, String> {
    let trimmed = text.trim();
    let weight: f64 = trimmed
        .parse()
        .map_err(|_| format!("Invalid weight: {trimmed}"))?;
    check_weight(weight)
}

/// Reject weights outside the open range `(0, 100)` kg.
pub fn check_weight(weight: f64) -> Result<f64, String> {
    if !weight.is_finite() || weight <= WEIGHT_MIN_KG || weight >= WEIGHT_MAX_KG {
        return Err(format!(
            "Weight must be greater than {WEIGHT_MIN_KG} and less than {WEIGHT_MAX_KG} kg."
        ));
    }
    Ok(weight)
}

/// Round a portion to two decimals for display.
pub fn round_portion(portion: f64) -> f64 {
    (portion * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_bounds_weights() {
        assert_eq!(parse_weight(" 12.5 "), Ok(12.5));
        assert_eq!(parse_weight("abc"), Err("Invalid weight: abc".to_string()));
        assert_eq!(
            parse_weight("0"),
            Err("Weight must be greater than 0 and less than 100 kg.".to_string())
        );
        assert!(parse_weight("100").is_err());
        assert!(parse_weight("-3").is_err());
        assert!(parse_weight("NaN").is_err());
        assert!(check_weight(99.99).is_ok());
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_portion(126.4567), 126.46);
        assert_eq!(round_portion(0.004), 0.0);
    }
}
