use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Largest value a DECIMAL(15,2) column holds.
pub const MAX_AMOUNT: f64 = 9_999_999_999_999.99;

/// Stored amounts are DECIMAL(15,2); every transport payload carries them as f64.
pub fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

pub fn from_f64(amount: f64) -> AppResult<Decimal> {
    if !amount.is_finite() {
        return Err(AppError::ValidationError("Amount must be a number".to_string()));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(AppError::ValidationError("Amount is out of range".to_string()));
    }
    Decimal::from_f64(amount)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::ValidationError("Amount is out of range".to_string()))
}

/// Positive amount with at most two decimals.
pub fn parse_positive_amount(amount: f64) -> AppResult<Decimal> {
    let value = from_f64(amount)?;
    if value <= Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

pub fn progress_percent(current: f64, target: f64) -> u8 {
    if target <= 0.0 {
        return 0;
    }
    ((current / target) * 100.0).clamp(0.0, 100.0).floor() as u8
}

/// "Rp 1.250.000"; rupiah are shown without a fractional part.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_roundtrip_keeps_cents() {
        let d = from_f64(1250000.5).unwrap();
        assert_eq!(d.to_string(), "1250000.5");
        assert_eq!(to_f64(d), 1250000.5);
    }

    #[test]
    fn test_parse_positive_amount() {
        assert!(parse_positive_amount(0.0).is_err());
        assert!(parse_positive_amount(-5.0).is_err());
        assert!(parse_positive_amount(f64::NAN).is_err());
        assert_eq!(parse_positive_amount(10.005).unwrap().scale(), 2);
    }

    #[test]
    fn test_amount_must_fit_the_column() {
        assert!(parse_positive_amount(9_999_999_999_999.0).is_ok());
        assert!(matches!(
            parse_positive_amount(1e16),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(from_f64(-1e20), Err(AppError::ValidationError(_))));
        assert!(from_f64(f64::MAX).is_err());
    }

    #[test]
    fn test_progress_percent_is_capped() {
        assert_eq!(progress_percent(50.0, 200.0), 25);
        assert_eq!(progress_percent(500.0, 200.0), 100);
        assert_eq!(progress_percent(10.0, 0.0), 0);
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(999.0), "Rp 999");
        assert_eq!(format_rupiah(1000.0), "Rp 1.000");
        assert_eq!(format_rupiah(1250000.0), "Rp 1.250.000");
    }
}
