//! Input checks shared by the services.

use ledgerly_shared::{AppError, AppResult};
use rust_decimal::Decimal;

/// Trimmed `value`, or `Validation` when it is blank.
pub(crate) fn non_empty(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Blank-checks an optional replacement value.
pub(crate) fn non_empty_opt(value: Option<&String>, field: &str) -> AppResult<Option<String>> {
    value.map(|v| non_empty(v, field)).transpose()
}

/// `Validation` unless `amount > 0`.
pub(crate) fn positive(amount: Decimal, field: &str) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  Cash ", "Name").unwrap(), "Cash");
        assert_eq!(
            non_empty("   ", "Name").unwrap_err(),
            AppError::Validation("Name is required".into())
        );
    }

    #[test]
    fn test_positive() {
        assert!(positive(dec!(0.01), "Amount").is_ok());
        assert!(positive(Decimal::ZERO, "Amount").is_err());
        assert!(positive(dec!(-5), "Amount").is_err());
    }
}
