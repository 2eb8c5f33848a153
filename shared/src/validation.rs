//! Validation utilities for the Kitchen Back Office
//!
//! Field-level checks shared by item, product, and recipe inputs.

use rust_decimal::Decimal;

/// Maximum length accepted for names (items, products, categories, units)
pub const MAX_NAME_LENGTH: usize = 120;

/// Validate a display name: non-blank after trimming, bounded length
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be blank");
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err("Name is too long");
    }
    Ok(())
}

/// Validate a quantity that must be strictly positive (recipe quantities)
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate an amount that must not be negative (stock, cost, thresholds)
pub fn validate_non_negative(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Normalize a low/critical threshold pair.
///
/// Both thresholds must be non-negative. A critical threshold above the low
/// threshold is clamped down to equal it; the returned flag reports whether
/// clamping happened so the caller can log it.
pub fn normalize_thresholds(
    low: Decimal,
    critical: Decimal,
) -> Result<(Decimal, Decimal, bool), &'static str> {
    if low < Decimal::ZERO || critical < Decimal::ZERO {
        return Err("Thresholds cannot be negative");
    }
    if critical > low {
        Ok((low, low, true))
    } else {
        Ok((low, critical, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Flour").is_ok());
    }

    #[test]
    fn recipe_quantities_must_be_positive() {
        assert!(validate_positive_quantity(Decimal::ZERO).is_err());
        assert!(validate_positive_quantity(Decimal::from(-1)).is_err());
        assert!(validate_positive_quantity(Decimal::ONE).is_ok());
    }

    #[test]
    fn critical_clamped_to_low() {
        let (low, critical, clamped) =
            normalize_thresholds(Decimal::from(20), Decimal::from(30)).unwrap();
        assert_eq!(low, Decimal::from(20));
        assert_eq!(critical, Decimal::from(20));
        assert!(clamped);
    }

    #[test]
    fn valid_pair_untouched() {
        let (low, critical, clamped) =
            normalize_thresholds(Decimal::from(20), Decimal::from(5)).unwrap();
        assert_eq!(low, Decimal::from(20));
        assert_eq!(critical, Decimal::from(5));
        assert!(!clamped);
    }

    #[test]
    fn negative_thresholds_rejected() {
        assert!(normalize_thresholds(Decimal::from(-1), Decimal::ZERO).is_err());
    }
}
