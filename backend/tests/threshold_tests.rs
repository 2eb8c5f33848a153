//! Stock threshold classification tests
//!
//! Covers the four-way stock classification (normal / low / critical /
//! no stock), its boundary behavior, and threshold normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::StockStatus;
use shared::validation::normalize_thresholds;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_zero_stock_is_no_stock() {
        let status = StockStatus::classify(dec("0"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::NoStock);
    }

    #[test]
    fn test_negative_stock_is_no_stock() {
        // Should never happen in the database, but the classifier is total
        let status = StockStatus::classify(dec("-1"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::NoStock);
    }

    /// Stock exactly at the critical threshold classifies as critical
    #[test]
    fn test_critical_boundary_inclusive() {
        let status = StockStatus::classify(dec("5"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::Critical);
    }

    /// Stock exactly at the low threshold classifies as low
    #[test]
    fn test_low_boundary_inclusive() {
        let status = StockStatus::classify(dec("10"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::Low);
    }

    #[test]
    fn test_just_above_low_is_normal() {
        let status = StockStatus::classify(dec("10.01"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::Normal);
    }

    #[test]
    fn test_between_critical_and_low_is_low() {
        let status = StockStatus::classify(dec("7.5"), dec("10"), dec("5"));
        assert_eq!(status, StockStatus::Low);
    }

    /// Zero thresholds: any positive stock is normal, zero is no stock
    #[test]
    fn test_zero_thresholds() {
        assert_eq!(
            StockStatus::classify(dec("0.01"), dec("0"), dec("0")),
            StockStatus::Normal
        );
        assert_eq!(
            StockStatus::classify(dec("0"), dec("0"), dec("0")),
            StockStatus::NoStock
        );
    }

    #[test]
    fn test_alarming_statuses() {
        assert!(!StockStatus::Normal.is_alarming());
        assert!(StockStatus::Low.is_alarming());
        assert!(StockStatus::Critical.is_alarming());
        assert!(StockStatus::NoStock.is_alarming());
    }

    #[test]
    fn test_normalize_thresholds_clamps_critical() {
        let (low, critical, clamped) = normalize_thresholds(dec("10"), dec("15")).unwrap();
        assert_eq!(low, dec("10"));
        assert_eq!(critical, dec("10"));
        assert!(clamped);
    }

    #[test]
    fn test_normalize_thresholds_keeps_valid_pair() {
        let (low, critical, clamped) = normalize_thresholds(dec("10"), dec("4")).unwrap();
        assert_eq!(low, dec("10"));
        assert_eq!(critical, dec("4"));
        assert!(!clamped);
    }

    #[test]
    fn test_normalize_thresholds_rejects_negative() {
        assert!(normalize_thresholds(dec("-1"), dec("0")).is_err());
        assert!(normalize_thresholds(dec("10"), dec("-1")).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn decimal_in_range(min: i64, max: i64) -> impl Strategy<Value = Decimal> {
        (min * 100..=max * 100).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Classification is exhaustive: every input maps to exactly one class
        #[test]
        fn prop_classification_total(
            stock in decimal_in_range(-100, 1000),
            low in decimal_in_range(0, 500),
            critical in decimal_in_range(0, 500),
        ) {
            let critical = critical.min(low);
            let status = StockStatus::classify(stock, low, critical);

            let expected = if stock <= Decimal::ZERO {
                StockStatus::NoStock
            } else if stock <= critical {
                StockStatus::Critical
            } else if stock <= low {
                StockStatus::Low
            } else {
                StockStatus::Normal
            };
            prop_assert_eq!(status, expected);
        }

        /// Classification is monotone: more stock never yields a worse class
        #[test]
        fn prop_classification_monotone(
            stock in decimal_in_range(0, 1000),
            extra in decimal_in_range(0, 100),
            low in decimal_in_range(0, 500),
            critical in decimal_in_range(0, 500),
        ) {
            let critical = critical.min(low);
            let before = StockStatus::classify(stock, low, critical) as u8;
            let after = StockStatus::classify(stock + extra, low, critical) as u8;
            // Enum discriminants are ordered worst-to-best
            prop_assert!(after >= before);
        }

        /// Normalized thresholds always satisfy critical <= low
        #[test]
        fn prop_normalized_thresholds_ordered(
            low in decimal_in_range(0, 500),
            critical in decimal_in_range(0, 1000),
        ) {
            let (low, critical, _) = normalize_thresholds(low, critical).unwrap();
            prop_assert!(critical <= low);
        }
    }
}
