//! Stock adjustment engine tests
//!
//! Exercises the pure rules behind stock adjustments: the non-negative
//! invariant, threshold-crossing detection, and expiration recomputation
//! on restock.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{expiration_date_after, StockStatus};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// An adjustment succeeds only when it keeps stock non-negative; a rejected
/// adjustment leaves stock unchanged. Mirrors the engine's accept/reject rule.
fn apply(stock: Decimal, change: Decimal) -> Result<Decimal, Decimal> {
    let next = stock + change;
    if next < Decimal::ZERO {
        Err(stock)
    } else {
        Ok(next)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use chrono::NaiveDate;

    /// Deducting almost everything leaves the remainder, classified critical
    #[test]
    fn test_deduction_to_critical() {
        let stock = apply(dec("50"), dec("-45")).unwrap();
        assert_eq!(stock, dec("5"));
        assert_eq!(
            StockStatus::classify(stock, dec("20"), dec("5")),
            StockStatus::Critical
        );
    }

    /// A deduction that would drive stock negative is rejected wholesale
    #[test]
    fn test_overdraw_rejected() {
        let stock = dec("5");
        let result = apply(stock, dec("-10"));
        assert_eq!(result, Err(dec("5")));
    }

    /// Deducting exactly to zero is allowed
    #[test]
    fn test_deduction_to_exactly_zero() {
        let stock = apply(dec("5"), dec("-5")).unwrap();
        assert_eq!(stock, Decimal::ZERO);
        assert_eq!(
            StockStatus::classify(stock, dec("20"), dec("5")),
            StockStatus::NoStock
        );
    }

    /// Crossing from normal into an alarming class is what fires an alert
    #[test]
    fn test_threshold_crossing_detection() {
        let low = dec("20");
        let critical = dec("5");

        let before = StockStatus::classify(dec("25"), low, critical);
        let after = StockStatus::classify(dec("15"), low, critical);
        assert_ne!(before, after);
        assert!(after.is_alarming());

        // Moving within the same class is not a crossing
        let before = StockStatus::classify(dec("15"), low, critical);
        let after = StockStatus::classify(dec("12"), low, critical);
        assert_eq!(before, after);
    }

    /// Restocking back above the low threshold returns to normal
    #[test]
    fn test_restock_recovers_status() {
        let low = dec("20");
        let critical = dec("5");
        let stock = apply(dec("3"), dec("47")).unwrap();
        assert_eq!(
            StockStatus::classify(stock, low, critical),
            StockStatus::Normal
        );
    }

    /// Expiration is anchored to the restock day, not the original receipt
    #[test]
    fn test_expiration_recomputed_from_restock_day() {
        let restock_day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(
            expiration_date_after(restock_day, Some(14)),
            NaiveDate::from_ymd_opt(2025, 6, 24)
        );
    }

    /// Non-perishables never get an expiration date
    #[test]
    fn test_non_perishable_has_no_expiration() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(expiration_date_after(day, None), None);
        assert_eq!(expiration_date_after(day, Some(0)), None);
        assert_eq!(expiration_date_after(day, Some(-3)), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn change() -> impl Strategy<Value = Decimal> {
        (-5000i64..=5000).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock never goes negative, whatever sequence of adjustments runs
        #[test]
        fn prop_stock_never_negative(
            initial in 0i64..=100_000,
            changes in prop::collection::vec(change(), 0..50),
        ) {
            let mut stock = Decimal::new(initial, 2);
            for c in changes {
                if let Ok(next) = apply(stock, c) {
                    stock = next;
                }
                prop_assert!(stock >= Decimal::ZERO);
            }
        }

        /// Final stock equals initial plus the sum of accepted changes only
        #[test]
        fn prop_ledger_consistency(
            initial in 0i64..=100_000,
            changes in prop::collection::vec(change(), 0..50),
        ) {
            let mut stock = Decimal::new(initial, 2);
            let mut accepted_sum = Decimal::ZERO;
            for c in changes {
                if let Ok(next) = apply(stock, c) {
                    stock = next;
                    accepted_sum += c;
                }
            }
            prop_assert_eq!(stock, Decimal::new(initial, 2) + accepted_sum);
        }

        /// A rejected adjustment is a no-op
        #[test]
        fn prop_rejection_leaves_stock_untouched(
            stock in 0i64..=10_000,
            overdraw in 1i64..=10_000,
        ) {
            let stock = Decimal::new(stock, 2);
            let change = -(stock + Decimal::new(overdraw, 2));
            prop_assert_eq!(apply(stock, change), Err(stock));
        }
    }
}
