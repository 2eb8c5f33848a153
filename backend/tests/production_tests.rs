//! Production capacity tests
//!
//! Covers the max-producible calculation: the bottleneck ingredient bounds
//! the whole recipe, and capacity times requirement never exceeds stock.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::max_producible;

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

    /// Whole units only: 9 on hand at 2 per unit makes 4, not 4.5
    #[test]
    fn test_floor_division() {
        assert_eq!(max_producible(&[(dec("9"), dec("2"))]), 4);
    }

    /// The scarcest ingredient bounds the recipe
    #[test]
    fn test_bottleneck_bounds_recipe() {
        let lines = [
            (dec("8"), dec("2")),  // supports 4
            (dec("10"), dec("5")), // supports 2
            (dec("100"), dec("1")),
        ];
        assert_eq!(max_producible(&lines), 2);
    }

    /// A product with no recipe rows cannot be produced
    #[test]
    fn test_empty_recipe_yields_zero() {
        assert_eq!(max_producible(&[]), 0);
    }

    /// Fractional requirements divide exactly
    #[test]
    fn test_fractional_requirement() {
        assert_eq!(max_producible(&[(dec("1.5"), dec("0.1"))]), 15);
    }

    /// An out-of-stock ingredient zeroes the whole recipe
    #[test]
    fn test_missing_ingredient_zeroes_capacity() {
        let lines = [(dec("100"), dec("1")), (dec("0"), dec("0.5"))];
        assert_eq!(max_producible(&lines), 0);
    }

    /// Exact multiples land on the boundary
    #[test]
    fn test_exact_multiple() {
        assert_eq!(max_producible(&[(dec("10"), dec("2.5"))]), 4);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn line() -> impl Strategy<Value = (Decimal, Decimal)> {
        (0i64..=100_000, 1i64..=1_000)
            .prop_map(|(stock, needed)| (Decimal::new(stock, 2), Decimal::new(needed, 2)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Producing the computed maximum never overdraws any ingredient
        #[test]
        fn prop_max_producible_is_feasible(lines in prop::collection::vec(line(), 1..10)) {
            let max = max_producible(&lines);
            let max_dec = Decimal::from(max);
            for (stock, needed) in &lines {
                prop_assert!(max_dec * needed <= *stock);
            }
        }

        /// The maximum is tight: one more unit overdraws some ingredient
        #[test]
        fn prop_max_producible_is_maximal(lines in prop::collection::vec(line(), 1..10)) {
            let max = max_producible(&lines);
            let one_more = Decimal::from(max + 1);
            let overdrawn = lines
                .iter()
                .any(|(stock, needed)| one_more * needed > *stock);
            prop_assert!(overdrawn);
        }

        /// Adding stock never reduces capacity
        #[test]
        fn prop_more_stock_never_hurts(
            lines in prop::collection::vec(line(), 1..10),
            extra in 0i64..=10_000,
        ) {
            let before = max_producible(&lines);
            let boosted: Vec<_> = lines
                .iter()
                .map(|(stock, needed)| (*stock + Decimal::new(extra, 2), *needed))
                .collect();
            prop_assert!(max_producible(&boosted) >= before);
        }
    }
}
