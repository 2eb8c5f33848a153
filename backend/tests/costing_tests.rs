//! Recipe costing and COGS tests
//!
//! Covers recipe unit cost, order-level COGS, gross profit, and the
//! round-at-the-end rule for currency amounts.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::recipe_unit_cost;
use shared::types::round_currency;

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

    /// Siopao: flour 0.1 kg @ 40/kg + pork 0.05 kg @ 200/kg = 14.00 per unit,
    /// so an order of 3 costs 42.00
    #[test]
    fn test_siopao_order_cogs() {
        let recipe = [(dec("40"), dec("0.1")), (dec("200"), dec("0.05"))];
        let unit_cost = recipe_unit_cost(&recipe);
        assert_eq!(unit_cost, dec("14.00"));

        let order_cogs = round_currency(unit_cost * dec("3"));
        assert_eq!(order_cogs, dec("42.00"));
    }

    /// Rounding happens once at the end, not per line
    #[test]
    fn test_round_at_end_not_per_line() {
        // Three lines of 1.005 each: exact sum 3.015 rounds to 3.02.
        // Rounding each line first would give 1.01 * 3 = 3.03.
        let lines = [dec("1.005"), dec("1.005"), dec("1.005")];

        let exact_total: Decimal = lines.iter().copied().sum();
        assert_eq!(round_currency(exact_total), dec("3.02"));

        let per_line_total: Decimal = lines.iter().map(|l| round_currency(*l)).sum();
        assert_eq!(per_line_total, dec("3.03"));
    }

    /// Midpoints round away from zero in both directions
    #[test]
    fn test_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec("2.345")), dec("2.35"));
        assert_eq!(round_currency(dec("-2.345")), dec("-2.35"));
    }

    /// A product with no recipe has zero material cost
    #[test]
    fn test_empty_recipe_costs_nothing() {
        assert_eq!(recipe_unit_cost(&[]), Decimal::ZERO);
    }

    /// Gross profit is sales minus COGS, each kept exact until the end
    #[test]
    fn test_gross_profit() {
        let unit_price = dec("25.00");
        let unit_cost = recipe_unit_cost(&[(dec("40"), dec("0.1")), (dec("200"), dec("0.05"))]);
        let quantity = dec("10");

        let sales = unit_price * quantity;
        let cogs = unit_cost * quantity;
        let profit = round_currency(sales - cogs);
        assert_eq!(profit, dec("110.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn cost_line() -> impl Strategy<Value = (Decimal, Decimal)> {
        (0i64..=50_000, 1i64..=1_000)
            .prop_map(|(cost, needed)| (Decimal::new(cost, 2), Decimal::new(needed, 2)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Unit cost is never negative and grows with quantities
        #[test]
        fn prop_unit_cost_monotone(lines in prop::collection::vec(cost_line(), 1..10)) {
            let base = recipe_unit_cost(&lines);
            prop_assert!(base >= Decimal::ZERO);

            let doubled: Vec<_> = lines
                .iter()
                .map(|(cost, needed)| (*cost, *needed * Decimal::from(2)))
                .collect();
            prop_assert!(recipe_unit_cost(&doubled) >= base);
        }

        /// Unit cost is additive over recipe lines
        #[test]
        fn prop_unit_cost_additive(
            a in prop::collection::vec(cost_line(), 1..5),
            b in prop::collection::vec(cost_line(), 1..5),
        ) {
            let combined: Vec<_> = a.iter().chain(b.iter()).copied().collect();
            prop_assert_eq!(
                recipe_unit_cost(&combined),
                recipe_unit_cost(&a) + recipe_unit_cost(&b)
            );
        }

        /// Rounding moves a value by at most half a cent
        #[test]
        fn prop_rounding_error_bounded(cents in -1_000_000i64..=1_000_000, frac in 0u32..=999) {
            let value = Decimal::new(cents, 2) + Decimal::new(frac as i64, 5);
            let rounded = round_currency(value);
            let diff = (rounded - value).abs();
            prop_assert!(diff <= Decimal::new(5, 3)); // 0.005
        }
    }
}
