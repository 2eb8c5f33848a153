//! Bill-of-materials arithmetic: producible units and recipe cost

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// How many whole units of a product can be produced from current stock.
///
/// Each line is `(current_stock, quantity_needed_per_unit)`. The result is
/// the bottleneck: the minimum of `floor(stock / needed)` across all lines.
/// A product with no recipe lines cannot be produced at all, so the result
/// is 0.
pub fn max_producible(lines: &[(Decimal, Decimal)]) -> i64 {
    let mut bottleneck: Option<i64> = None;
    for (stock, needed) in lines {
        if *needed <= Decimal::ZERO {
            continue;
        }
        let units = (*stock / *needed).floor().to_i64().unwrap_or(0).max(0);
        bottleneck = Some(match bottleneck {
            Some(current) => current.min(units),
            None => units,
        });
    }
    bottleneck.unwrap_or(0)
}

/// Raw-material cost of producing one unit of a product.
///
/// Each line is `(cost_per_unit, quantity_needed_per_unit)`. The sum is kept
/// exact; rounding happens only at the final display/aggregation point.
pub fn recipe_unit_cost(lines: &[(Decimal, Decimal)]) -> Decimal {
    lines
        .iter()
        .map(|(cost, needed)| *cost * *needed)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn single_ingredient_bottleneck() {
        // needs 2 per unit, 9 in stock -> 4 whole units
        assert_eq!(max_producible(&[(dec("9"), dec("2"))]), 4);
    }

    #[test]
    fn minimum_across_ingredients() {
        // A: floor(9/2) = 4, B: floor(12/5) = 2 -> 2
        assert_eq!(
            max_producible(&[(dec("9"), dec("2")), (dec("12"), dec("5"))]),
            2
        );
    }

    #[test]
    fn empty_recipe_produces_nothing() {
        assert_eq!(max_producible(&[]), 0);
    }

    #[test]
    fn fractional_quantities() {
        // 1.5 kg in stock, 0.1 kg per unit -> 15 units
        assert_eq!(max_producible(&[(dec("1.5"), dec("0.1"))]), 15);
    }

    #[test]
    fn unit_cost_sums_ingredient_costs() {
        // Flour 0.1 kg @ 40 + Pork 0.05 kg @ 200 = 4.00 + 10.00 = 14.00
        let cost = recipe_unit_cost(&[(dec("40"), dec("0.1")), (dec("200"), dec("0.05"))]);
        assert_eq!(cost, dec("14.00"));
    }
}
