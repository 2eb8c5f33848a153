//! Stock level classification and expiration derivation
//!
//! Stock status is never stored. It is always derived from the persisted
//! stock quantity and the item's thresholds so it can never go stale when
//! either side changes.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived urgency classification of a stock quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    NoStock,
    Critical,
    Low,
    Normal,
}

impl StockStatus {
    /// Classify a stock quantity against its low/critical thresholds.
    ///
    /// Equality favors the more severe category: stock exactly at the
    /// critical threshold is `Critical`, not `Low`.
    pub fn classify(stock: Decimal, low: Decimal, critical: Decimal) -> Self {
        if stock <= Decimal::ZERO {
            StockStatus::NoStock
        } else if stock <= critical {
            StockStatus::Critical
        } else if stock <= low {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }

    /// Whether this status should raise a replenishment notification
    pub fn is_alarming(&self) -> bool {
        !matches!(self, StockStatus::Normal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::NoStock => "no_stock",
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Normal => "normal",
        }
    }

    /// Human-readable label used in notification titles
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::NoStock => "out of stock",
            StockStatus::Critical => "critically low",
            StockStatus::Low => "running low",
            StockStatus::Normal => "at a normal level",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock as a percentage of the low threshold, for dashboard indicators.
///
/// Returns `None` when the low threshold is zero (no meaningful ratio).
pub fn stock_percent_of_low(stock: Decimal, low: Decimal) -> Option<Decimal> {
    if low <= Decimal::ZERO {
        return None;
    }
    Some(stock / low * Decimal::from(100))
}

/// Compute an expiration date from a shelf-life setting.
///
/// The anchor is the day the recomputation happens (freshly received stock),
/// not the original received date. A zero or negative shelf life means the
/// item does not expire.
pub fn expiration_date_after(anchor: NaiveDate, expiration_days: Option<i32>) -> Option<NaiveDate> {
    match expiration_days {
        Some(days) if days > 0 => anchor.checked_add_days(Days::new(days as u64)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn zero_stock_is_no_stock_regardless_of_thresholds() {
        assert_eq!(
            StockStatus::classify(dec(0), dec(20), dec(5)),
            StockStatus::NoStock
        );
        assert_eq!(
            StockStatus::classify(dec(0), dec(0), dec(0)),
            StockStatus::NoStock
        );
    }

    #[test]
    fn boundary_equality_is_severe() {
        // Exactly at critical -> Critical, not Low
        assert_eq!(
            StockStatus::classify(dec(5), dec(20), dec(5)),
            StockStatus::Critical
        );
        // Exactly at low -> Low, not Normal
        assert_eq!(
            StockStatus::classify(dec(20), dec(20), dec(5)),
            StockStatus::Low
        );
    }

    #[test]
    fn above_low_is_normal() {
        assert_eq!(
            StockStatus::classify(dec(21), dec(20), dec(5)),
            StockStatus::Normal
        );
    }

    #[test]
    fn expiration_anchored_to_given_day() {
        let anchor = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            expiration_date_after(anchor, Some(7)),
            NaiveDate::from_ymd_opt(2025, 3, 8)
        );
        assert_eq!(expiration_date_after(anchor, Some(0)), None);
        assert_eq!(expiration_date_after(anchor, None), None);
    }
}
