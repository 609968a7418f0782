//! Cashflow and Platform Configuration
//!
//! Runtime-adjustable policy that lives inside the state document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::Amount;

/// Default daily disbursement cap (100,000.00)
pub const DEFAULT_DAILY_LIMIT: Amount = Amount::from_major(100_000);

/// Default minimum withdrawal (100.00)
pub const DEFAULT_MIN_WITHDRAWAL: Amount = Amount::from_major(100);

/// Default number of activity log entries kept
pub const DEFAULT_LOG_RETENTION: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashflowConfig {
    pub daily_limit: Amount,
    /// Approved payouts in the current accounting window
    pub today_spent: Amount,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for CashflowConfig {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
            today_spent: Amount::ZERO,
            start_date: None,
            end_date: None,
        }
    }
}

impl CashflowConfig {
    /// Start a fresh window if `today` is outside the current one
    ///
    /// Returns `true` when the window rolled.
    pub fn roll_to(&mut self, today: NaiveDate) -> bool {
        let inside = matches!(
            (self.start_date, self.end_date),
            (Some(start), Some(end)) if start <= today && today <= end
        );
        if inside {
            return false;
        }
        self.start_date = Some(today);
        self.end_date = Some(today);
        self.today_spent = Amount::ZERO;
        true
    }

    /// Record an approved disbursement (saturates; reporting only)
    pub fn record_spend(&mut self, amount: Amount, today: NaiveDate) {
        self.roll_to(today);
        self.today_spent = Amount::from_minor(self.today_spent.minor().saturating_add(amount.minor()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    pub min_withdrawal: Amount,
    pub log_retention: usize,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
            log_retention: DEFAULT_LOG_RETENTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cashflow = CashflowConfig::default();
        assert_eq!(cashflow.daily_limit, Amount::from_minor(10_000_000));
        assert_eq!(PlatformConfig::default().min_withdrawal, Amount::from_minor(10_000));
        assert_eq!(PlatformConfig::default().log_retention, 500);
    }

    #[test]
    fn test_spend_accumulates_within_day() {
        let mut cashflow = CashflowConfig::default();
        cashflow.record_spend(Amount::from_minor(300), day(1));
        cashflow.record_spend(Amount::from_minor(200), day(1));
        assert_eq!(cashflow.today_spent, Amount::from_minor(500));
        assert_eq!(cashflow.start_date, Some(day(1)));
    }

    #[test]
    fn test_first_spend_of_new_day_rolls() {
        let mut cashflow = CashflowConfig::default();
        cashflow.record_spend(Amount::from_minor(300), day(1));
        cashflow.record_spend(Amount::from_minor(50), day(2));
        assert_eq!(cashflow.today_spent, Amount::from_minor(50));
        assert_eq!(cashflow.start_date, Some(day(2)));
        assert_eq!(cashflow.end_date, Some(day(2)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let cashflow: CashflowConfig = serde_json::from_str(r#"{"todaySpent": 5}"#).unwrap();
        assert_eq!(cashflow.daily_limit, DEFAULT_DAILY_LIMIT);
        assert_eq!(cashflow.today_spent, Amount::from_minor(5));
    }
}
