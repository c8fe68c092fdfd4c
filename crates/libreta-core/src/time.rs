//! Billing periods
//!
//! A billing period runs from a fixed day of one calendar month up to the
//! day before that in the next month. Periods are keyed `"YYYY-MM"` after
//! the month they start in, so with the default start day of 6 the date
//! 2024-03-05 still belongs to `"2024-02"`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default first day of a billing period
pub const DEFAULT_CYCLE_START_DAY: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

/// Monthly billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCycle {
    start_day: u32,
}

impl Default for BillingCycle {
    fn default() -> Self {
        Self {
            start_day: DEFAULT_CYCLE_START_DAY,
        }
    }
}

impl BillingCycle {
    /// Create a cycle starting on `start_day`, clamped to 1..=28 so the
    /// day exists in every month
    pub fn new(start_day: u32) -> Self {
        Self {
            start_day: start_day.clamp(1, 28),
        }
    }

    /// First day of each period
    pub fn start_day(&self) -> u32 {
        self.start_day
    }

    /// Period key for a date.
    ///
    /// Days before the start day belong to the previous month's period,
    /// rolling back across the year boundary in January.
    pub fn period_key(&self, date: NaiveDate) -> String {
        let (mut year, mut month) = (date.year(), date.month());
        if date.day() < self.start_day {
            if month == 1 {
                year -= 1;
                month = 12;
            } else {
                month -= 1;
            }
        }
        format!("{:04}-{:02}", year, month)
    }

    /// First and last calendar day covered by a period
    pub fn period_range(&self, key: &str) -> Option<(NaiveDate, NaiveDate)> {
        let (year, month) = parse_period_key(key)?;
        let start = NaiveDate::from_ymd_opt(year, month, self.start_day)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let next_start = NaiveDate::from_ymd_opt(next_year, next_month, self.start_day)?;
        Some((start, next_start.pred_opt()?))
    }

    /// Check if a date falls inside the given period
    pub fn contains(&self, key: &str, date: NaiveDate) -> bool {
        self.period_key(date) == key
    }
}

/// Split a `"YYYY-MM"` key into year and month
pub fn parse_period_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Display label for a period key, e.g. `"2024-03"` -> `"Marzo 2024"`
pub fn period_label(key: &str) -> Option<String> {
    let (year, month) = parse_period_key(key)?;
    Some(format!("{} {}", MONTH_NAMES[(month - 1) as usize], year))
}

// ==================== Tests ====================
