//! Elapsed-time fraction of the current reporting period (a calendar month).

use chrono::{Datelike, NaiveDate};

/// How far through a period the current date falls, stored as a fraction in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeProgress {
    fraction: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeProgressError {
    #[error("Elapsed time {0} is outside the period")]
    OutOfRange(f64),
}

impl TimeProgress {
    pub fn from_fraction(fraction: f64) -> Result<Self, TimeProgressError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(TimeProgressError::OutOfRange(fraction));
        }
        Ok(Self { fraction })
    }

    pub fn from_percent(percent: f64) -> Result<Self, TimeProgressError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(TimeProgressError::OutOfRange(percent));
        }
        Ok(Self { fraction: percent / 100.0 })
    }

    /// Day of month over the month's length: the 15th of a 30-day month is 50%
    pub fn for_month(date: NaiveDate) -> Self {
        let days = days_in_month(date.year(), date.month());
        Self {
            fraction: date.day() as f64 / days as f64,
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }

    /// True at the very start of the period, where projections are undefined
    pub fn is_period_start(&self) -> bool {
        self.fraction == 0.0
    }
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
