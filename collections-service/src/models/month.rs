//! Calendar-month value types.
//!
//! Billing obligations are keyed by calendar month. `BillingMonth` replaces
//! the `"YYYY-MM"` strings of the persisted format with a proper value type;
//! the wire and storage representation is still the `"YYYY-MM"` string.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid billing month '{0}', expected YYYY-MM")]
pub struct ParseMonthError(String);

/// One calendar month, e.g. 2024-02.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1970..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of calendar days in this month, leap years included.
    pub fn days_in_month(&self) -> u32 {
        (28..=31u32)
            .rev()
            .find(|&d| NaiveDate::from_ymd_opt(self.year, self.month, d).is_some())
            .unwrap_or(28)
    }

    /// The given day-of-month clamped to this month's last day.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        BillingMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for BillingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BillingMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of billing months, e.g. a voucher covering 2024-01
/// through 2024-03.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub from: BillingMonth,
    pub to: BillingMonth,
}

impl MonthRange {
    pub fn new(from: BillingMonth, to: BillingMonth) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    pub fn single(month: BillingMonth) -> Self {
        Self {
            from: month,
            to: month,
        }
    }

    pub fn contains(&self, month: BillingMonth) -> bool {
        self.from <= month && month <= self.to
    }

    pub fn iter(&self) -> MonthIter {
        MonthIter {
            next: Some(self.from),
            end: self.to,
        }
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} to {}", self.from, self.to)
        }
    }
}

pub struct MonthIter {
    next: Option<BillingMonth>,
    end: BillingMonth,
}

impl Iterator for MonthIter {
    type Item = BillingMonth;

    fn next(&mut self) -> Option<BillingMonth> {
        let current = self.next?;
        self.next = (current < self.end).then(|| current.next());
        Some(current)
    }
}
