use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A `YYYY-MM` token identifying a calendar month. Used as the grouping key
/// for budgets and alert-deduplication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthToken {
    pub year: i32,
    pub month: u32,
}

impl MonthToken {
    pub fn new(year: i32, month: u32) -> Option<MonthToken> {
        if (1..=12).contains(&month) {
            Some(MonthToken { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> MonthToken {
        MonthToken {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn succ(&self) -> MonthToken {
        if self.month == 12 {
            MonthToken {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthToken {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthToken {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| format!("invalid month token `{value}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in month token `{value}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in month token `{value}`"))?;
        MonthToken::new(year, month).ok_or_else(|| format!("month out of range in `{value}`"))
    }
}

impl Serialize for MonthToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
