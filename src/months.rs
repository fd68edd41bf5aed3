use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month {0:?}, expected YYYY-MM")]
pub struct MonthParseError(String);

/// A calendar month, written `YYYY-MM` on the wire and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub const fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The month before this one.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// The fetchable months of an archive, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthSequence {
    months: Vec<YearMonth>,
}

impl MonthSequence {
    /// Every month from `now`'s month back to `start`, both inclusive.
    ///
    /// `now` is passed in rather than read from the clock so the sequence
    /// is reproducible. A `start` later than `now` yields an empty sequence.
    pub fn generate(now: NaiveDate, start: YearMonth) -> Self {
        let newest = YearMonth::from_date(now);
        let mut months = Vec::new();
        if start > newest {
            return Self { months };
        }

        let span = newest.ordinal() - start.ordinal() + 1;
        months.reserve(span as usize);
        let mut cursor = newest;
        while cursor >= start {
            months.push(cursor);
            cursor = cursor.pred();
        }
        Self { months }
    }

    pub fn first(&self) -> Option<YearMonth> {
        self.months.first().copied()
    }

    /// The month that follows `month` in display order (the next older one).
    pub fn next_after(&self, month: YearMonth) -> Option<YearMonth> {
        let older = month.pred();
        self.contains(older).then_some(older)
    }

    pub fn contains(&self, month: YearMonth) -> bool {
        // Sorted descending, so binary search on the reversed ordering.
        self.months
            .binary_search_by(|probe| month.cmp(probe))
            .is_ok()
    }

    pub fn position(&self, month: YearMonth) -> Option<usize> {
        self.months.binary_search_by(|probe| month.cmp(probe)).ok()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<YearMonth> {
        self.months.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.months.iter().copied()
    }
}
