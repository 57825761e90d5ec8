//! Calendar-year query windows.

use chrono::{Datelike, NaiveDate};
use multiomics_common::error::{CensusError, Result};
use multiomics_common::keywords::DATE_FORMAT;

/// One publication-date window, Jan 1 through Dec 31 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl YearSpan {
    pub fn for_year(year: i32) -> Result<Self> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| CensusError::Config(format!("year {} out of range", year)))?;
        let until = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| CensusError::Config(format!("year {} out of range", year)))?;
        Ok(Self { from, until })
    }

    pub fn year(&self) -> i32 {
        self.from.year()
    }

    pub fn from_label(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn until_label(&self) -> String {
        self.until.format(DATE_FORMAT).to_string()
    }
}

/// Every year from `first_year` through `last_year`, ascending.
pub fn year_spans(first_year: i32, last_year: i32) -> Result<Vec<YearSpan>> {
    if first_year > last_year {
        return Err(CensusError::Config(format!(
            "first year {} is after last year {}",
            first_year, last_year
        )));
    }
    (first_year..=last_year).map(YearSpan::for_year).collect()
}
