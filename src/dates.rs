//! Date normalization for sheet cells.
//!
//! The sheet feed serializes date cells as `Date(YEAR,MONTH,DAY)` with a
//! zero-based month, and month-only cells as `Date(YEAR,MONTH)`. Cells typed
//! by hand show up as ordinary date strings. Everything here is total: bad
//! input yields `None`, which also stands for "not scheduled yet".

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Date\((\d{4}),(\d{1,2}),(\d{1,2})(?:,\d{1,2},\d{1,2},\d{1,2}(?:,\d{1,3})?)?\)$")
        .expect("static regex")
});

static MONTH_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Date\((\d{4}),(\d{1,2})\)$").expect("static regex"));

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A parsed sheet date: either a full calendar day or a year-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetDate {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl SheetDate {
    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            SheetDate::Day(d) => Some(*d),
            SheetDate::Month { .. } => None,
        }
    }

    /// `YYYY-MM-DD` for days, `YYYY-MM` when no day is known.
    pub fn to_date_string(&self) -> String {
        match self {
            SheetDate::Day(d) => d.format("%Y-%m-%d").to_string(),
            SheetDate::Month { .. } => self.to_month_string(),
        }
    }

    pub fn to_month_string(&self) -> String {
        match self {
            SheetDate::Day(d) => d.format("%Y-%m").to_string(),
            SheetDate::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }
}

/// Parse a cell into a [`SheetDate`].
pub fn parse_sheet_date(s: Option<&str>) -> Option<SheetDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = DAY_LITERAL.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month0: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month0 + 1, day).map(SheetDate::Day);
    }
    if let Some(caps) = MONTH_LITERAL.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month0: u32 = caps[2].parse().ok()?;
        return month_value(year, month0 + 1);
    }
    parse_fallback(s)
}

/// Only full calendar days; year-month values are dropped.
pub fn parse_calendar_day(s: Option<&str>) -> Option<NaiveDate> {
    parse_sheet_date(s).and_then(|d| d.as_day())
}

fn parse_fallback(s: &str) -> Option<SheetDate> {
    for fmt in DAY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(SheetDate::Day(d));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(SheetDate::Day(dt.date_naive()));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(SheetDate::Day(dt.date()));
        }
    }
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    month_value(year.parse().ok()?, month.parse().ok()?)
}

fn month_value(year: i32, month: u32) -> Option<SheetDate> {
    (1..=12)
        .contains(&month)
        .then_some(SheetDate::Month { year, month })
}
