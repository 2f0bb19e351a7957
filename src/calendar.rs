//! Calendar view data: which titles pre-order or release on which day, and
//! the Sunday-first month grids used to lay them out.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates::parse_calendar_day;
use crate::types::{CalendarEntry, EventType, NormalizedRow};

/// Calendar key for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

pub type DayEntries = BTreeMap<u32, Vec<CalendarEntry>>;

/// Columns feeding the calendar.
#[derive(Debug, Clone, Copy)]
pub struct CalendarColumns<'a> {
    pub title: &'a str,
    pub pre_order: &'a str,
    pub release: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarIndex {
    months: BTreeMap<MonthKey, DayEntries>,
    years: Vec<i32>,
}

impl CalendarIndex {
    pub fn build(rows: &[NormalizedRow], columns: &CalendarColumns<'_>) -> Self {
        let mut months: BTreeMap<MonthKey, DayEntries> = BTreeMap::new();
        let mut years = BTreeSet::new();
        let sources = [
            (columns.pre_order, EventType::PreOrderDate),
            (columns.release, EventType::ReleaseDate),
        ];
        for row in rows {
            let title = row.get(columns.title).trim();
            if title.is_empty() {
                continue;
            }
            for (column, event_type) in sources {
                let Some(date) = parse_calendar_day(Some(row.get(column))) else {
                    continue;
                };
                years.insert(date.year());
                let key = MonthKey {
                    year: date.year(),
                    month: date.month(),
                };
                months
                    .entry(key)
                    .or_default()
                    .entry(date.day())
                    .or_default()
                    .push(CalendarEntry {
                        event_type,
                        title: title.to_string(),
                    });
            }
        }
        Self {
            months,
            years: years.into_iter().rev().collect(),
        }
    }

    /// Distinct years, most recent first.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn month(&self, year: i32, month: u32) -> Option<&DayEntries> {
        self.months.get(&MonthKey { year, month })
    }

    pub fn months(&self) -> impl Iterator<Item = (&MonthKey, &DayEntries)> {
        self.months.iter()
    }

    pub fn day_entries(&self, year: i32, month: u32, day: u32) -> &[CalendarEntry] {
        self.month(year, month)
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Titles of one event type in a month, in day order.
    pub fn month_titles(&self, year: i32, month: u32, event_type: EventType) -> Vec<&str> {
        self.month(year, month)
            .into_iter()
            .flat_map(|days| days.values().flatten())
            .filter(|e| e.event_type == event_type)
            .map(|e| e.title.as_str())
            .collect()
    }

    pub fn export(&self) -> CalendarExport<'_> {
        CalendarExport {
            years: &self.years,
            months: self
                .months
                .iter()
                .map(|(key, days)| MonthExport {
                    month: key.to_string(),
                    days,
                })
                .collect(),
        }
    }

    /// The current year when present, otherwise the most recent one.
    pub fn default_year(&self, today: NaiveDate) -> Option<i32> {
        if self.years.contains(&today.year()) {
            Some(today.year())
        } else {
            self.years.first().copied()
        }
    }
}

/// JSON shape of the index; month keys are rendered as `year-month`.
#[derive(Debug, Serialize)]
pub struct CalendarExport<'a> {
    pub years: &'a [i32],
    pub months: Vec<MonthExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MonthExport<'a> {
    pub month: String,
    pub days: &'a DayEntries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Past,
    Today,
    Upcoming,
}

pub fn day_status(date: NaiveDate, today: NaiveDate) -> DayStatus {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => DayStatus::Past,
        std::cmp::Ordering::Equal => DayStatus::Today,
        std::cmp::Ordering::Greater => DayStatus::Upcoming,
    }
}

/// One month laid out Sunday-first; `None` pads the first and last week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<u32>; 7]>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = days_in_month(first)?;
        let offset = first.weekday().num_days_from_sunday() as usize;
        let mut weeks = Vec::new();
        let mut week = [None; 7];
        for day in 1..=days {
            let slot = (offset + day as usize - 1) % 7;
            week[slot] = Some(day);
            if slot == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }
        Some(Self { year, month, weeks })
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    Some(next.pred_opt()?.day())
}
