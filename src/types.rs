use std::collections::HashMap;

use serde::Serialize;
use tabled::Tabled;

/// One spreadsheet record, keyed by column label, exactly as the feed sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRow {
    pub cells: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Header labels plus the body rows of one fetch.
#[derive(Debug, Clone, Default)]
pub struct SheetSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A [`RawRow`] with display formatting applied. `index` is the row's
/// position in the feed and doubles as its natural identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub index: usize,
    pub cells: HashMap<String, String>,
}

impl NormalizedRow {
    /// Missing columns read as the empty string.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn has_value(&self, column: &str) -> bool {
        !self.get(column).trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    PreOrderDate,
    ReleaseDate,
}

impl EventType {
    pub fn label(&self) -> &'static str {
        match self {
            EventType::PreOrderDate => "예판일",
            EventType::ReleaseDate => "하판일",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub event_type: EventType,
    pub title: String,
}

/// Rows sharing one contract year, in feed order.
#[derive(Debug, Clone)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub rows: Vec<&'a NormalizedRow>,
}

/// Stable render key built from title, year and feed position.
pub fn row_key(row: &NormalizedRow, title_column: &str, year: i32) -> String {
    let title = row.get(title_column).trim();
    let title = if title.is_empty() { "no-title" } else { title };
    format!("{}-{}-{}", title, year, row.index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Per-year aggregate over one [`YearGroup`]. Recomputed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub total_sales: f64,
    pub average_price: f64,
    pub max_sales: f64,
    pub min_sales: f64,
    pub max_count: f64,
    pub min_count: f64,
}

impl Statistics {
    pub fn rounded_average_price(&self) -> f64 {
        self.average_price.round()
    }
}

#[derive(Debug, Serialize)]
pub struct YearStatistics {
    pub year: i32,
    pub sales_column: String,
    pub price_column: String,
    pub count_column: String,
    #[serde(flatten)]
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Tabled)]
pub struct StatLine {
    #[tabled(rename = "항목")]
    pub label: String,
    #[tabled(rename = "값")]
    pub value: String,
}
