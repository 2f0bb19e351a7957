use crate::config::DashboardConfig;
use crate::dates::parse_sheet_date;
use crate::types::{NormalizedRow, RawRow};
use crate::util::{format_currency, parse_number};

/// Column sets that receive display formatting. A column named in more
/// than one set is treated as a date first, then a month, then currency.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionSpec<'a> {
    pub date_columns: &'a [String],
    pub month_columns: &'a [String],
    pub currency_columns: &'a [String],
}

impl<'a> ProjectionSpec<'a> {
    pub fn from_config(config: &'a DashboardConfig) -> Self {
        Self {
            date_columns: &config.date_columns,
            month_columns: &config.month_columns,
            currency_columns: &config.currency_columns,
        }
    }

    fn format_cell(&self, column: &str, value: &str) -> String {
        if self.date_columns.iter().any(|c| c == column) {
            format_date_cell(value)
        } else if self.month_columns.iter().any(|c| c == column) {
            format_month_cell(value)
        } else if self.currency_columns.iter().any(|c| c == column) {
            format_currency_cell(value)
        } else {
            value.to_string()
        }
    }
}

/// Project one row. Never fails: a cell that cannot be formatted keeps
/// its original text, and every column of the input survives.
pub fn project_row(index: usize, raw: &RawRow, spec: &ProjectionSpec<'_>) -> NormalizedRow {
    let cells = raw
        .cells
        .iter()
        .map(|(column, value)| (column.clone(), spec.format_cell(column, value)))
        .collect();
    NormalizedRow { index, cells }
}

pub fn project_rows(rows: &[RawRow], spec: &ProjectionSpec<'_>) -> Vec<NormalizedRow> {
    rows.iter()
        .enumerate()
        .map(|(idx, raw)| project_row(idx, raw, spec))
        .collect()
}

pub fn format_date_cell(value: &str) -> String {
    match parse_sheet_date(Some(value)) {
        Some(d) => d.to_date_string(),
        None => value.to_string(),
    }
}

pub fn format_month_cell(value: &str) -> String {
    match parse_sheet_date(Some(value)) {
        Some(d) => d.to_month_string(),
        None => value.to_string(),
    }
}

pub fn format_currency_cell(value: &str) -> String {
    match parse_number(Some(value)) {
        Some(n) => format_currency(n),
        None => value.to_string(),
    }
}
