use crate::calendar::{day_status, CalendarIndex, DayStatus, MonthGrid};
use crate::config::StyleTable;
use crate::reports::ResolvedStatColumns;
use crate::types::{row_key, EventType, NormalizedRow, SortKey, StatLine, Statistics};
use crate::util::{format_currency, format_grouped, format_int};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

const ANSI_RESET: &str = "\u{1b}[0m";
pub const ROW_KEY_HEADER: &str = "key";
const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

static RIGHT_ALIGNED: Lazy<Regex> =
    Lazy::new(|| Regex::new("부수|가격|매출|페이지|지수|정가|예상월").expect("static regex"));

pub fn write_table_csv(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("Creating {:?}", path))?;
    wtr.write_record(headers)?;
    for r in rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).with_context(|| format!("Writing {:?}", path))?;
    Ok(())
}

pub fn render_rows<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut table = Table::new(rows.to_vec());
    table.with(Style::markdown());
    format!("{}\n", table)
}

/// Export rows for one year: a stable row key, then `columns`.
pub fn keyed_table_cells(
    rows: &[&NormalizedRow],
    columns: &[&str],
    title_column: &str,
    year: i32,
) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            let mut cells = Vec::with_capacity(columns.len() + 1);
            cells.push(row_key(r, title_column, year));
            cells.extend(columns.iter().map(|c| r.get(c).to_string()));
            cells
        })
        .collect()
}

/// One year group as a markdown table. `styles` is `Some` only when colour
/// output is wanted.
pub fn render_year_table(
    year: i32,
    rows: &[&NormalizedRow],
    columns: &[&str],
    sort: Option<&SortKey>,
    styles: Option<&StyleTable>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}년 계약 기준\n", year);
    if rows.is_empty() || columns.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| match sort {
        Some(key) if key.column == *c => format!("{} {}", c, key.direction.arrow()),
        _ => c.to_string(),
    }));
    for row in rows {
        builder.push_record(columns.iter().map(|c| {
            let value = row.get(c);
            match styles.and_then(|s| s.style_for(c, value)) {
                Some(token) => format!("{}{}{}", token.ansi_background(), value, ANSI_RESET),
                None => value.to_string(),
            }
        }));
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    for (idx, c) in columns.iter().enumerate() {
        if RIGHT_ALIGNED.is_match(c) {
            table.with(Modify::new(Columns::single(idx)).with(Alignment::right()));
        }
    }
    let _ = writeln!(out, "{}", table);
    out
}

pub fn statistics_lines(stats: &Statistics, cols: &ResolvedStatColumns) -> Vec<StatLine> {
    let line = |label: String, value: String| StatLine { label, value };
    vec![
        line("총 계약 건수".into(), format!("{}건", format_int(stats.count as u64))),
        line(format!("총 {}", cols.sales), format_currency(stats.total_sales)),
        line(
            format!("평균 {}", cols.price),
            format_currency(stats.rounded_average_price()),
        ),
        line(format!("최고 {}", cols.sales), format_currency(stats.max_sales)),
        line(format!("최저 {}", cols.sales), format_currency(stats.min_sales)),
        line(format!("최고 {}", cols.count), format!("{}권", format_grouped(stats.max_count))),
        line(format!("최저 {}", cols.count), format!("{}권", format_grouped(stats.min_count))),
    ]
}

pub fn render_statistics(year: i32, stats: &Statistics, cols: &ResolvedStatColumns) -> String {
    format!(
        "### {}년 주요 통계\n\n{}",
        year,
        render_rows(&statistics_lines(stats, cols))
    )
}

fn day_cell(grid: &MonthGrid, day: u32, index: &CalendarIndex, today: NaiveDate) -> String {
    let mut cell = match grid.date(day).map(|d| day_status(d, today)) {
        Some(DayStatus::Today) => format!("▶{}", day),
        Some(DayStatus::Past) => format!("·{}", day),
        _ => day.to_string(),
    };
    for entry in index.day_entries(grid.year, grid.month, day) {
        cell.push('\n');
        cell.push_str(entry.event_type.label());
    }
    cell
}

/// One month: the Sunday-first grid, then the month's titles per event.
pub fn render_month(grid: &MonthGrid, index: &CalendarIndex, today: NaiveDate) -> String {
    let mut out = String::new();
    let current = grid.year == today.year() && grid.month == today.month();
    let _ = writeln!(
        out,
        "## {}년 {}월{}\n",
        grid.year,
        grid.month,
        if current { " (이번 달)" } else { "" }
    );

    let mut builder = Builder::default();
    builder.push_record(WEEKDAYS.iter().map(|d| d.to_string()));
    for week in &grid.weeks {
        builder.push_record(week.iter().map(|slot| match slot {
            Some(day) => day_cell(grid, *day, index, today),
            None => String::new(),
        }));
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    let _ = writeln!(out, "{}\n", table);

    for event_type in [EventType::PreOrderDate, EventType::ReleaseDate] {
        let _ = writeln!(out, "{}", event_type.label());
        for title in index.month_titles(grid.year, grid.month, event_type) {
            let _ = writeln!(out, "- {}", title);
        }
    }
    out
}
