use crate::config::StatisticsColumns;
use crate::types::{NormalizedRow, SortDirection, SortKey, Statistics, YearGroup};
use crate::util::{average, extract_year, number_or_zero, parse_number};
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Partition titled rows by the year found in `contract_column`, most
/// recent year first. Rows keep feed order within their group.
pub fn group_by_year<'a>(
    rows: &'a [NormalizedRow],
    title_column: &str,
    contract_column: &str,
) -> Vec<YearGroup<'a>> {
    let mut map: BTreeMap<i32, Vec<&'a NormalizedRow>> = BTreeMap::new();
    for r in rows.iter().filter(|r| r.has_value(title_column)) {
        if let Some(year) = extract_year(r.get(contract_column)) {
            map.entry(year).or_default().push(r);
        }
    }
    map.into_iter()
        .rev()
        .map(|(year, rows)| YearGroup { year, rows })
        .collect()
}

enum SortValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

fn sort_value(s: &str) -> SortValue<'_> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return SortValue::Missing;
    }
    match parse_number(Some(trimmed)) {
        Some(n) => SortValue::Number(n),
        None => SortValue::Text(trimmed),
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ascending cell order: blanks, then numbers by value, then text.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    use SortValue::*;
    match (sort_value(a), sort_value(b)) {
        (Missing, Missing) => Ordering::Equal,
        (Missing, _) => Ordering::Less,
        (_, Missing) => Ordering::Greater,
        (Number(x), Number(y)) => x.total_cmp(&y),
        (Number(_), Text(_)) => Ordering::Less,
        (Text(_), Number(_)) => Ordering::Greater,
        (Text(x), Text(y)) => collate(x, y),
    }
}

/// Stable sort; rows comparing equal keep their input order in either direction.
pub fn sort_rows<'a>(rows: &[&'a NormalizedRow], key: &SortKey) -> Vec<&'a NormalizedRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare_cells(a.get(&key.column), b.get(&key.column));
        match key.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

/// Header-click sort state, tracked separately for each year group.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    by_year: HashMap<i32, SortKey>,
}

impl SortState {
    pub fn get(&self, year: i32) -> Option<&SortKey> {
        self.by_year.get(&year)
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn click(&mut self, year: i32, column: &str) -> &SortKey {
        let next = match self.by_year.get(&year) {
            Some(prev) if prev.column == column => SortKey {
                column: column.to_string(),
                direction: prev.direction.toggled(),
            },
            _ => SortKey {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            },
        };
        debug!("Year {} sorted by '{}' {:?}", year, next.column, next.direction);
        self.by_year.insert(year, next);
        &self.by_year[&year]
    }

    /// Group rows in display order; unsorted groups keep feed order.
    pub fn apply<'a>(&self, group: &YearGroup<'a>) -> Vec<&'a NormalizedRow> {
        match self.get(group.year) {
            Some(key) => sort_rows(&group.rows, key),
            None => group.rows.clone(),
        }
    }
}

/// Concrete labels of the aggregated columns for one header set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStatColumns {
    pub sales: String,
    pub price: String,
    pub count: String,
}

/// Match by substring to tolerate header drift; fall back to the substring
/// itself so a missing column simply aggregates to zero.
pub fn resolve_stat_columns(columns: &[&str], wanted: &StatisticsColumns) -> ResolvedStatColumns {
    let find = |needle: &str| {
        columns
            .iter()
            .find(|c| c.contains(needle))
            .map(|c| c.to_string())
            .unwrap_or_else(|| needle.to_string())
    };
    let resolved = ResolvedStatColumns {
        sales: find(&wanted.sales),
        price: find(&wanted.price),
        count: find(&wanted.count),
    };
    debug!("Statistics columns resolved to {:?}", resolved);
    resolved
}

pub fn compute_statistics(rows: &[&NormalizedRow], cols: &ResolvedStatColumns) -> Statistics {
    let count = rows.len();
    let sales: Vec<f64> = rows.iter().map(|r| number_or_zero(Some(r.get(&cols.sales)))).collect();
    let total_sales: f64 = sales.iter().sum();
    let prices: Vec<f64> = rows.iter().map(|r| number_or_zero(Some(r.get(&cols.price)))).collect();
    let average_price = average(&prices);
    let (max_sales, min_sales) = positive_extremes(sales.iter().copied());
    let (max_count, min_count) =
        positive_extremes(rows.iter().map(|r| number_or_zero(Some(r.get(&cols.count)))));
    Statistics {
        count,
        total_sales,
        average_price,
        max_sales,
        min_sales,
        max_count,
        min_count,
    }
}

/// (max, min) over strictly positive values, or (0, 0) if none.
fn positive_extremes(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut extremes: Option<(f64, f64)> = None;
    for v in values.filter(|v| *v > 0.0) {
        extremes = Some(match extremes {
            Some((max, min)) => (max.max(v), min.min(v)),
            None => (v, v),
        });
    }
    extremes.unwrap_or((0.0, 0.0))
}
