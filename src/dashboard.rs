//! The in-memory session: one snapshot of normalized rows plus the small
//! amount of view state (per-year sort, selected calendar year) built on it.

use chrono::NaiveDate;
use log::{info, warn};

use crate::calendar::{CalendarColumns, CalendarIndex};
use crate::config::DashboardConfig;
use crate::projector::{project_rows, ProjectionSpec};
use crate::reports::{
    compute_statistics, group_by_year, resolve_stat_columns, ResolvedStatColumns, SortState,
};
use crate::types::{NormalizedRow, SheetSnapshot, SortKey, Statistics, YearGroup};

pub struct Dashboard {
    config: DashboardConfig,
    columns: Vec<String>,
    rows: Vec<NormalizedRow>,
    calendar: CalendarIndex,
    sort: SortState,
    selected_year: Option<i32>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, snapshot: SheetSnapshot, today: NaiveDate) -> Self {
        let mut dashboard = Self {
            config,
            columns: Vec::new(),
            rows: Vec::new(),
            calendar: CalendarIndex::default(),
            sort: SortState::default(),
            selected_year: None,
        };
        dashboard.replace_rows(snapshot, today);
        dashboard
    }

    /// Swap in a new snapshot. Derived data and the calendar year selection
    /// are rebuilt; per-year sort choices are kept.
    pub fn replace_rows(&mut self, snapshot: SheetSnapshot, today: NaiveDate) {
        let rows = project_rows(&snapshot.rows, &ProjectionSpec::from_config(&self.config));
        let untitled = rows
            .iter()
            .filter(|r| !r.has_value(&self.config.title_column))
            .count();
        if untitled > 0 {
            warn!("{} row(s) without a title are left out of every view", untitled);
        }
        let calendar = CalendarIndex::build(&rows, &self.calendar_columns());
        self.calendar = calendar;
        self.selected_year = self.calendar.default_year(today);
        self.columns = snapshot.columns;
        self.rows = rows;
        info!(
            "Dashboard holds {} row(s) across {} column(s)",
            self.rows.len(),
            self.columns.len()
        );
    }

    fn calendar_columns(&self) -> CalendarColumns<'_> {
        CalendarColumns {
            title: &self.config.title_column,
            pre_order: &self.config.pre_order_column,
            release: &self.config.release_column,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn visible_columns(&self) -> Vec<&str> {
        self.config.filter_visible(&self.columns)
    }

    pub fn year_groups(&self) -> Vec<YearGroup<'_>> {
        group_by_year(
            &self.rows,
            &self.config.title_column,
            &self.config.contract_date_column,
        )
    }

    /// Header click on a year table. Unknown columns are ignored.
    pub fn click_header(&mut self, year: i32, column: &str) -> Option<&SortKey> {
        if !self.columns.iter().any(|c| c == column) {
            warn!("Ignoring sort on unknown column '{}'", column);
            return None;
        }
        Some(self.sort.click(year, column))
    }

    pub fn sort_key(&self, year: i32) -> Option<&SortKey> {
        self.sort.get(year)
    }

    pub fn sorted_rows<'a>(&self, group: &YearGroup<'a>) -> Vec<&'a NormalizedRow> {
        self.sort.apply(group)
    }

    pub fn stat_columns(&self) -> ResolvedStatColumns {
        resolve_stat_columns(&self.visible_columns(), &self.config.statistics)
    }

    pub fn statistics(&self, group: &YearGroup<'_>) -> Statistics {
        compute_statistics(&group.rows, &self.stat_columns())
    }

    pub fn calendar(&self) -> &CalendarIndex {
        &self.calendar
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    /// Returns false and keeps the current selection when `year` has no dates.
    pub fn select_year(&mut self, year: i32) -> bool {
        if self.calendar.years().contains(&year) {
            self.selected_year = Some(year);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawRow, SortDirection};

    fn snapshot(rows: &[&[(&str, &str)]]) -> SheetSnapshot {
        let mut columns: Vec<String> = Vec::new();
        let rows = rows
            .iter()
            .map(|pairs| {
                for (k, _) in pairs.iter() {
                    if !columns.iter().any(|c| c == k) {
                        columns.push(k.to_string());
                    }
                }
                RawRow {
                    cells: pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                }
            })
            .collect();
        SheetSnapshot { columns, rows }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    const TITLE: &str = "제목(공유 폴더 링크)";

    #[test]
    fn zero_based_literals_land_in_one_year() {
        let dash = Dashboard::new(
            DashboardConfig::default(),
            snapshot(&[
                &[(TITLE, "A"), ("계약일", "Date(2023,0,15)")],
                &[(TITLE, "B"), ("계약일", "Date(2023,5,1)")],
            ]),
            today(),
        );
        assert_eq!(dash.rows()[0].get("계약일"), "2023-01-15");
        assert_eq!(dash.rows()[1].get("계약일"), "2023-06-01");
        let groups = dash.year_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].year, 2023);
        assert_eq!(groups[0].rows.len(), 2);
    }

    #[test]
    fn replacing_rows_reselects_calendar_year() {
        let mut dash = Dashboard::new(
            DashboardConfig::default(),
            snapshot(&[&[(TITLE, "A"), ("예판일", "Date(2025,2,1)")]]),
            today(),
        );
        assert_eq!(dash.selected_year(), Some(2025));
        assert!(!dash.select_year(2019));
        assert_eq!(dash.selected_year(), Some(2025));

        dash.replace_rows(
            snapshot(&[
                &[(TITLE, "A"), ("예판일", "Date(2025,2,1)")],
                &[(TITLE, "B"), ("하판 예정일(20일 기준)", "Date(2026,11,1)")],
            ]),
            today(),
        );
        assert_eq!(dash.selected_year(), Some(2026));
        assert!(dash.select_year(2025));
        assert_eq!(dash.selected_year(), Some(2025));
    }

    #[test]
    fn header_clicks_ignore_unknown_columns() {
        let mut dash = Dashboard::new(
            DashboardConfig::default(),
            snapshot(&[&[(TITLE, "A"), ("계약일", "2024-01-01"), ("가격", "1")]]),
            today(),
        );
        assert!(dash.click_header(2024, "없는 열").is_none());
        assert_eq!(
            dash.click_header(2024, "가격").map(|k| k.direction),
            Some(SortDirection::Ascending)
        );
        assert_eq!(
            dash.click_header(2024, "가격").map(|k| k.direction),
            Some(SortDirection::Descending)
        );
        assert!(dash.sort_key(2023).is_none());
    }

    #[test]
    fn statistics_use_visible_columns() {
        let mut config = DashboardConfig::default();
        config.visible_columns = Some(vec![TITLE.to_string(), "예상 매출(원)".to_string()]);
        let dash = Dashboard::new(
            config,
            snapshot(&[
                &[(TITLE, "A"), ("계약일", "2024-01-01"), ("예상 매출(원)", "1,000")],
                &[(TITLE, "B"), ("계약일", "2024-02-01"), ("예상 매출(원)", "")],
                &[(TITLE, "C"), ("계약일", "2024-03-01"), ("예상 매출(원)", "2,500")],
            ]),
            today(),
        );
        assert_eq!(dash.visible_columns(), vec![TITLE, "예상 매출(원)"]);
        let groups = dash.year_groups();
        let stats = dash.statistics(&groups[0]);
        assert_eq!(stats.total_sales, 3500.0);
        assert_eq!(stats.max_sales, 2500.0);
        assert_eq!(stats.min_sales, 1000.0);
    }
}
