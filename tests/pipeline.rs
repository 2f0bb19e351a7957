mod common;

use chrono::NaiveDate;
use common::{fixture_dashboard, fixture_path, today, TITLE};
use publishing_dashboard::config::DashboardConfig;
use publishing_dashboard::dashboard::Dashboard;
use publishing_dashboard::loader;
use publishing_dashboard::types::{EventType, SortDirection};

fn titles(rows: &[&publishing_dashboard::types::NormalizedRow]) -> Vec<String> {
    rows.iter().map(|r| r.get(TITLE).to_string()).collect()
}

#[test]
fn fixture_loads_every_row_and_pads_short_ones() {
    let (snapshot, report) =
        loader::load_from_path(&fixture_path("sheet_response.txt")).expect("load fixture");
    assert_eq!(report.total_rows, 6);
    assert_eq!(report.column_count, 11);
    assert_eq!(report.padded_rows, 1);
    for row in &snapshot.rows {
        assert_eq!(row.cells.len(), snapshot.columns.len());
    }
}

#[test]
fn rows_are_normalized_for_display() {
    let dash = fixture_dashboard();
    let first = &dash.rows()[0];
    assert_eq!(first.get("계약일"), "2023-01-15");
    assert_eq!(first.get("계약서 상 집필 완료일"), "2023-06-30");
    assert_eq!(first.get("출간 예상월"), "2024-03");
    assert_eq!(first.get("예상 가격"), "₩28,000");
    assert_eq!(first.get("예상 매출"), "₩42,000,000");
    assert_eq!(first.get("연 판매 부수"), "1500");
    assert_eq!(first.get("담당자"), "최현우");

    let unscheduled = &dash.rows()[4];
    assert_eq!(unscheduled.get("예판일"), "미정");
    assert_eq!(unscheduled.get("예상 가격"), "미정");
}

#[test]
fn year_groups_skip_untitled_and_undated_rows() {
    let dash = fixture_dashboard();
    let groups = dash.year_groups();
    let years: Vec<i32> = groups.iter().map(|g| g.year).collect();
    assert_eq!(years, vec![2024, 2023]);
    assert_eq!(titles(&groups[0].rows), vec!["타입스크립트 실전", "데이터 엔지니어링"]);
    assert_eq!(titles(&groups[1].rows), vec!["러스트 프로그래밍 입문", "Go 언어 웹 개발"]);
}

#[test]
fn statistics_per_year_match_sheet_figures() {
    let dash = fixture_dashboard();
    let groups = dash.year_groups();

    let recent = dash.statistics(&groups[0]);
    assert_eq!(recent.count, 2);
    assert_eq!(recent.total_sales, 52_000_000.0);
    assert_eq!(recent.rounded_average_price(), 13_000.0);
    assert_eq!((recent.max_sales, recent.min_sales), (52_000_000.0, 52_000_000.0));
    assert_eq!((recent.max_count, recent.min_count), (2_000.0, 2_000.0));

    let older = dash.statistics(&groups[1]);
    assert_eq!(older.count, 2);
    assert_eq!(older.total_sales, 67_600_000.0);
    assert_eq!(older.rounded_average_price(), 30_000.0);
    assert_eq!((older.max_sales, older.min_sales), (42_000_000.0, 25_600_000.0));
    assert_eq!((older.max_count, older.min_count), (1_500.0, 800.0));
}

#[test]
fn price_header_clicks_sort_formatted_currency_numerically() {
    let mut dash = fixture_dashboard();
    dash.click_header(2023, "예상 가격");
    {
        let groups = dash.year_groups();
        let older = groups.iter().find(|g| g.year == 2023).expect("2023 group");
        assert_eq!(
            titles(&dash.sorted_rows(older)),
            vec!["러스트 프로그래밍 입문", "Go 언어 웹 개발"]
        );
    }
    let key = dash.click_header(2023, "예상 가격").cloned();
    assert_eq!(key.map(|k| k.direction), Some(SortDirection::Descending));
    let groups = dash.year_groups();
    let older = groups.iter().find(|g| g.year == 2023).expect("2023 group");
    assert_eq!(
        titles(&dash.sorted_rows(older)),
        vec!["Go 언어 웹 개발", "러스트 프로그래밍 입문"]
    );
    let recent = groups.iter().find(|g| g.year == 2024).expect("2024 group");
    assert_eq!(
        titles(&dash.sorted_rows(recent)),
        vec!["타입스크립트 실전", "데이터 엔지니어링"]
    );
}

#[test]
fn calendar_indexes_both_event_types() {
    let dash = fixture_dashboard();
    let calendar = dash.calendar();
    assert_eq!(calendar.years(), &[2025, 2024]);
    assert_eq!(
        calendar.month_titles(2024, 3, EventType::PreOrderDate),
        vec!["러스트 프로그래밍 입문"]
    );
    assert_eq!(
        calendar.month_titles(2024, 3, EventType::ReleaseDate),
        vec!["러스트 프로그래밍 입문"]
    );
    assert_eq!(calendar.day_entries(2025, 4, 7)[0].title, "쿠버네티스 운영");
    // The untitled row's pre-order date must not show up.
    assert!(calendar.day_entries(2025, 2, 1).is_empty());
}

#[test]
fn calendar_year_defaults_to_latest_when_current_is_absent() {
    let dash = fixture_dashboard();
    assert_eq!(dash.selected_year(), Some(2025));

    let (snapshot, _) =
        loader::load_from_path(&fixture_path("sheet_response.txt")).expect("load fixture");
    let in_2024 = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let dash = Dashboard::new(DashboardConfig::default(), snapshot, in_2024);
    assert_eq!(dash.selected_year(), Some(2024));
}

#[test]
fn visible_columns_follow_the_allow_list() {
    let (snapshot, _) =
        loader::load_from_path(&fixture_path("sheet_response.txt")).expect("load fixture");
    let config = DashboardConfig::from_yaml(
        "visible_columns: [\"예상 매출\", \"제목(공유 폴더 링크)\", \"없는 열\"]",
    )
    .expect("config");
    let dash = Dashboard::new(config, snapshot, today());
    assert_eq!(dash.visible_columns(), vec![TITLE, "예상 매출"]);
    assert_eq!(dash.stat_columns().sales, "예상 매출");
    assert_eq!(dash.stat_columns().price, "예상 가격");
}
