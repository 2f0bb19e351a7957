#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use publishing_dashboard::config::DashboardConfig;
use publishing_dashboard::dashboard::Dashboard;
use publishing_dashboard::loader;

pub const TITLE: &str = "제목(공유 폴더 링크)";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

/// Dashboard over the saved sheet response with default configuration.
pub fn fixture_dashboard() -> Dashboard {
    let (snapshot, _) =
        loader::load_from_path(&fixture_path("sheet_response.txt")).expect("load fixture");
    Dashboard::new(DashboardConfig::default(), snapshot, today())
}
