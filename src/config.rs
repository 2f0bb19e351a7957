//! Dashboard configuration.
//!
//! Every field has a default matching the production sheet, so a YAML file
//! only needs to list what differs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1P5xHo0FiwEGX2ZIXzJ7peWe7oMJlt3Y0eddDzcXCYoM/gviz/tq?tqx=out:json&gid=2076644208";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub sheet_url: String,
    pub request_timeout_secs: u64,
    pub title_column: String,
    pub contract_date_column: String,
    pub pre_order_column: String,
    pub release_column: String,
    pub date_columns: Vec<String>,
    pub month_columns: Vec<String>,
    pub currency_columns: Vec<String>,
    /// `None` shows every column.
    pub visible_columns: Option<Vec<String>>,
    pub statistics: StatisticsColumns,
    pub allowed_email_suffix: String,
    pub styles: StyleTable,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            request_timeout_secs: 30,
            title_column: "제목(공유 폴더 링크)".to_string(),
            contract_date_column: "계약일".to_string(),
            pre_order_column: "예판일".to_string(),
            release_column: "하판 예정일(20일 기준)".to_string(),
            date_columns: strings(&[
                "계약일",
                "계약서 상 집필 완료일",
                "예판일",
                "하판 예정일(20일 기준)",
            ]),
            month_columns: strings(&["출간 예상월"]),
            currency_columns: strings(&["예상 가격", "예상 매출"]),
            visible_columns: None,
            statistics: StatisticsColumns::default(),
            allowed_email_suffix: "@goldenrabbit.co.kr".to_string(),
            styles: StyleTable::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Header labels the table view shows, in header order.
    pub fn filter_visible<'a>(&self, columns: &'a [String]) -> Vec<&'a str> {
        match &self.visible_columns {
            Some(allowed) => columns
                .iter()
                .filter(|c| allowed.contains(c))
                .map(String::as_str)
                .collect(),
            None => columns.iter().map(String::as_str).collect(),
        }
    }
}

/// Substrings used to locate the aggregated columns despite header drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsColumns {
    pub sales: String,
    pub price: String,
    pub count: String,
}

impl Default for StatisticsColumns {
    fn default() -> Self {
        Self {
            sales: "예상 매출".to_string(),
            price: "예상 가격".to_string(),
            count: "연 판매 부수".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleToken {
    Green,
    Blue,
    Yellow,
    Pink,
    Purple,
    Indigo,
    Teal,
    Orange,
    Red,
    Cyan,
}

impl StyleToken {
    /// ANSI background for terminal output.
    pub fn ansi_background(self) -> &'static str {
        match self {
            StyleToken::Green => "\u{1b}[42m",
            StyleToken::Blue => "\u{1b}[44m",
            StyleToken::Yellow => "\u{1b}[43m",
            StyleToken::Pink => "\u{1b}[105m",
            StyleToken::Purple => "\u{1b}[45m",
            StyleToken::Indigo => "\u{1b}[104m",
            StyleToken::Teal => "\u{1b}[46m",
            StyleToken::Orange => "\u{1b}[48;5;208m",
            StyleToken::Red => "\u{1b}[41m",
            StyleToken::Cyan => "\u{1b}[106m",
        }
    }
}

/// One palette of person name → style, applied to every role column listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    pub roles: Vec<String>,
    pub palette: BTreeMap<String, StyleToken>,
}

impl Default for StyleTable {
    fn default() -> Self {
        let palette = [
            ("최현우", StyleToken::Green),
            ("박현규", StyleToken::Blue),
            ("오힘찬", StyleToken::Yellow),
            ("최혜민", StyleToken::Pink),
            ("김성경", StyleToken::Purple),
            ("윤신원", StyleToken::Indigo),
            ("박우현", StyleToken::Teal),
            ("차진우", StyleToken::Orange),
            ("정다운", StyleToken::Red),
            ("오은교", StyleToken::Cyan),
        ]
        .into_iter()
        .map(|(name, token)| (name.to_string(), token))
        .collect();
        Self {
            roles: strings(&["담당자", "계약자"]),
            palette,
        }
    }
}

impl StyleTable {
    /// Unknown names and non-role columns get no styling.
    pub fn style_for(&self, column: &str, value: &str) -> Option<StyleToken> {
        if !self.roles.iter().any(|r| r == column) {
            return None;
        }
        self.palette.get(value.trim()).copied()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let cfg = DashboardConfig::from_yaml("").unwrap();
        assert_eq!(cfg.contract_date_column, "계약일");
        assert_eq!(cfg.allowed_email_suffix, "@goldenrabbit.co.kr");
        assert!(cfg.visible_columns.is_none());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r#"
request_timeout_secs: 5
visible_columns: ["제목(공유 폴더 링크)", "예상 가격"]
styles:
  roles: ["담당자"]
  palette:
    홍길동: teal
"#;
        let cfg = DashboardConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.title_column, "제목(공유 폴더 링크)");
        assert_eq!(cfg.styles.style_for("담당자", "홍길동"), Some(StyleToken::Teal));
        assert_eq!(cfg.styles.style_for("계약자", "홍길동"), None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(DashboardConfig::from_yaml("sheet_ur1: x").is_err());
    }

    #[test]
    fn visible_filter_keeps_header_order() {
        let mut cfg = DashboardConfig::default();
        cfg.visible_columns = Some(vec!["가격".into(), "제목".into()]);
        let columns = vec!["제목".to_string(), "저자".to_string(), "가격".to_string()];
        assert_eq!(cfg.filter_visible(&columns), vec!["제목", "가격"]);
        cfg.visible_columns = None;
        assert_eq!(cfg.filter_visible(&columns).len(), 3);
    }

    #[test]
    fn shared_palette_covers_both_roles() {
        let styles = StyleTable::default();
        assert_eq!(styles.style_for("담당자", "박현규"), Some(StyleToken::Blue));
        assert_eq!(styles.style_for("계약자", "박현규"), Some(StyleToken::Blue));
        assert_eq!(styles.style_for("담당자", "새 직원"), None);
        assert_eq!(styles.style_for("제목", "박현규"), None);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/dashboard.yml")));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
