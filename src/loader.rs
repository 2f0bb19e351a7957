use crate::error::LoadError;
use crate::types::{RawRow, SheetSnapshot};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub column_count: usize,
    pub padded_rows: usize,
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizMessage>,
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizMessage {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Strip the `/*O_o*/ google.visualization.Query.setResponse(` prefix and the
/// trailing `);`, leaving the JSON payload.
pub fn strip_envelope(text: &str) -> Result<&str, LoadError> {
    let start = text.find('(').ok_or(LoadError::Envelope)?;
    let end = text.rfind(')').ok_or(LoadError::Envelope)?;
    if end <= start {
        return Err(LoadError::Envelope);
    }
    Ok(&text[start + 1..end])
}

/// Cell value as the dashboard sees it: strings verbatim, whole numbers
/// without a decimal point, null as empty.
fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

pub fn parse_response(text: &str) -> Result<(SheetSnapshot, LoadReport), LoadError> {
    let payload = strip_envelope(text)?;
    let response: GvizResponse = serde_json::from_str(payload)?;

    if response.status.as_deref() == Some("error") {
        let messages: Vec<String> = response
            .errors
            .iter()
            .filter_map(|e| {
                e.detailed_message
                    .clone()
                    .or_else(|| e.message.clone())
                    .or_else(|| e.reason.clone())
            })
            .collect();
        return Err(LoadError::Feed(messages.join("; ")));
    }
    let table = response
        .table
        .ok_or_else(|| LoadError::Feed("response has no table".to_string()))?;

    let columns: Vec<String> = table.cols.into_iter().map(|c| c.label).collect();
    let mut padded_rows = 0usize;
    let mut rows = Vec::with_capacity(table.rows.len());
    for row in table.rows {
        if row.c.len() < columns.len() {
            padded_rows += 1;
        }
        let mut cells: HashMap<String, String> = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            let value = row
                .c
                .get(idx)
                .and_then(|cell| cell.as_ref())
                .map(|cell| cell_text(&cell.v))
                .unwrap_or_default();
            cells.insert(column.clone(), value);
        }
        rows.push(RawRow { cells });
    }

    let report = LoadReport {
        total_rows: rows.len(),
        column_count: columns.len(),
        padded_rows,
    };
    debug!("Sheet columns: {:?}", columns);
    Ok((SheetSnapshot { columns, rows }, report))
}

pub fn load_from_path(path: &Path) -> Result<(SheetSnapshot, LoadReport), LoadError> {
    info!("Reading sheet response from {:?}", path);
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_response(&text)
}

pub fn load_from_url(url: &str, timeout: Duration) -> Result<(SheetSnapshot, LoadReport), LoadError> {
    info!("Fetching sheet from {}", url);
    let http = |source: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http)?;
    let text = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(http)?;
    parse_response(&text)
}
