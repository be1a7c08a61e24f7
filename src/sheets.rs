//! Where raw grids come from: the Google Sheets values API, or grids held in memory.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::SheetsConfig;
use crate::error::CatalogError;
use crate::types::Grid;

/// Fetches one sheet tab as a grid. Implementations never retry.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_grid(&self, sheet: &str) -> Result<Grid, CatalogError>;
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

/// Stringify a cell the way a spreadsheet front end would: integral numbers
/// lose their fraction, so `3`, `3.0` and `"3"` all become `"3"`.
pub fn cell_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn to_grid(rows: Vec<Vec<Value>>) -> Grid {
    rows.into_iter().map(|r| r.iter().map(cell_to_string).collect()).collect()
}

/// Reads tabs through `GET {base}/{spreadsheet}/values/{tab}?key=...`.
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl GoogleSheetsSource {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coursedeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        Ok(Self { client, config })
    }

    pub fn values_url(&self, sheet: &str) -> Result<url::Url, CatalogError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = url::Url::parse(base).map_err(|e| CatalogError::fetch(sheet, None, format!("invalid base url {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::fetch(sheet, None, format!("base url cannot take a path: {base}")))?
            .pop_if_empty()
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(sheet);
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn fetch_grid(&self, sheet: &str) -> Result<Grid, CatalogError> {
        let url = self.values_url(sheet)?;
        debug!(sheet, "fetching sheet");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::fetch(sheet, e.status().map(|s| s.as_u16()), e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::fetch(sheet, Some(status.as_u16()), e.to_string()))?;
        if !status.is_success() {
            error!(sheet, status = status.as_u16(), "sheet fetch failed");
            return Err(CatalogError::fetch(sheet, Some(status.as_u16()), body));
        }
        let parsed: ValuesResponse = serde_json::from_str(&body).map_err(|e| CatalogError::unparsable(sheet, e.to_string()))?;
        Ok(parsed.values.map(to_grid).unwrap_or_default())
    }
}

/// Grids held in memory, keyed by tab name.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    grids: HashMap<String, Grid>,
}

#[derive(Deserialize)]
struct OfflineFile {
    #[serde(default)]
    courses: Vec<Vec<Value>>,
    #[serde(default)]
    modules: Vec<Vec<Value>>,
    #[serde(default)]
    lessons: Vec<Vec<Value>>,
}

impl StaticSource {
    pub fn new() -> Self { Self::default() }

    pub fn with_grid(mut self, sheet: &str, grid: Grid) -> Self {
        self.grids.insert(sheet.to_string(), grid);
        self
    }

    /// Build from a JSON document `{ "courses": [[..]], "modules": [[..]], "lessons": [[..]] }`,
    /// registering the grids under the configured tab names.
    pub fn from_json(json: &str, tabs: &SheetsConfig) -> Result<Self> {
        let file: OfflineFile = serde_json::from_str(json).context("parsing offline catalog")?;
        Ok(Self::new()
            .with_grid(&tabs.courses, to_grid(file.courses))
            .with_grid(&tabs.modules, to_grid(file.modules))
            .with_grid(&tabs.lessons, to_grid(file.lessons)))
    }

    pub async fn from_file(path: &Path, tabs: &SheetsConfig) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading offline catalog {}", path.display()))?;
        Self::from_json(&json, tabs)
    }
}

#[async_trait]
impl SheetSource for StaticSource {
    async fn fetch_grid(&self, sheet: &str) -> Result<Grid, CatalogError> {
        self.grids
            .get(sheet)
            .cloned()
            .ok_or_else(|| CatalogError::fetch(sheet, Some(404), "no such sheet"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_cells_stringify_like_text() {
        assert_eq!(cell_to_string(&json!(3)), "3");
        assert_eq!(cell_to_string(&json!(3.0)), "3");
        assert_eq!(cell_to_string(&json!("3")), "3");
        assert_eq!(cell_to_string(&json!(2.5)), "2.5");
        assert_eq!(cell_to_string(&json!(null)), "");
        assert_eq!(cell_to_string(&json!(true)), "true");
    }

    #[test]
    fn values_url_encodes_tab_name() {
        let cfg = SheetsConfig {
            spreadsheet_id: "sheet123".into(),
            api_key: "k".into(),
            ..SheetsConfig::default()
        };
        let src = GoogleSheetsSource::new(cfg).unwrap();
        let url = src.values_url("My Courses").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/My%20Courses?key=k"
        );
    }

    #[tokio::test]
    async fn static_source_serves_known_tabs() {
        let tabs = SheetsConfig::default();
        let src = StaticSource::from_json(r#"{"courses": [["id","title"],[1,"Rust"]]}"#, &tabs).unwrap();
        let grid = src.fetch_grid("Courses").await.unwrap();
        assert_eq!(grid[1], vec!["1".to_string(), "Rust".to_string()]);
        assert_eq!(src.fetch_grid("Lessons").await.unwrap(), Grid::new());

        let err = StaticSource::new().fetch_grid("Courses").await.unwrap_err();
        assert!(matches!(err, CatalogError::Fetch { status: Some(404), .. }));
    }
}
