use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::access::{Grouping, PriceFormat};
use crate::thumbnail::ThumbnailStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheets: SheetsConfig,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    /// Simulated checkout latency.
    pub payment_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    pub base_url: String,
    // tab names, must match the spreadsheet exactly
    pub courses: String,
    pub modules: String,
    pub lessons: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            api_key: String::new(),
            base_url: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
            courses: "Courses".to_string(),
            modules: "Modules".to_string(),
            lessons: "Lessons".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to a SQLite file in the user's data directory.
    pub database_url: Option<String>,
    /// Prefix for persisted keys, e.g. `{namespace}_purchases`.
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self { Self { database_url: None, namespace: "course_platform".to_string() } }
}

impl StorageConfig {
    pub fn purchases_key(&self) -> String { format!("{}_purchases", self.namespace) }
    pub fn theme_key(&self) -> String { format!("{}_theme", self.namespace) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub grouping: Grouping,
    pub thumbnail_quality: String,
    pub placeholder_colors: Vec<String>,
    pub placeholder_size: u32,
    pub default_theme: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let price = PriceFormat::default();
        let thumbs = ThumbnailStyle::default();
        Self {
            currency_symbol: price.currency_symbol,
            grouping: price.grouping,
            thumbnail_quality: thumbs.quality,
            placeholder_colors: thumbs.palette,
            placeholder_size: thumbs.placeholder_size,
            default_theme: "dark".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn price_format(&self) -> PriceFormat {
        PriceFormat { currency_symbol: self.currency_symbol.clone(), grouping: self.grouping }
    }

    pub fn thumbnail_style(&self) -> ThumbnailStyle {
        ThumbnailStyle {
            quality: self.thumbnail_quality.clone(),
            palette: self.placeholder_colors.clone(),
            placeholder_size: self.placeholder_size,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing config")
    }

    /// Load from `path`, else from `config.toml` in the project config dir if present,
    /// else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let mut cfg = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(&p).with_context(|| format!("reading config {}", p.display()))?;
                Self::from_toml(&raw).with_context(|| format!("in {}", p.display()))?
            }
            _ => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("COURSEDECK_API_KEY") { self.sheets.api_key = v; }
        if let Ok(v) = std::env::var("COURSEDECK_SPREADSHEET_ID") { self.sheets.spreadsheet_id = v; }
        if let Ok(v) = std::env::var("COURSEDECK_DATABASE_URL") {
            if !v.trim().is_empty() { self.storage.database_url = Some(v); }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig::default(),
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
            payment_delay_ms: 1500,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "coursedeck", "coursedeck").map(|p| p.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            payment_delay_ms = 0

            [sheets]
            spreadsheet_id = "abc"
            lessons = "Videos"

            [display]
            currency_symbol = "$"
            grouping = "western"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sheets.spreadsheet_id, "abc");
        assert_eq!(cfg.sheets.courses, "Courses");
        assert_eq!(cfg.sheets.lessons, "Videos");
        assert_eq!(cfg.display.grouping, Grouping::Western);
        assert_eq!(cfg.display.thumbnail_quality, "hqdefault");
        assert_eq!(cfg.payment_delay_ms, 0);
        assert_eq!(cfg.storage.purchases_key(), "course_platform_purchases");
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().payment_delay_ms, 1500);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.storage.namespace, "course_platform");
    }
}
