//! User settings loaded from `settings.toml`.

use std::path::Path;

use serde::Deserialize;

use crate::state::{ChartMode, DEFAULT_CHART_METRICS, DEFAULT_TABLE_COLUMNS};

mod paths;

pub use paths::{SETTINGS_FILE, config_dir, logs_dir, resolve_settings_path};

/// Environment variable overriding `api_key`.
pub const API_KEY_ENV: &str = "FINSCOPE_API_KEY";

/// Reporting period requested from the income-statement endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Fiscal years.
    #[default]
    Annual,
    /// Fiscal quarters.
    Quarter,
}

impl Period {
    /// Value of the `period` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// What: Application settings.
///
/// Details:
/// - Every field has a default so partial files are valid.
/// - Unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the financial data API.
    pub base_url: String,
    /// API key appended as `apikey`.
    pub api_key: Option<String>,
    /// Statement period.
    pub period: Period,
    /// Symbol loaded when none is given on the command line.
    pub default_symbol: String,
    /// Table columns in display order.
    pub columns: Vec<String>,
    /// Metrics plotted by the chart.
    pub chart_metrics: Vec<String>,
    /// Initial chart mode.
    pub chart_mode: ChartMode,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Remote sort/filter endpoint; queries are evaluated locally when unset.
    pub query_endpoint: Option<String>,
    /// Baselines kept in the HTTP service cache.
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com/api/v3".to_string(),
            api_key: None,
            period: Period::Annual,
            default_symbol: "AAPL.NE".to_string(),
            columns: DEFAULT_TABLE_COLUMNS.iter().map(ToString::to_string).collect(),
            chart_metrics: DEFAULT_CHART_METRICS.iter().map(ToString::to_string).collect(),
            chart_mode: ChartMode::Line,
            request_timeout_secs: 20,
            query_endpoint: None,
            cache_capacity: 16,
        }
    }
}

impl Settings {
    /// What: Load settings from `explicit` or the standard location.
    ///
    /// Inputs:
    /// - `explicit`: Path given with `--config`, if any
    ///
    /// Output:
    /// - Parsed settings; defaults when no file exists or it cannot be parsed.
    ///
    /// Details:
    /// - A malformed file is logged and ignored rather than aborting startup.
    /// - `FINSCOPE_API_KEY` overrides the file's `api_key`.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit.map(Path::to_path_buf).or_else(resolve_settings_path);
        let mut settings = path.as_deref().map_or_else(Self::default, Self::read_or_default);
        settings.override_api_key(std::env::var(API_KEY_ENV).ok());
        settings
    }

    /// Read and parse `path`, falling back to defaults with a warning.
    fn read_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match Self::parse(&raw) {
                Ok(s) => {
                    tracing::info!(path = %path.display(), "settings loaded");
                    s
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "malformed settings; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read settings; using defaults");
                Self::default()
            }
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    /// - TOML syntax errors or type mismatches
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(raw)?;
        if settings.columns.is_empty() {
            settings.columns = Self::default().columns;
        }
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(settings)
    }

    /// Replace `api_key` with a non-empty override.
    pub fn override_api_key(&mut self, key: Option<String>) {
        if let Some(k) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(k);
        }
    }
}
