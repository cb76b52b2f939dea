//! Configuration system for modelcmp.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment.
//! Configuration is loaded from the user config directory (`config.toml`) and/or
//! `.modelcmp/config.toml` in the workspace directory. CLI flags are applied on
//! top by the binary after loading.

use crate::error::{ConfigError, Result};
use crate::types::Metric;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub charts: ChartConfig,
}

/// How composite scores are computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub weights: MetricWeights,
    /// What to do when every model has the same value for a metric.
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }
}

/// Per-metric weights applied to normalized values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub cost: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            accuracy: 1.0,
            precision: 1.0,
            recall: 1.5,
            f1_score: 1.5,
            cost: 2.0,
        }
    }
}

impl MetricWeights {
    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1Score => self.f1_score,
            Metric::Cost => self.cost,
        }
    }

    /// Negative weights would invert a metric's direction, so they are rejected.
    pub fn validate(&self) -> Result<()> {
        for metric in Metric::ALL {
            let value = self.weight(metric);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { metric, value }.into());
            }
        }
        Ok(())
    }
}

/// Normalized value used when a metric's max equals its min.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Every row gets 0.0 on that metric.
    #[default]
    Zero,
    /// Every row gets 0.5 on that metric.
    Half,
    /// Fail with a computation error.
    Error,
}

impl DegeneratePolicy {
    /// The constant to substitute, or `None` when the range must be reported.
    pub fn fallback(self) -> Option<f64> {
        match self {
            DegeneratePolicy::Zero => Some(0.0),
            DegeneratePolicy::Half => Some(0.5),
            DegeneratePolicy::Error => None,
        }
    }
}

impl std::fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegeneratePolicy::Zero => write!(f, "zero"),
            DegeneratePolicy::Half => write!(f, "half"),
            DegeneratePolicy::Error => write!(f, "error"),
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used for stdout and for the written table.
    #[serde(default)]
    pub format: OutputFormat,
    /// Directory for written tables and charts.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Write the table in `format` to `dir` in addition to stdout.
    #[serde(default)]
    pub write_table: bool,
    /// Render SVG charts into `dir` after ranking.
    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            dir: default_output_dir(),
            write_table: false,
            charts: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("modelcmp-report")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub flag_style: FlagStyle,
    /// Digits after the decimal point for metric columns.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            flag_style: FlagStyle::default(),
            decimals: default_decimals(),
        }
    }
}

fn default_decimals() -> usize {
    4
}

/// How boolean flags are shown in terminal and markdown tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStyle {
    /// `🟩 True` / `🟥 False` and `✅ Best`.
    #[default]
    Emoji,
    /// `true` / `false`.
    Plain,
}

/// SVG chart dimensions in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    500
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "modelcmp", "modelcmp")
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".modelcmp").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `MODELCMP_`, nested keys split on `__`)
/// 2. Explicit config file (`--config`)
/// 3. Workspace-local config (`.modelcmp/config.toml`)
/// 4. User config (`<config dir>/modelcmp/config.toml`)
/// 5. Built-in defaults
pub fn load_config(workspace: Option<&Path>, config_file: Option<&Path>) -> Result<CompareConfig> {
    let mut figment = Figment::from(Serialized::defaults(CompareConfig::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // An explicitly named file must exist; `Toml::file` alone would skip it silently.
    if let Some(path) = config_file {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )
            .into());
        }
        figment = figment.merge(Toml::file(path));
    }

    // MODELCMP_RANKING__DEGENERATE_POLICY=half, MODELCMP_OUTPUT__FORMAT=csv, ...
    figment = figment.merge(Env::prefixed("MODELCMP_").split("__"));

    let config: CompareConfig = figment
        .extract()
        .map_err(|e| ConfigError::Load(Box::new(e)))?;
    config.ranking.validate()?;
    Ok(config)
}

/// Check whether any modelcmp configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dirs) = project_dirs() {
        if dirs.config_dir().join("config.toml").exists() {
            return true;
        }
    }

    if let Some(ws) = workspace {
        if workspace_config_path(ws).exists() {
            return true;
        }
    }

    false
}
