//! Analyzer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocation::AllocationPolicy;
use crate::error::{AnalysisError, AnalysisResult};
use crate::indicators::{HistoryAlignment, MONTHLY_YOY_LAG, QUARTERLY_YOY_LAG};
use crate::regime::ClassifierConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(#[from] AnalysisError),
}

/// Configuration for a [`MacroAnalyzer`](super::MacroAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lag for price-index YoY change (monthly observations).
    pub inflation_lag: usize,
    /// Lag for output YoY change on the raw (quarterly) series.
    pub growth_lag: usize,
    /// Lag for output YoY change after monthly resampling.
    pub monthly_growth_lag: usize,
    /// Window for policy-rate and unemployment rolling means.
    pub rolling_window: usize,
    /// Span of the unemployment change series, in months.
    pub unemployment_change_periods: usize,
    /// Which observation historical metrics end on.
    pub history_alignment: HistoryAlignment,
    /// Treatment of the 33/33/33 split.
    pub allocation_policy: AllocationPolicy,
    /// Compute policy/unemployment pressure diagnostics in snapshots.
    pub include_pressure: bool,
    /// Band threshold tables.
    pub thresholds: ClassifierConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            inflation_lag: MONTHLY_YOY_LAG,
            growth_lag: QUARTERLY_YOY_LAG,
            monthly_growth_lag: MONTHLY_YOY_LAG,
            rolling_window: 3,
            unemployment_change_periods: 3,
            history_alignment: HistoryAlignment::IncludeLatest,
            allocation_policy: AllocationPolicy::AsPublished,
            include_pressure: true,
            thresholds: ClassifierConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load and validate a TOML config; missing keys keep their defaults.
    pub fn from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        let lags = [
            ("inflation_lag", self.inflation_lag),
            ("growth_lag", self.growth_lag),
            ("monthly_growth_lag", self.monthly_growth_lag),
            ("rolling_window", self.rolling_window),
            ("unemployment_change_periods", self.unemployment_change_periods),
        ];
        if let Some((name, _)) = lags.iter().find(|(_, value)| *value == 0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "{} must be at least 1",
                name
            )));
        }
        self.thresholds.validate()
    }

    /// Minimum observations every input series needs for a snapshot.
    pub fn snapshot_min_observations(&self) -> usize {
        self.inflation_lag.max(self.growth_lag) + self.rolling_window
    }
}
