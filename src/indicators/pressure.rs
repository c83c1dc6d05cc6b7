//! Policy-rate and unemployment pressure diagnostics.
//!
//! Supplementary signals that do not feed band classification:
//! - Policy-rate z-score (inflation pressure) and negated unemployment
//!   z-score (growth pressure), both over the rolling-mean history
//! - `tanh` squashed adjustments in (-1, 1)
//! - Level scores of the latest rolling means

use serde::{Deserialize, Serialize};

use super::rolling::{rolling_mean, zscore};
use crate::data::IndicatorSeries;
use crate::error::{AnalysisError, AnalysisResult};

/// Pressure diagnostics for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureDiagnostics {
    /// Latest rolling mean of the policy rate.
    pub policy_rate_mean: f64,
    /// Latest rolling mean of the unemployment rate.
    pub unemployment_mean: f64,
    /// Z-score of the latest policy-rate rolling mean.
    pub policy_zscore: f64,
    /// Z-score of the latest unemployment rolling mean.
    pub unemployment_zscore: f64,
    /// Policy z-score, read as inflation pressure.
    pub inflation_pressure: f64,
    /// Negated unemployment z-score, read as growth pressure.
    pub growth_pressure: f64,
    /// `tanh(inflation_pressure)`.
    pub inflation_adjustment: f64,
    /// `tanh(growth_pressure)`.
    pub growth_adjustment: f64,
    /// Level score of the policy-rate mean (+1 accommodative .. -2 restrictive).
    pub policy_rate_score: i8,
    /// Level score of the unemployment mean (+1 tight .. -2 slack).
    pub unemployment_score: i8,
}

impl PressureDiagnostics {
    /// Compute diagnostics from policy-rate and unemployment series.
    pub fn compute(
        policy_rate: &IndicatorSeries,
        unemployment: &IndicatorSeries,
        window: usize,
    ) -> AnalysisResult<Self> {
        let policy_means = rolling_mean(&policy_rate.values(), window)?;
        let unemployment_means = rolling_mean(&unemployment.values(), window)?;

        let policy_zscore = zscore(&policy_means).map_err(|e| with_context(e, "policy rate"))?;
        let unemployment_zscore =
            zscore(&unemployment_means).map_err(|e| with_context(e, "unemployment rate"))?;

        let policy_rate_mean = *policy_means
            .last()
            .ok_or_else(|| AnalysisError::insufficient("policy rate", window, 0))?;
        let unemployment_mean = *unemployment_means
            .last()
            .ok_or_else(|| AnalysisError::insufficient("unemployment rate", window, 0))?;

        let inflation_pressure = policy_zscore;
        let growth_pressure = -unemployment_zscore;

        Ok(Self {
            policy_rate_mean,
            unemployment_mean,
            policy_zscore,
            unemployment_zscore,
            inflation_pressure,
            growth_pressure,
            inflation_adjustment: inflation_pressure.tanh(),
            growth_adjustment: growth_pressure.tanh(),
            policy_rate_score: policy_rate_score(policy_rate_mean),
            unemployment_score: unemployment_score(unemployment_mean),
        })
    }
}

fn with_context(err: AnalysisError, what: &str) -> AnalysisError {
    match err {
        AnalysisError::DegenerateStatistics(msg) => {
            AnalysisError::DegenerateStatistics(format!("{} rolling mean: {}", what, msg))
        }
        AnalysisError::InsufficientHistory {
            required, actual, ..
        } => AnalysisError::insufficient(format!("{} z-score", what), required, actual),
        other => other,
    }
}

/// Score a policy-rate level: negative rates +1, up to 1.5% 0, up to 3% -1, else -2.
pub fn policy_rate_score(rate_mean: f64) -> i8 {
    if rate_mean < 0.0 {
        1
    } else if rate_mean < 1.5 {
        0
    } else if rate_mean < 3.0 {
        -1
    } else {
        -2
    }
}

/// Score an unemployment level: below 3.5% +1, up to 5% 0, up to 7% -1, else -2.
pub fn unemployment_score(unemployment_mean: f64) -> i8 {
    if unemployment_mean < 3.5 {
        1
    } else if unemployment_mean < 5.0 {
        0
    } else if unemployment_mean < 7.0 {
        -1
    } else {
        -2
    }
}
