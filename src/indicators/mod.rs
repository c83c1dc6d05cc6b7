//! Indicator transformation module.
//!
//! Derives the metrics the classifiers consume from raw level series:
//! - Year-over-year / period-over-period percentage changes
//! - Period differences and monthly resampling
//! - Rolling means, z-scores and pressure diagnostics

pub mod pressure;
pub mod rolling;
pub mod transformer;

pub use pressure::{policy_rate_score, unemployment_score, PressureDiagnostics};
pub use rolling::{rolling_mean, zscore, RollingWindow};
pub use transformer::{
    diff, latest_pct_change, pct_change, pct_change_history, resample_monthly, DerivedMetric,
    HistoryAlignment, MONTHLY_YOY_LAG, QUARTERLY_YOY_LAG,
};
