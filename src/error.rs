//! Errors raised by the analysis core.
//!
//! Every error aborts the analysis of the affected indicator; nothing in the
//! core substitutes a default or NaN for a failed computation.

use thiserror::Error;

use crate::data::IndicatorKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient history for {context}: need {required} observations, got {actual}")]
    InsufficientHistory {
        context: String,
        required: usize,
        actual: usize,
    },

    #[error("No data for {indicator} ({context})")]
    EmptySeries {
        indicator: IndicatorKind,
        context: String,
    },

    #[error("Degenerate statistics: {0}")]
    DegenerateStatistics(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub fn insufficient(context: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::InsufficientHistory {
            context: context.into(),
            required,
            actual,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
