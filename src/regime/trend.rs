//! Short-horizon trend tags.
//!
//! Compares the latest metric value with the one and two periods before it.
//! Moving past both earlier values is a strong ("++") move; past only the
//! previous one is a plain move.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Direction of the latest move in a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    UpStrong,
    Down,
    DownStrong,
    Flat,
}

impl TrendDirection {
    /// Classify the last three values of `values`.
    pub fn from_recent(values: &[f64]) -> AnalysisResult<Self> {
        let n = values.len();
        if n < 3 {
            return Err(AnalysisError::insufficient("trend", 3, n));
        }
        let (latest, previous, earlier) = (values[n - 1], values[n - 2], values[n - 3]);

        let down = latest < previous;
        let up = latest > previous;

        Ok(if down && latest < earlier {
            Self::DownStrong
        } else if up && latest > earlier {
            Self::UpStrong
        } else if down {
            Self::Down
        } else if up {
            Self::Up
        } else {
            Self::Flat
        })
    }

    /// Label for a subject, e.g. "Inflation moving up ++".
    pub fn label(&self, subject: &str) -> String {
        match self {
            Self::Up => format!("{} moving up", subject),
            Self::UpStrong => format!("{} moving up ++", subject),
            Self::Down => format!("{} moving down", subject),
            Self::DownStrong => format!("{} moving down ++", subject),
            Self::Flat => "No trend".to_string(),
        }
    }
}

/// Direction of recent unemployment changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnemploymentTrend {
    Rising,
    Falling,
    NoTrend,
}

impl UnemploymentTrend {
    /// Classify from a series of period changes: the last two must agree in sign.
    pub fn from_changes(changes: &[f64]) -> AnalysisResult<Self> {
        let n = changes.len();
        if n < 2 {
            return Err(AnalysisError::insufficient("unemployment trend", 2, n));
        }
        let (latest, previous) = (changes[n - 1], changes[n - 2]);

        Ok(if latest < 0.0 && previous < 0.0 {
            Self::Falling
        } else if latest > 0.0 && previous > 0.0 {
            Self::Rising
        } else {
            Self::NoTrend
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rising => "Unemployment rising",
            Self::Falling => "Unemployment falling",
            Self::NoTrend => "No trend",
        }
    }
}

/// Trend tags of one history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendTags {
    pub inflation: TrendDirection,
    pub growth: TrendDirection,
    pub unemployment: UnemploymentTrend,
}

impl TrendTags {
    pub fn labels(&self) -> [String; 3] {
        [
            self.inflation.label("Inflation"),
            self.growth.label("GDP"),
            self.unemployment.label().to_string(),
        ]
    }
}
