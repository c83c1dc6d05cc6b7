//! Rolling statistics over indicator values.

use std::collections::VecDeque;

use statrs::statistics::Statistics;

use crate::error::{AnalysisError, AnalysisResult};

/// Fixed-capacity window over the most recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a value, evicting the oldest once the window is full.
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the window, only once it is full.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.capacity as f64)
    }
}

/// Rolling mean over complete windows.
///
/// The output has `values.len() - window + 1` entries; leading positions
/// without a full window produce nothing.
pub fn rolling_mean(values: &[f64], window: usize) -> AnalysisResult<Vec<f64>> {
    if window == 0 {
        return Err(AnalysisError::InvalidConfig(
            "rolling window must be at least 1".to_string(),
        ));
    }
    if values.len() < window {
        return Err(AnalysisError::insufficient("rolling mean", window, values.len()));
    }

    let mut rolling = RollingWindow::new(window);
    let mut means = Vec::with_capacity(values.len() + 1 - window);
    for &value in values {
        rolling.push(value);
        if let Some(mean) = rolling.mean() {
            means.push(mean);
        }
    }
    Ok(means)
}

/// Z-score of the latest value against the whole history.
///
/// Uses the sample standard deviation. A zero deviation has no meaningful
/// z-score and is reported as `DegenerateStatistics`.
pub fn zscore(history: &[f64]) -> AnalysisResult<f64> {
    let latest = match history.last() {
        Some(&v) if history.len() >= 2 => v,
        _ => return Err(AnalysisError::insufficient("z-score", 2, history.len())),
    };

    let mean = history.iter().mean();
    let std_dev = history.iter().std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return Err(AnalysisError::DegenerateStatistics(format!(
            "standard deviation is {} over {} values",
            std_dev,
            history.len()
        )));
    }

    Ok((latest - mean) / std_dev)
}
