//! Indicator transformer.
//!
//! Turns raw level series (price index, output index, rates) into derived
//! metrics:
//! - Lagged percentage change (`(x[i] / x[i-L] - 1) * 100`)
//! - Period difference (`x[i] - x[i-L]`)
//! - Monthly resampling with forward fill for mixed-frequency inputs
//!
//! Every lag-indexed access is preceded by an explicit length check.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::{IndicatorSeries, Observation};
use crate::error::{AnalysisError, AnalysisResult};

/// Lag for year-over-year change on monthly data.
pub const MONTHLY_YOY_LAG: usize = 12;

/// Lag for year-over-year change on quarterly data.
pub const QUARTERLY_YOY_LAG: usize = 4;

/// Which observation a historical metric sequence ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAlignment {
    /// The last value is computed from the latest observation, so the
    /// history ends on the same value as the snapshot.
    #[default]
    IncludeLatest,
    /// The last value is computed from the second-to-last observation,
    /// lagging the snapshot by one period.
    PreviousPeriod,
}

/// A derived metric sequence, dated by the observation it was computed at.
///
/// Recomputed fresh for every analysis call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetric {
    observations: Vec<Observation>,
}

impl DerivedMetric {
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Percentage change over `lag` periods, one value per index `i >= lag`.
pub fn pct_change(series: &IndicatorSeries, lag: usize) -> AnalysisResult<DerivedMetric> {
    lagged(series, lag, "percentage change", |current, base, date| {
        if base == 0.0 {
            return Err(AnalysisError::DegenerateStatistics(format!(
                "{} base value is zero at lag {} before {}",
                series.kind(),
                lag,
                date
            )));
        }
        Ok((current / base - 1.0) * 100.0)
    })
}

/// Percentage change of the latest observation over `lag` periods.
pub fn latest_pct_change(series: &IndicatorSeries, lag: usize) -> AnalysisResult<Observation> {
    series.require_len(lag + 1)?;
    let observations = series.observations();
    let tail = IndicatorSeries::new(
        series.kind(),
        observations[observations.len() - lag - 1..].to_vec(),
    )?;

    let metric = pct_change(&tail, lag)?;
    metric
        .last()
        .copied()
        .ok_or_else(|| AnalysisError::insufficient(series.kind().as_str(), lag + 1, series.len()))
}

/// Percentage-change history with the requested alignment.
pub fn pct_change_history(
    series: &IndicatorSeries,
    lag: usize,
    alignment: HistoryAlignment,
) -> AnalysisResult<DerivedMetric> {
    match alignment {
        HistoryAlignment::IncludeLatest => pct_change(series, lag),
        HistoryAlignment::PreviousPeriod => {
            series.require_non_empty("percentage change history")?;
            let observations = series.observations();
            let trimmed = IndicatorSeries::new(
                series.kind(),
                observations[..observations.len() - 1].to_vec(),
            )?;
            pct_change(&trimmed, lag)
        }
    }
}

/// Difference over `periods` periods, one value per index `i >= periods`.
pub fn diff(series: &IndicatorSeries, periods: usize) -> AnalysisResult<DerivedMetric> {
    lagged(series, periods, "difference", |current, base, _| Ok(current - base))
}

fn lagged<F>(
    series: &IndicatorSeries,
    lag: usize,
    what: &str,
    op: F,
) -> AnalysisResult<DerivedMetric>
where
    F: Fn(f64, f64, NaiveDate) -> AnalysisResult<f64>,
{
    if lag == 0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "{} lag must be at least 1",
            what
        )));
    }
    series.require_len(lag + 1)?;

    let observations = series.observations();
    let values = observations
        .iter()
        .enumerate()
        .skip(lag)
        .map(|(i, obs)| {
            let base = observations[i - lag].value;
            op(obs.value, base, obs.date).map(|value| Observation::new(obs.date, value))
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(DerivedMetric {
        observations: values,
    })
}

/// Last day of `month` in `year`.
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Resample to one observation per calendar month, dated at month end.
///
/// Each month takes the last observation that falls inside it; months
/// without an observation carry the previous value forward.
pub fn resample_monthly(series: &IndicatorSeries) -> AnalysisResult<IndicatorSeries> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(AnalysisError::EmptySeries {
                indicator: series.kind(),
                context: "monthly resample".to_string(),
            })
        }
    };

    let mut resampled = Vec::new();
    let mut source = series.observations().iter().peekable();
    let mut carried = first.value;
    let (mut year, mut month) = (first.date.year(), first.date.month());

    loop {
        let end = month_end(year, month).ok_or_else(|| {
            AnalysisError::InvalidSeries(format!("month {}-{} out of range", year, month))
        })?;

        while let Some(obs) = source.next_if(|o| o.date <= end) {
            carried = obs.value;
        }
        resampled.push(Observation::new(end, carried));

        if (year, month) >= (last.date.year(), last.date.month()) {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    IndicatorSeries::new(series.kind(), resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::IndicatorKind;
    use approx::assert_relative_eq;

    fn monthly(values: &[f64]) -> IndicatorSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        IndicatorSeries::from_pairs(
            IndicatorKind::PriceIndex,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let date = start.checked_add_months(chrono::Months::new(i as u32)).unwrap();
                    (date, v)
                }),
        )
        .unwrap()
    }

    #[test]
    fn test_pct_change_length_and_values() {
        let series = monthly(&[100.0, 101.0, 102.0, 110.0]);
        let metric = pct_change(&series, 2).unwrap();

        assert_eq!(metric.len(), 2);
        assert_relative_eq!(metric.values()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(metric.values()[1], (110.0 / 101.0 - 1.0) * 100.0, epsilon = 1e-12);
        assert_eq!(metric.dates()[1], series.last().unwrap().date);
    }

    #[test]
    fn test_pct_change_too_short() {
        let series = monthly(&[100.0, 101.0]);
        assert_eq!(
            pct_change(&series, 2),
            Err(AnalysisError::insufficient("price index", 3, 2))
        );
    }

    #[test]
    fn test_pct_change_zero_base() {
        let series = monthly(&[0.0, 1.0]);
        assert!(matches!(
            pct_change(&series, 1),
            Err(AnalysisError::DegenerateStatistics(_))
        ));
    }

    #[test]
    fn test_latest_pct_change_uses_last_observation() {
        let mut values: Vec<f64> = (0..13).map(|i| 100.0 + i as f64).collect();
        values[12] = 102.0;
        let series = monthly(&values);

        let latest = latest_pct_change(&series, MONTHLY_YOY_LAG).unwrap();
        assert_relative_eq!(latest.value, 2.0, epsilon = 1e-12);
        assert_eq!(latest.date, series.last().unwrap().date);
    }

    #[test]
    fn test_history_include_latest_matches_snapshot() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 * 1.002f64.powi(i)).collect();
        let series = monthly(&values);

        let history =
            pct_change_history(&series, MONTHLY_YOY_LAG, HistoryAlignment::IncludeLatest).unwrap();
        let latest = latest_pct_change(&series, MONTHLY_YOY_LAG).unwrap();

        assert_eq!(history.len(), 8);
        assert_eq!(*history.last().unwrap(), latest);
    }

    #[test]
    fn test_history_previous_period_lags_by_one() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + (i * i) as f64).collect();
        let series = monthly(&values);

        let aligned =
            pct_change_history(&series, MONTHLY_YOY_LAG, HistoryAlignment::IncludeLatest).unwrap();
        let lagged =
            pct_change_history(&series, MONTHLY_YOY_LAG, HistoryAlignment::PreviousPeriod).unwrap();

        assert_eq!(lagged.len(), aligned.len() - 1);
        assert_eq!(lagged.observations(), &aligned.observations()[..aligned.len() - 1]);
        // numerator is the second-to-last observation
        assert_relative_eq!(
            lagged.last().unwrap().value,
            (values[18] / values[6] - 1.0) * 100.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_diff() {
        let series = monthly(&[5.0, 5.2, 5.1, 4.8, 4.6]);
        let changes = diff(&series, 3).unwrap();
        let values = changes.values();
        assert_eq!(values.len(), 2);
        assert_relative_eq!(values[0], -0.2, epsilon = 1e-12);
        assert_relative_eq!(values[1], -0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_lag_rejected() {
        let series = monthly(&[1.0, 2.0]);
        assert!(matches!(diff(&series, 0), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_resample_quarterly_to_monthly() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let quarterly = IndicatorSeries::from_pairs(
            IndicatorKind::OutputIndex,
            vec![(d(2023, 1, 1), 100.0), (d(2023, 4, 1), 101.0), (d(2023, 7, 1), 103.0)],
        )
        .unwrap();

        let monthly = resample_monthly(&quarterly).unwrap();

        assert_eq!(monthly.len(), 7);
        assert_eq!(monthly.first().unwrap().date, d(2023, 1, 31));
        assert_eq!(monthly.last().unwrap().date, d(2023, 7, 31));
        assert_eq!(
            monthly.values(),
            vec![100.0, 100.0, 100.0, 101.0, 101.0, 101.0, 103.0]
        );
    }

    #[test]
    fn test_resample_takes_last_value_in_month() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let series = IndicatorSeries::from_pairs(
            IndicatorKind::PolicyRate,
            vec![(d(2023, 12, 1), 4.0), (d(2023, 12, 20), 4.5), (d(2024, 1, 15), 4.25)],
        )
        .unwrap();

        let monthly = resample_monthly(&series).unwrap();
        assert_eq!(monthly.dates(), vec![d(2023, 12, 31), d(2024, 1, 31)]);
        assert_eq!(monthly.values(), vec![4.5, 4.25]);
    }
}
