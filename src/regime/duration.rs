//! Regime transition and duration analysis.
//!
//! Each historical observation is encoded as `inflation_band * 10 +
//! growth_band`. Change points are the indices where the code differs from
//! the previous one, and the runs between them partition the sequence. The
//! current run is compared to the average run length to produce a rough
//! outlook: how many periods are left, or how overdue a change is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::{FineLevel, IndicatorClass, LevelClassifier};
use crate::error::{AnalysisError, AnalysisResult};

/// Combined regime code of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RegimeCode(u8);

impl RegimeCode {
    /// Largest code: two decimal digits.
    pub const MAX: u8 = 99;

    /// Both bands are single digits; regime edge tables hold at most nine edges.
    pub fn encode(inflation_band: u8, growth_band: u8) -> Self {
        Self(inflation_band * 10 + growth_band)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn inflation_band(&self) -> u8 {
        self.0 / 10
    }

    pub fn growth_band(&self) -> u8 {
        self.0 % 10
    }
}

impl TryFrom<u8> for RegimeCode {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code > Self::MAX {
            return Err(format!("regime code {} is not two digits", code));
        }
        Ok(Self(code))
    }
}

impl From<RegimeCode> for u8 {
    fn from(code: RegimeCode) -> Self {
        code.0
    }
}

impl fmt::Display for RegimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Maximal stretch of observations sharing one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRun {
    pub start: usize,
    pub length: usize,
    pub code: RegimeCode,
}

impl RegimeRun {
    /// Index one past the last observation of the run.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Forward-looking reading of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationOutlook {
    /// Current run is at or below the average length.
    Remaining { periods: f64 },
    /// Current run has outlasted the average.
    Overdue { periods: f64 },
}

impl DurationOutlook {
    pub fn message(&self) -> String {
        match self {
            Self::Remaining { periods } => format!("{:.2} periods remaining", periods),
            Self::Overdue { periods } => {
                format!("Change is imminent, overdue by {:.2} periods", periods)
            }
        }
    }
}

/// Occupancy of one regime code over the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeStats {
    pub code: RegimeCode,
    pub periods: usize,
    pub runs: usize,
    pub pct_of_total: f64,
    pub avg_run_length: f64,
}

/// Result of analysing a regime code sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationAnalysis {
    /// Indices where the code changes from the previous observation.
    pub change_points: Vec<usize>,
    /// Runs in chronological order; the last one is the current regime.
    pub runs: Vec<RegimeRun>,
    /// Mean run length.
    pub avg_duration: f64,
    /// Length of the current (last) run.
    pub current_duration: usize,
    /// `avg_duration - current_duration`; negative once the run is overdue.
    pub predicted_remaining: f64,
    /// Current run as a percentage of the average.
    pub pct_of_avg: f64,
    pub outlook: DurationOutlook,
}

impl DurationAnalysis {
    pub fn durations(&self) -> Vec<usize> {
        self.runs.iter().map(|r| r.length).collect()
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self.outlook, DurationOutlook::Overdue { .. })
    }

    pub fn current_code(&self) -> Option<RegimeCode> {
        self.runs.last().map(|r| r.code)
    }

    /// Per-code occupancy statistics.
    pub fn stats(&self) -> BTreeMap<RegimeCode, RegimeStats> {
        let total: usize = self.runs.iter().map(|r| r.length).sum();
        let mut stats: BTreeMap<RegimeCode, RegimeStats> = BTreeMap::new();

        for run in &self.runs {
            let entry = stats.entry(run.code).or_insert_with(|| RegimeStats {
                code: run.code,
                periods: 0,
                runs: 0,
                pct_of_total: 0.0,
                avg_run_length: 0.0,
            });
            entry.periods += run.length;
            entry.runs += 1;
        }

        for entry in stats.values_mut() {
            entry.pct_of_total = entry.periods as f64 / total as f64 * 100.0;
            entry.avg_run_length = entry.periods as f64 / entry.runs as f64;
        }

        stats
    }
}

/// Encode parallel fine-level sequences into regime codes.
///
/// The longer sequence is truncated from the front so both end on their most
/// recent observation.
pub fn encode_regime_codes(
    classifier: &LevelClassifier,
    inflation: &[FineLevel],
    growth: &[FineLevel],
) -> Vec<RegimeCode> {
    let len = inflation.len().min(growth.len());
    let inflation = &inflation[inflation.len() - len..];
    let growth = &growth[growth.len() - len..];

    inflation
        .iter()
        .zip(growth)
        .map(|(&infl, &gdp)| {
            RegimeCode::encode(
                classifier.regime_band(infl, IndicatorClass::Inflation),
                classifier.regime_band(gdp, IndicatorClass::Growth),
            )
        })
        .collect()
}

/// Analyse run lengths of a regime code sequence.
///
/// Needs at least one change point; without one the average duration of
/// completed regimes is undefined.
pub fn analyze_durations(codes: &[RegimeCode]) -> AnalysisResult<DurationAnalysis> {
    let change_points: Vec<usize> = codes
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| i + 1)
        .collect();

    if change_points.is_empty() {
        return Err(AnalysisError::insufficient(
            "regime change points",
            1,
            0,
        ));
    }

    let mut boundaries = Vec::with_capacity(change_points.len() + 2);
    boundaries.push(0);
    boundaries.extend_from_slice(&change_points);
    boundaries.push(codes.len());

    let runs: Vec<RegimeRun> = boundaries
        .windows(2)
        .map(|w| RegimeRun {
            start: w[0],
            length: w[1] - w[0],
            code: codes[w[0]],
        })
        .collect();

    let avg_duration = codes.len() as f64 / runs.len() as f64;
    let current_duration = runs.last().map(|r| r.length).unwrap_or_default();
    let predicted_remaining = avg_duration - current_duration as f64;
    let pct_of_avg = current_duration as f64 * 100.0 / avg_duration;

    let outlook = if pct_of_avg > 100.0 {
        DurationOutlook::Overdue {
            periods: -predicted_remaining,
        }
    } else {
        DurationOutlook::Remaining {
            periods: predicted_remaining,
        }
    };

    Ok(DurationAnalysis {
        change_points,
        runs,
        avg_duration,
        current_duration,
        predicted_remaining,
        pct_of_avg,
        outlook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn codes(raw: &[u8]) -> Vec<RegimeCode> {
        raw.iter().map(|&c| code(c)).collect()
    }

    fn code(raw: u8) -> RegimeCode {
        RegimeCode::try_from(raw).unwrap()
    }

    #[test]
    fn test_overdue_regime() {
        let analysis = analyze_durations(&codes(&[0, 0, 0, 10, 10, 20, 20, 20])).unwrap();

        assert_eq!(analysis.change_points, vec![3, 5]);
        assert_eq!(analysis.durations(), vec![3, 2, 3]);
        assert_relative_eq!(analysis.avg_duration, 8.0 / 3.0, epsilon = 1e-12);
        assert_eq!(analysis.current_duration, 3);
        assert_relative_eq!(analysis.pct_of_avg, 112.5, epsilon = 1e-9);
        assert!(analysis.predicted_remaining < 0.0);
        assert!(analysis.is_overdue());
        assert_eq!(
            analysis.outlook.message(),
            "Change is imminent, overdue by 0.33 periods"
        );
    }

    #[test]
    fn test_remaining_regime() {
        let analysis = analyze_durations(&codes(&[11, 11, 11, 11, 21, 21, 21, 21, 32])).unwrap();

        assert_eq!(analysis.durations(), vec![4, 4, 1]);
        assert_relative_eq!(analysis.avg_duration, 3.0);
        assert_relative_eq!(analysis.predicted_remaining, 2.0);
        assert!(!analysis.is_overdue());
        assert_eq!(analysis.outlook.message(), "2.00 periods remaining");
        assert_eq!(analysis.current_code(), Some(code(32)));
    }

    #[test]
    fn test_runs_partition_sequence() {
        let seq = codes(&[1, 1, 2, 3, 3, 3, 2, 2, 1, 4, 4]);
        let analysis = analyze_durations(&seq).unwrap();

        let durations = analysis.durations();
        assert_eq!(durations.iter().sum::<usize>(), seq.len());
        assert_eq!(durations.len(), analysis.change_points.len() + 1);

        let mut expected_start = 0;
        for run in &analysis.runs {
            assert_eq!(run.start, expected_start);
            assert!(seq[run.start..run.end()].iter().all(|&c| c == run.code));
            expected_start = run.end();
        }
        assert_eq!(expected_start, seq.len());
    }

    #[test]
    fn test_no_change_points_is_an_error() {
        let result = analyze_durations(&codes(&[22, 22, 22, 22]));
        assert!(matches!(result, Err(AnalysisError::InsufficientHistory { .. })));

        assert!(analyze_durations(&[]).is_err());
    }

    #[test]
    fn test_stats() {
        let analysis = analyze_durations(&codes(&[0, 0, 10, 0, 0, 0, 10, 10])).unwrap();
        let stats = analysis.stats();

        let zero = &stats[&code(0)];
        assert_eq!(zero.periods, 5);
        assert_eq!(zero.runs, 2);
        assert_relative_eq!(zero.avg_run_length, 2.5);
        assert_relative_eq!(zero.pct_of_total, 62.5);

        let ten = &stats[&code(10)];
        assert_eq!(ten.periods, 3);
        assert_eq!(ten.runs, 2);
    }

    #[test]
    fn test_encode_aligns_from_most_recent() {
        let classifier = LevelClassifier::default();
        let inflation: Vec<FineLevel> =
            [0.5, 1.0, 2.5, 3.0].iter().map(|&v| FineLevel::new(v)).collect();
        let growth: Vec<FineLevel> = [-2.0, 0.5].iter().map(|&v| FineLevel::new(v)).collect();

        let encoded = encode_regime_codes(&classifier, &inflation, &growth);

        // inflation 2.5 -> band 3, growth -2 -> band 1; 3.0 -> 4, 0.5 -> 2
        assert_eq!(encoded, codes(&[31, 42]));
        assert_eq!(encoded[1].inflation_band(), 4);
        assert_eq!(encoded[1].growth_band(), 2);
    }

    #[test]
    fn test_code_display() {
        assert_eq!(RegimeCode::encode(0, 3).to_string(), "03");
        assert_eq!(RegimeCode::encode(4, 2).to_string(), "42");
    }

    #[test]
    fn test_code_from_raw_value() {
        let parsed = RegimeCode::try_from(42u8).unwrap();
        assert_eq!(parsed, RegimeCode::encode(4, 2));
        assert_eq!(u8::from(parsed), 42);

        assert!(RegimeCode::try_from(99u8).is_ok());
        assert!(RegimeCode::try_from(100u8).is_err());
        assert!(RegimeCode::try_from(255u8).is_err());
    }

    #[test]
    fn test_code_serde() {
        let encoded = serde_json::to_string(&RegimeCode::encode(5, 3)).unwrap();
        assert_eq!(encoded, "53");
        assert!(serde_json::from_str::<RegimeCode>("250").is_err());
    }
}
