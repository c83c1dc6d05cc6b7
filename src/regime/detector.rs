//! Macro regime detection.
//!
//! Combines an inflation level and a growth level into one of five named
//! regimes:
//! - Inflation + Growth: inflation >= 2, growth >= 2
//! - Inflation + Recession: inflation >= 2, growth <= 1
//! - Deflation + Growth: inflation <= 1, growth >= 2
//! - Deflation + Recession: inflation <= 1, growth <= 1
//! - Indeterminate: anything else
//!
//! With integer coarse bands every pair lands in one of the first four
//! regimes. The gray zone is only reachable with fractional (fine) levels
//! strictly between 1 and 2.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::{CoarseBand, FineLevel};

/// Level at or above which a side counts as positive.
const POSITIVE_LEVEL: f64 = 2.0;

/// Level at or below which a side counts as negative.
const NEGATIVE_LEVEL: f64 = 1.0;

/// Named macro regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroRegime {
    InflationGrowth,
    InflationRecession,
    DeflationGrowth,
    DeflationRecession,
    /// Gray zone between the negative and positive thresholds.
    Indeterminate,
}

impl MacroRegime {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InflationGrowth => "Inflation+Growth",
            Self::InflationRecession => "Inflation+Recession",
            Self::DeflationGrowth => "Deflation+Growth",
            Self::DeflationRecession => "Deflation+Recession",
            Self::Indeterminate => "Indeterminate/Gray",
        }
    }

    /// Whether a quadrant regime was decided.
    pub fn is_determinate(&self) -> bool {
        !matches!(self, Self::Indeterminate)
    }
}

impl fmt::Display for MacroRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detect the regime of a pair of coarse bands.
pub fn detect_regime(inflation: CoarseBand, growth: CoarseBand) -> MacroRegime {
    detect_regime_levels(inflation.level() as f64, growth.level() as f64)
}

/// Detect the regime of a pair of fine levels.
pub fn detect_regime_fine(inflation: FineLevel, growth: FineLevel) -> MacroRegime {
    detect_regime_levels(inflation.value(), growth.value())
}

/// Detect the regime of arbitrary numeric levels.
pub fn detect_regime_levels(inflation: f64, growth: f64) -> MacroRegime {
    let infl_up = inflation >= POSITIVE_LEVEL;
    let infl_down = inflation <= NEGATIVE_LEVEL;
    let gdp_up = growth >= POSITIVE_LEVEL;
    let gdp_down = growth <= NEGATIVE_LEVEL;

    match (infl_up, infl_down, gdp_up, gdp_down) {
        (true, _, true, _) => MacroRegime::InflationGrowth,
        (true, _, _, true) => MacroRegime::InflationRecession,
        (_, true, true, _) => MacroRegime::DeflationGrowth,
        (_, true, _, true) => MacroRegime::DeflationRecession,
        _ => MacroRegime::Indeterminate,
    }
}

/// Allocation quadrant: positive/negative inflation crossed with
/// positive/negative growth, split at level 2.
///
/// Unlike [`MacroRegime`] this split is exhaustive; there is no gray zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Inflation +, growth +.
    InflationGrowth,
    /// Inflation +, growth -.
    InflationContraction,
    /// Inflation -, growth +.
    DisinflationGrowth,
    /// Inflation -, growth -.
    DisinflationContraction,
}

impl Quadrant {
    pub fn from_bands(inflation: CoarseBand, growth: CoarseBand) -> Self {
        Self::from_levels(inflation.level() as f64, growth.level() as f64)
    }

    pub fn from_fine(inflation: FineLevel, growth: FineLevel) -> Self {
        Self::from_levels(inflation.value(), growth.value())
    }

    pub fn from_levels(inflation: f64, growth: f64) -> Self {
        match (inflation >= POSITIVE_LEVEL, growth >= POSITIVE_LEVEL) {
            (true, true) => Self::InflationGrowth,
            (true, false) => Self::InflationContraction,
            (false, true) => Self::DisinflationGrowth,
            (false, false) => Self::DisinflationContraction,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InflationGrowth => "Inflation + / Growth +",
            Self::InflationContraction => "Inflation + / Growth -",
            Self::DisinflationGrowth => "Inflation - / Growth +",
            Self::DisinflationContraction => "Inflation - / Growth -",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(level: u8) -> CoarseBand {
        CoarseBand::new(level).unwrap()
    }

    #[test]
    fn test_quadrant_regimes() {
        assert_eq!(detect_regime(band(2), band(2)), MacroRegime::InflationGrowth);
        assert_eq!(detect_regime(band(5), band(0)), MacroRegime::InflationRecession);
        assert_eq!(detect_regime(band(1), band(3)), MacroRegime::DeflationGrowth);
        assert_eq!(detect_regime(band(0), band(1)), MacroRegime::DeflationRecession);
    }

    #[test]
    fn test_gray_zone_unreachable_for_coarse_bands() {
        // If this fails, the coarse thresholds changed and the gray zone
        // became reachable for integer bands.
        for infl in CoarseBand::all() {
            for gdp in CoarseBand::all() {
                let regime = detect_regime(infl, gdp);
                assert!(regime.is_determinate(), "{:?}/{:?} -> {:?}", infl, gdp, regime);
                assert_eq!(regime, detect_regime(infl, gdp));
            }
        }
    }

    #[test]
    fn test_gray_zone_reachable_for_fine_levels() {
        let regime = detect_regime_fine(FineLevel::new(1.5), FineLevel::new(3.0));
        assert_eq!(regime, MacroRegime::Indeterminate);
        assert_eq!(regime.label(), "Indeterminate/Gray");

        let regime = detect_regime_fine(FineLevel::new(2.5), FineLevel::new(1.5));
        assert_eq!(regime, MacroRegime::Indeterminate);
    }

    #[test]
    fn test_quadrant_split_is_exhaustive() {
        assert_eq!(Quadrant::from_bands(band(2), band(2)), Quadrant::InflationGrowth);
        assert_eq!(Quadrant::from_bands(band(4), band(1)), Quadrant::InflationContraction);
        assert_eq!(Quadrant::from_bands(band(1), band(5)), Quadrant::DisinflationGrowth);
        assert_eq!(Quadrant::from_bands(band(0), band(0)), Quadrant::DisinflationContraction);
        // fractional levels below 2 count as negative
        assert_eq!(
            Quadrant::from_fine(FineLevel::new(1.5), FineLevel::new(1.5)),
            Quadrant::DisinflationContraction
        );
    }

    #[test]
    fn test_regime_labels() {
        assert_eq!(MacroRegime::InflationGrowth.to_string(), "Inflation+Growth");
        assert_eq!(MacroRegime::DeflationRecession.label(), "Deflation+Recession");
    }
}
