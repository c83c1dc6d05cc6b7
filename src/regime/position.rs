//! Position-in-band calculation.
//!
//! Rescales a value linearly into the interval that produced its band:
//! 0% at the lower bound, 100% at the upper bound. Results outside
//! `[0, 100]` are kept as-is and flagged, since they mean the value has
//! moved past the band edge since it was classified.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::classifier::{CoarseBand, IndicatorClass, LevelClassifier};

/// Why a position fell outside its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionWarning {
    /// Position below 0%.
    BelowBand,
    /// Position above 100%.
    AboveBand,
}

impl PositionWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::BelowBand => "Negative position percentage, value is below its band",
            Self::AboveBand => "Position percentage exceeds 100%, value is above its band",
        }
    }
}

/// Position of a value within its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPosition {
    pub pct: f64,
    pub warning: Option<PositionWarning>,
}

impl BandPosition {
    pub fn is_in_range(&self) -> bool {
        self.warning.is_none()
    }
}

/// Position of `value` within `band`, in percent.
pub fn position_pct(
    classifier: &LevelClassifier,
    value: f64,
    band: CoarseBand,
    class: IndicatorClass,
) -> BandPosition {
    let (lower, upper) = classifier.band_range(band, class);
    let pct = (value - lower) / (upper - lower) * 100.0;

    let warning = if pct < 0.0 {
        Some(PositionWarning::BelowBand)
    } else if pct > 100.0 {
        Some(PositionWarning::AboveBand)
    } else {
        None
    };

    if let Some(w) = warning {
        warn!(
            "{:?} value {:.2} at {:.1}% of band {} [{}, {}]: {}",
            class,
            value,
            pct,
            band.level(),
            lower,
            upper,
            w.message()
        );
    }

    BandPosition { pct, warning }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inflation_position() {
        let c = LevelClassifier::default();
        let band = c.classify_coarse(1.8, IndicatorClass::Inflation);
        assert_eq!(band.level(), 2);

        let pos = position_pct(&c, 1.8, band, IndicatorClass::Inflation);
        assert_relative_eq!(pos.pct, 53.333333333333336, epsilon = 1e-9);
        assert!(pos.is_in_range());
    }

    #[test]
    fn test_bounds_map_to_0_and_100() {
        let c = LevelClassifier::default();
        for class in [IndicatorClass::Inflation, IndicatorClass::Growth] {
            for band in CoarseBand::all() {
                let (lower, upper) = c.band_range(band, class);
                let at_lower = position_pct(&c, lower, band, class).pct;
                let at_upper = position_pct(&c, upper, band, class).pct;
                assert_relative_eq!(at_lower, 0.0, epsilon = 1e-9);
                assert_relative_eq!(at_upper, 100.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_monotonic_within_band() {
        let c = LevelClassifier::default();
        for class in [IndicatorClass::Inflation, IndicatorClass::Growth] {
            for band in CoarseBand::all() {
                let (lower, upper) = c.band_range(band, class);
                let mut previous = f64::NEG_INFINITY;
                for step in 0..=50 {
                    let x = lower + (upper - lower) * step as f64 / 50.0;
                    let pct = position_pct(&c, x, band, class).pct;
                    assert!(pct >= previous);
                    previous = pct;
                }
            }
        }
    }

    #[test]
    fn test_growth_band_one_uses_its_own_interval() {
        let c = LevelClassifier::default();
        let band = c.classify_coarse(-1.0, IndicatorClass::Growth);
        assert_eq!(band.level(), 1);
        assert_relative_eq!(position_pct(&c, -1.0, band, IndicatorClass::Growth).pct, 50.0);
    }

    #[test]
    fn test_out_of_range_is_flagged_not_clamped() {
        let c = LevelClassifier::default();
        let band = CoarseBand::new(2).unwrap();

        let above = position_pct(&c, 3.0, band, IndicatorClass::Inflation);
        assert_eq!(above.warning, Some(PositionWarning::AboveBand));
        assert_relative_eq!(above.pct, 2.0 / 1.5 * 100.0, epsilon = 1e-9);

        let below = position_pct(&c, 0.25, band, IndicatorClass::Inflation);
        assert_eq!(below.warning, Some(PositionWarning::BelowBand));
        assert!(below.pct < 0.0);

        // open tail: 10% inflation sits past the synthetic 8% ceiling
        let tail = position_pct(&c, 10.0, CoarseBand::new(5).unwrap(), IndicatorClass::Inflation);
        assert_eq!(tail.warning, Some(PositionWarning::AboveBand));
    }
}
