//! Macro regime classification module.
//!
//! Classifies inflation and growth into ordinal levels and names the
//! resulting regime:
//! - Coarse bands 0-5 for the live snapshot, fine half-step levels for history
//! - Five-way regime (four quadrants plus a gray zone)
//! - Position of a value within its band
//! - Regime runs, durations and a duration-based outlook
//! - Short-horizon trend tags

pub mod classifier;
pub mod detector;
pub mod duration;
pub mod position;
pub mod trend;

pub use classifier::{
    BandThresholds, ClassifierConfig, CoarseBand, FineLevel, FineThresholds, IndicatorClass,
    LevelClassifier,
};
pub use detector::{
    detect_regime, detect_regime_fine, detect_regime_levels, MacroRegime, Quadrant,
};
pub use duration::{
    analyze_durations, encode_regime_codes, DurationAnalysis, DurationOutlook, RegimeCode,
    RegimeRun, RegimeStats,
};
pub use position::{position_pct, BandPosition, PositionWarning};
pub use trend::{TrendDirection, TrendTags, UnemploymentTrend};
