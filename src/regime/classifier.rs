//! Level classifier.
//!
//! Buckets a scalar indicator value into an ordinal band using immutable
//! threshold tables. Coarse bands (0-5) drive the live snapshot; fine
//! half-step levels drive historical sequences. Both are total over the
//! reals: the lowest and highest bands are open-ended.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Which threshold table applies to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorClass {
    /// Year-over-year price index change, in percent.
    Inflation,
    /// Year-over-year output change, in percent.
    Growth,
}

/// Coarse ordinal band in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CoarseBand(u8);

impl CoarseBand {
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Every coarse band, lowest first.
    pub fn all() -> impl Iterator<Item = CoarseBand> {
        (0..=Self::MAX).map(CoarseBand)
    }

    /// Human-readable meaning of the band.
    pub fn description(&self, class: IndicatorClass) -> &'static str {
        match (class, self.0) {
            (IndicatorClass::Inflation, 0) => "Deflation risk",
            (IndicatorClass::Inflation, 1) => "Very weak price dynamics",
            (IndicatorClass::Inflation, 2) => "Weak price dynamics",
            (IndicatorClass::Inflation, 3) => "Moderate price dynamics",
            (IndicatorClass::Inflation, 4) => "Strong price dynamics",
            (IndicatorClass::Inflation, _) => "Hyperinflation risk",
            (IndicatorClass::Growth, 0) => "Recession risk",
            (IndicatorClass::Growth, 1) => "Negative growth",
            (IndicatorClass::Growth, 2) => "Weak growth",
            (IndicatorClass::Growth, 3) => "Moderate growth",
            (IndicatorClass::Growth, 4) => "Strong growth",
            (IndicatorClass::Growth, _) => "Overheating risk",
        }
    }
}

impl TryFrom<u8> for CoarseBand {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("coarse band {} out of range 0..=5", level))
    }
}

impl From<CoarseBand> for u8 {
    fn from(band: CoarseBand) -> Self {
        band.0
    }
}

/// Fine-grained level of a historical observation (half steps).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FineLevel(f64);

impl FineLevel {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Thresholds for the six coarse bands.
///
/// Band `b` covers `[edges[b-1], edges[b])`; band 0 is everything below
/// `edges[0]` and band 5 everything from `edges[4]` up. `floor` and
/// `ceiling` bound the two open tails for position-in-band scaling only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub edges: [f64; 5],
    pub floor: f64,
    pub ceiling: f64,
}

impl BandThresholds {
    pub fn inflation() -> Self {
        Self {
            edges: [0.0, 1.0, 2.5, 3.5, 4.5],
            floor: -4.0,
            ceiling: 8.0,
        }
    }

    pub fn growth() -> Self {
        Self {
            edges: [-2.0, 0.0, 1.0, 2.5, 4.0],
            floor: -6.0,
            ceiling: 8.0,
        }
    }

    /// Band containing `value`.
    pub fn band_for(&self, value: f64) -> CoarseBand {
        CoarseBand(count_at_or_below(&self.edges, value) as u8)
    }

    /// Numeric interval `(lower, upper)` that defines `band`.
    pub fn range(&self, band: CoarseBand) -> (f64, f64) {
        let b = band.level() as usize;
        let lower = if b == 0 { self.floor } else { self.edges[b - 1] };
        let upper = if b == 5 { self.ceiling } else { self.edges[b] };
        (lower, upper)
    }

    fn validate(&self, name: &str) -> AnalysisResult<()> {
        let mut bounds = vec![self.floor];
        bounds.extend_from_slice(&self.edges);
        bounds.push(self.ceiling);
        ensure_ascending(&bounds, name)
    }
}

/// Thresholds for fine historical levels.
///
/// A value maps to `levels[k]` where `k` is the number of `edges` at or
/// below it, so `levels` has one more entry than `edges`. Fine levels are
/// then digitised into integer regime bands with `regime_edges` the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineThresholds {
    pub edges: Vec<f64>,
    pub levels: Vec<f64>,
    pub regime_edges: Vec<f64>,
}

impl FineThresholds {
    /// Half-step inflation levels 0, 0.5, ..., 5 with edges every 0.5 over `[0, 4.5]`.
    pub fn inflation() -> Self {
        Self {
            edges: (0..=9).map(|i| i as f64 * 0.5).collect(),
            levels: (0..=10).map(|i| i as f64 * 0.5).collect(),
            regime_edges: vec![0.0, 1.0, 2.0, 3.0, 4.0],
        }
    }

    /// Growth levels -2, 0, 0.5, ..., 4, 5.
    ///
    /// Values in `[-2, 0)` share the `0` level so the table stays total.
    pub fn growth() -> Self {
        let mut edges = vec![-2.0];
        edges.extend((0..=8).map(|i| i as f64 * 0.5));

        let mut levels = vec![-2.0, 0.0];
        levels.extend((1..=8).map(|i| i as f64 * 0.5));
        levels.push(5.0);

        Self {
            edges,
            levels,
            regime_edges: vec![-2.0, 0.0, 2.0, 4.0],
        }
    }

    pub fn level_for(&self, value: f64) -> FineLevel {
        let k = count_at_or_below(&self.edges, value);
        FineLevel(self.levels[k])
    }

    /// Integer regime band of a fine level.
    pub fn regime_band(&self, level: FineLevel) -> u8 {
        count_at_or_below(&self.regime_edges, level.value()) as u8
    }

    fn validate(&self, name: &str) -> AnalysisResult<()> {
        ensure_ascending(&self.edges, name)?;
        ensure_ascending(&self.levels, name)?;
        ensure_ascending(&self.regime_edges, name)?;
        if self.levels.len() != self.edges.len() + 1 {
            return Err(AnalysisError::InvalidConfig(format!(
                "{}: {} edges need {} levels, got {}",
                name,
                self.edges.len(),
                self.edges.len() + 1,
                self.levels.len()
            )));
        }
        if self.regime_edges.len() > 9 {
            return Err(AnalysisError::InvalidConfig(format!(
                "{}: at most 9 regime edges fit a two-digit code",
                name
            )));
        }
        Ok(())
    }
}

fn count_at_or_below(edges: &[f64], value: f64) -> usize {
    edges.iter().take_while(|&&edge| edge <= value).count()
}

fn ensure_ascending(values: &[f64], name: &str) -> AnalysisResult<()> {
    if values.windows(2).any(|w| w[1] <= w[0]) || values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidConfig(format!(
            "{}: thresholds must be finite and strictly ascending",
            name
        )));
    }
    Ok(())
}

/// Threshold tables for both indicator classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub inflation: BandThresholds,
    pub growth: BandThresholds,
    pub fine_inflation: FineThresholds,
    pub fine_growth: FineThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            inflation: BandThresholds::inflation(),
            growth: BandThresholds::growth(),
            fine_inflation: FineThresholds::inflation(),
            fine_growth: FineThresholds::growth(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        self.inflation.validate("inflation")?;
        self.growth.validate("growth")?;
        self.fine_inflation.validate("fine_inflation")?;
        self.fine_growth.validate("fine_growth")
    }
}

/// Level classifier.
#[derive(Debug, Clone, Default)]
pub struct LevelClassifier {
    config: ClassifierConfig,
}

impl LevelClassifier {
    /// Create a classifier over validated threshold tables.
    pub fn new(config: ClassifierConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn thresholds(&self, class: IndicatorClass) -> &BandThresholds {
        match class {
            IndicatorClass::Inflation => &self.config.inflation,
            IndicatorClass::Growth => &self.config.growth,
        }
    }

    fn fine_thresholds(&self, class: IndicatorClass) -> &FineThresholds {
        match class {
            IndicatorClass::Inflation => &self.config.fine_inflation,
            IndicatorClass::Growth => &self.config.fine_growth,
        }
    }

    /// Coarse band (0-5) of a value.
    pub fn classify_coarse(&self, value: f64, class: IndicatorClass) -> CoarseBand {
        self.thresholds(class).band_for(value)
    }

    /// Fine half-step level of a value.
    pub fn classify_fine(&self, value: f64, class: IndicatorClass) -> FineLevel {
        self.fine_thresholds(class).level_for(value)
    }

    /// Fine levels of a whole metric sequence.
    pub fn classify_fine_series(&self, values: &[f64], class: IndicatorClass) -> Vec<FineLevel> {
        values
            .iter()
            .map(|&v| self.classify_fine(v, class))
            .collect()
    }

    /// Integer regime band of a fine level.
    pub fn regime_band(&self, level: FineLevel, class: IndicatorClass) -> u8 {
        self.fine_thresholds(class).regime_band(level)
    }

    /// Interval that defines a coarse band.
    pub fn band_range(&self, band: CoarseBand, class: IndicatorClass) -> (f64, f64) {
        self.thresholds(class).range(band)
    }
}
