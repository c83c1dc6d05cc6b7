//! Macro regime analyzer.
//!
//! Runs the full pipeline over a [`MacroDataset`]:
//! 1. Snapshot: latest YoY changes, coarse bands, band positions, regime,
//!    quadrant, allocation and optional pressure diagnostics
//! 2. History: fine-level sequences, regime codes, runs, duration outlook
//!    and trend tags
//!
//! Each call is all-or-nothing: any failure aborts the record.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::config::AnalyzerConfig;
use crate::allocation::{allocate, Allocation};
use crate::data::{IndicatorKind, MacroDataset, Region};
use crate::error::{AnalysisError, AnalysisResult};
use crate::indicators::{
    diff, latest_pct_change, pct_change_history, resample_monthly, PressureDiagnostics,
};
use crate::regime::{
    analyze_durations, detect_regime, detect_regime_fine, encode_regime_codes, position_pct,
    BandPosition, CoarseBand, DurationAnalysis, FineLevel, IndicatorClass, LevelClassifier,
    MacroRegime, Quadrant, RegimeCode, RegimeStats, TrendDirection, TrendTags,
    UnemploymentTrend,
};

/// Live classification of the latest observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSnapshot {
    pub region: Option<Region>,
    /// Date of the latest price-index observation.
    pub date: NaiveDate,
    pub inflation_pct: f64,
    pub growth_pct: f64,
    pub inflation_band: CoarseBand,
    pub growth_band: CoarseBand,
    pub inflation_position: BandPosition,
    pub growth_position: BandPosition,
    pub regime: MacroRegime,
    pub quadrant: Quadrant,
    pub allocation: Allocation,
    pub pressure: Option<PressureDiagnostics>,
}

impl MacroSnapshot {
    pub fn summary(&self) -> String {
        let region = self
            .region
            .map(|r| r.to_string())
            .unwrap_or_else(|| "custom".to_string());

        let mut lines = vec![
            format!("{} macro snapshot as of {}", region, self.date),
            format!(
                "  Inflation: {:.2}% -> band {} ({}), {:.1}% into band",
                self.inflation_pct,
                self.inflation_band.level(),
                self.inflation_band.description(IndicatorClass::Inflation),
                self.inflation_position.pct
            ),
            format!(
                "  Growth:    {:.2}% -> band {} ({}), {:.1}% into band",
                self.growth_pct,
                self.growth_band.level(),
                self.growth_band.description(IndicatorClass::Growth),
                self.growth_position.pct
            ),
            format!("  Regime: {} ({})", self.regime, self.quadrant),
        ];

        let weights: Vec<String> = self
            .allocation
            .weights()
            .iter()
            .filter(|(_, w)| !w.is_zero())
            .map(|(name, w)| format!("{} {}%", name, w))
            .collect();
        lines.push(format!("  Allocation: {}", weights.join(", ")));

        if let Some(p) = &self.pressure {
            lines.push(format!(
                "  Pressure: inflation {:+.2} (adj {:+.2}), growth {:+.2} (adj {:+.2})",
                p.inflation_pressure,
                p.inflation_adjustment,
                p.growth_pressure,
                p.growth_adjustment
            ));
            lines.push(format!(
                "  Policy rate {:.2}% (score {:+}), unemployment {:.2}% (score {:+})",
                p.policy_rate_mean, p.policy_rate_score, p.unemployment_mean, p.unemployment_score
            ));
        }

        lines.join("\n")
    }
}

/// Historical regime record.
///
/// `dates`, `inflation`, `growth`, the level sequences and `codes` have one
/// entry per period and are aligned by position from their most recent
/// value. `dates` label the price-index side; growth comes from a month-end
/// resample of the output series, whose latest value may be several months
/// older than the latest price observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeHistory {
    pub region: Option<Region>,
    pub dates: Vec<NaiveDate>,
    pub inflation: Vec<f64>,
    pub growth: Vec<f64>,
    pub inflation_levels: Vec<FineLevel>,
    pub growth_levels: Vec<FineLevel>,
    pub codes: Vec<RegimeCode>,
    pub durations: DurationAnalysis,
    /// Outlook message for the current run.
    pub prediction: String,
    pub trends: TrendTags,
    pub current_quadrant: Quadrant,
    pub current_regime: MacroRegime,
    pub stats: BTreeMap<RegimeCode, RegimeStats>,
}

impl RegimeHistory {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn current_code(&self) -> Option<RegimeCode> {
        self.codes.last().copied()
    }

    pub fn summary(&self) -> String {
        let region = self
            .region
            .map(|r| r.to_string())
            .unwrap_or_else(|| "custom".to_string());
        let span = match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "empty".to_string(),
        };

        let mut lines = vec![
            format!("{} regime history, {} ({} periods)", region, span, self.len()),
            format!(
                "  Current: {} / {} (code {})",
                self.current_regime,
                self.current_quadrant,
                self.current_code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "--".to_string())
            ),
            format!(
                "  Runs: {}, average duration {:.2}, current {} ({:.1}% of average)",
                self.durations.runs.len(),
                self.durations.avg_duration,
                self.durations.current_duration,
                self.durations.pct_of_avg
            ),
            format!("  Outlook: {}", self.prediction),
            format!("  Trends: {}", self.trends.labels().join(", ")),
        ];

        for stats in self.stats.values() {
            lines.push(format!(
                "    {}: {} periods in {} runs ({:.1}%, avg {:.1})",
                stats.code, stats.periods, stats.runs, stats.pct_of_total, stats.avg_run_length
            ));
        }

        lines.join("\n")
    }
}

/// Snapshot and history of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroReport {
    pub snapshot: MacroSnapshot,
    pub history: RegimeHistory,
}

/// Macro regime analyzer.
#[derive(Debug, Clone)]
pub struct MacroAnalyzer {
    config: AnalyzerConfig,
    classifier: LevelClassifier,
}

impl Default for MacroAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            classifier: LevelClassifier::default(),
        }
    }
}

impl MacroAnalyzer {
    pub fn new(config: AnalyzerConfig) -> AnalysisResult<Self> {
        config.validate()?;
        let classifier = LevelClassifier::new(config.thresholds.clone())?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LevelClassifier {
        &self.classifier
    }

    /// Classify the latest observations of `dataset`.
    pub fn snapshot(&self, dataset: &MacroDataset) -> AnalysisResult<MacroSnapshot> {
        let label = dataset.label();
        let required = self.config.snapshot_min_observations();
        for kind in IndicatorKind::ALL {
            let series = dataset.series(kind);
            series.require_non_empty(&label)?;
            series.require_len(required)?;
        }

        let inflation = latest_pct_change(&dataset.price_index, self.config.inflation_lag)?;
        let growth = latest_pct_change(&dataset.output_index, self.config.growth_lag)?;

        let inflation_band = self
            .classifier
            .classify_coarse(inflation.value, IndicatorClass::Inflation);
        let growth_band = self
            .classifier
            .classify_coarse(growth.value, IndicatorClass::Growth);

        let inflation_position = position_pct(
            &self.classifier,
            inflation.value,
            inflation_band,
            IndicatorClass::Inflation,
        );
        let growth_position = position_pct(
            &self.classifier,
            growth.value,
            growth_band,
            IndicatorClass::Growth,
        );

        let pressure = if self.config.include_pressure {
            Some(PressureDiagnostics::compute(
                &dataset.policy_rate,
                &dataset.unemployment_rate,
                self.config.rolling_window,
            )?)
        } else {
            None
        };

        let regime = detect_regime(inflation_band, growth_band);
        let quadrant = Quadrant::from_bands(inflation_band, growth_band);
        let allocation = allocate(inflation_band, growth_band, self.config.allocation_policy);

        info!(
            "{} snapshot {}: inflation {:.2}% (band {}), growth {:.2}% (band {}), {}",
            label,
            inflation.date,
            inflation.value,
            inflation_band.level(),
            growth.value,
            growth_band.level(),
            regime
        );

        Ok(MacroSnapshot {
            region: dataset.region,
            date: inflation.date,
            inflation_pct: inflation.value,
            growth_pct: growth.value,
            inflation_band,
            growth_band,
            inflation_position,
            growth_position,
            regime,
            quadrant,
            allocation,
            pressure,
        })
    }

    /// Build the historical regime record of `dataset`.
    pub fn history(&self, dataset: &MacroDataset) -> AnalysisResult<RegimeHistory> {
        let label = dataset.label();
        for kind in [
            IndicatorKind::PriceIndex,
            IndicatorKind::OutputIndex,
            IndicatorKind::UnemploymentRate,
        ] {
            dataset.series(kind).require_non_empty(&label)?;
        }

        let alignment = self.config.history_alignment;
        let inflation =
            pct_change_history(&dataset.price_index, self.config.inflation_lag, alignment)?;

        let monthly_output = resample_monthly(&dataset.output_index)?;
        let growth =
            pct_change_history(&monthly_output, self.config.monthly_growth_lag, alignment)?;

        let monthly_unemployment = resample_monthly(&dataset.unemployment_rate)?;
        let unemployment_changes = diff(
            &monthly_unemployment,
            self.config.unemployment_change_periods,
        )?;

        let inflation_values = inflation.values();
        let growth_values = growth.values();

        let trends = TrendTags {
            inflation: TrendDirection::from_recent(&inflation_values)?,
            growth: TrendDirection::from_recent(&growth_values)?,
            unemployment: UnemploymentTrend::from_changes(&unemployment_changes.values())?,
        };

        let len = inflation_values.len().min(growth_values.len());
        let inflation_values = inflation_values[inflation_values.len() - len..].to_vec();
        let growth_values = growth_values[growth_values.len() - len..].to_vec();
        let dates = inflation.dates()[inflation.len() - len..].to_vec();

        let inflation_levels = self
            .classifier
            .classify_fine_series(&inflation_values, IndicatorClass::Inflation);
        let growth_levels = self
            .classifier
            .classify_fine_series(&growth_values, IndicatorClass::Growth);

        let codes = encode_regime_codes(&self.classifier, &inflation_levels, &growth_levels);
        let durations = analyze_durations(&codes)?;
        let prediction = durations.outlook.message();
        let stats = durations.stats();

        let (current_quadrant, current_regime) =
            current_reading(&inflation_levels, &growth_levels)?;

        debug!(
            "{} history: {} periods, change points {:?}, durations {:?}",
            label,
            codes.len(),
            durations.change_points,
            durations.durations()
        );
        info!(
            "{} history: {} runs, avg {:.2}, current {} ({}), {}",
            label,
            durations.runs.len(),
            durations.avg_duration,
            durations.current_duration,
            current_regime,
            prediction
        );

        Ok(RegimeHistory {
            region: dataset.region,
            dates,
            inflation: inflation_values,
            growth: growth_values,
            inflation_levels,
            growth_levels,
            codes,
            durations,
            prediction,
            trends,
            current_quadrant,
            current_regime,
            stats,
        })
    }

    /// Snapshot and history together.
    pub fn analyze(&self, dataset: &MacroDataset) -> AnalysisResult<MacroReport> {
        Ok(MacroReport {
            snapshot: self.snapshot(dataset)?,
            history: self.history(dataset)?,
        })
    }
}

/// Quadrant and regime of the most recent pair of fine levels.
fn current_reading(
    inflation: &[FineLevel],
    growth: &[FineLevel],
) -> AnalysisResult<(Quadrant, MacroRegime)> {
    match (inflation.last(), growth.last()) {
        (Some(&infl), Some(&gdp)) => Ok((
            Quadrant::from_fine(infl, gdp),
            detect_regime_fine(infl, gdp),
        )),
        _ => Err(AnalysisError::insufficient(
            "current regime",
            1,
            inflation.len().min(growth.len()),
        )),
    }
}
