//! Core data types for macro indicator series.
//!
//! An [`IndicatorSeries`] is the boundary type between the data-retrieval
//! collaborator and the analysis core: a time-indexed sequence of numeric
//! observations whose timestamps are strictly increasing.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Macro variable carried by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Consumer price index level.
    PriceIndex,
    /// Real output (GDP) level.
    OutputIndex,
    /// Central bank policy rate, in percent.
    PolicyRate,
    /// Unemployment rate, in percent.
    UnemploymentRate,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        Self::PriceIndex,
        Self::OutputIndex,
        Self::PolicyRate,
        Self::UnemploymentRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceIndex => "price index",
            Self::OutputIndex => "output index",
            Self::PolicyRate => "policy rate",
            Self::UnemploymentRate => "unemployment rate",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FRED series codes for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesCodes {
    pub price_index: &'static str,
    pub output_index: &'static str,
    pub policy_rate: &'static str,
    pub unemployment_rate: &'static str,
}

impl SeriesCodes {
    pub fn code(&self, kind: IndicatorKind) -> &'static str {
        match kind {
            IndicatorKind::PriceIndex => self.price_index,
            IndicatorKind::OutputIndex => self.output_index,
            IndicatorKind::PolicyRate => self.policy_rate,
            IndicatorKind::UnemploymentRate => self.unemployment_rate,
        }
    }
}

/// Economic region with a known set of source series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    US,
    EU,
    FR,
    DE,
    IT,
    GR,
    CH,
    JP,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Self::US,
        Self::EU,
        Self::FR,
        Self::DE,
        Self::IT,
        Self::GR,
        Self::CH,
        Self::JP,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "US" => Some(Self::US),
            "EU" | "EZ" => Some(Self::EU),
            "FR" => Some(Self::FR),
            "DE" => Some(Self::DE),
            "IT" => Some(Self::IT),
            "GR" => Some(Self::GR),
            "CH" => Some(Self::CH),
            "JP" => Some(Self::JP),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::US => "US",
            Self::EU => "EU",
            Self::FR => "FR",
            Self::DE => "DE",
            Self::IT => "IT",
            Self::GR => "GR",
            Self::CH => "CH",
            Self::JP => "JP",
        }
    }

    /// Source series for this region.
    ///
    /// Euro-area members share the ECB main refinancing rate; Switzerland and
    /// Japan use the 3-month interbank rate as the policy proxy.
    pub fn series_codes(&self) -> SeriesCodes {
        match self {
            Self::US => SeriesCodes {
                price_index: "CPIAUCNS",
                output_index: "GDP",
                policy_rate: "FEDFUNDS",
                unemployment_rate: "UNRATE",
            },
            Self::EU => SeriesCodes {
                price_index: "CP0000EZ19M086NEST",
                output_index: "CLVMNACSCAB1GQEA19",
                policy_rate: "ECBMRRFR",
                unemployment_rate: "LRHUTTTTEZM156S",
            },
            Self::FR => SeriesCodes {
                price_index: "FRACPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQFR",
                policy_rate: "ECBMRRFR",
                unemployment_rate: "LRHUTTTTFRM156S",
            },
            Self::DE => SeriesCodes {
                price_index: "DEUCPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQDE",
                policy_rate: "ECBMRRFR",
                unemployment_rate: "LRHUTTTTDEM156S",
            },
            Self::IT => SeriesCodes {
                price_index: "ITACPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQIT",
                policy_rate: "ECBMRRFR",
                unemployment_rate: "LRHUTTTTITM156S",
            },
            Self::GR => SeriesCodes {
                price_index: "GRCPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQGR",
                policy_rate: "ECBMRRFR",
                unemployment_rate: "LRHUTTTTGRM156S",
            },
            Self::CH => SeriesCodes {
                price_index: "CHECPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQCH",
                policy_rate: "IR3TIB01CHM156N",
                unemployment_rate: "LRHUTTTTCHM156S",
            },
            Self::JP => SeriesCodes {
                price_index: "JPNCPIALLMINMEI",
                output_index: "CLVMNACSCAB1GQJP",
                policy_rate: "IR3TIB01JPM156N",
                unemployment_rate: "LRHUTTTTJPM156S",
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered, time-indexed observations for one macro variable.
///
/// Timestamps are strictly increasing and every value is finite; both are
/// checked on construction, so downstream lag arithmetic only has to check
/// lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    kind: IndicatorKind,
    observations: Vec<Observation>,
}

impl IndicatorSeries {
    /// Create a series, validating ordering and finiteness.
    pub fn new(kind: IndicatorKind, observations: Vec<Observation>) -> AnalysisResult<Self> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "{} timestamps not strictly increasing at {} -> {}",
                    kind, pair[0].date, pair[1].date
                )));
            }
        }

        if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(AnalysisError::InvalidSeries(format!(
                "{} has non-finite value on {}",
                kind, bad.date
            )));
        }

        Ok(Self { kind, observations })
    }

    /// Create a series from `(date, value)` pairs.
    pub fn from_pairs<I>(kind: IndicatorKind, pairs: I) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let observations = pairs
            .into_iter()
            .map(|(date, value)| Observation::new(date, value))
            .collect();
        Self::new(kind, observations)
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observations on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            kind: self.kind,
            observations: self
                .observations
                .iter()
                .filter(|o| o.date >= start)
                .copied()
                .collect(),
        }
    }

    /// Fail with `EmptySeries` if there are no observations.
    pub fn require_non_empty(&self, context: &str) -> AnalysisResult<()> {
        if self.is_empty() {
            return Err(AnalysisError::EmptySeries {
                indicator: self.kind,
                context: context.to_string(),
            });
        }
        Ok(())
    }

    /// Fail unless the series holds at least `required` observations.
    pub fn require_len(&self, required: usize) -> AnalysisResult<()> {
        self.require_non_empty("no observations")?;
        if self.len() < required {
            return Err(AnalysisError::insufficient(
                self.kind.as_str(),
                required,
                self.len(),
            ));
        }
        Ok(())
    }
}

/// The four input series of one analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct MacroDataset {
    pub region: Option<Region>,
    pub price_index: IndicatorSeries,
    pub output_index: IndicatorSeries,
    pub policy_rate: IndicatorSeries,
    pub unemployment_rate: IndicatorSeries,
}

impl MacroDataset {
    /// Bundle four series, checking each one sits in the matching slot.
    pub fn new(
        region: Option<Region>,
        price_index: IndicatorSeries,
        output_index: IndicatorSeries,
        policy_rate: IndicatorSeries,
        unemployment_rate: IndicatorSeries,
    ) -> AnalysisResult<Self> {
        let dataset = Self {
            region,
            price_index,
            output_index,
            policy_rate,
            unemployment_rate,
        };

        for kind in IndicatorKind::ALL {
            let actual = dataset.series(kind).kind();
            if actual != kind {
                return Err(AnalysisError::InvalidSeries(format!(
                    "expected {} series, got {}",
                    kind, actual
                )));
            }
        }

        Ok(dataset)
    }

    pub fn series(&self, kind: IndicatorKind) -> &IndicatorSeries {
        match kind {
            IndicatorKind::PriceIndex => &self.price_index,
            IndicatorKind::OutputIndex => &self.output_index,
            IndicatorKind::PolicyRate => &self.policy_rate,
            IndicatorKind::UnemploymentRate => &self.unemployment_rate,
        }
    }

    /// Label used in error contexts and logs.
    pub fn label(&self) -> String {
        self.region
            .map(|r| r.to_string())
            .unwrap_or_else(|| "custom".to_string())
    }

    /// Restrict every series to observations on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            region: self.region,
            price_index: self.price_index.since(start),
            output_index: self.output_index.since(start),
            policy_rate: self.policy_rate.since(start),
            unemployment_rate: self.unemployment_rate.since(start),
        }
    }
}
