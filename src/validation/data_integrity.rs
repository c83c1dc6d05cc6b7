//! Data integrity validation for macro series files.
//!
//! Validates:
//! - Date ordering (strictly increasing)
//! - Duplicate dates
//! - Value finiteness
//! - Missing-value markers
//! - Minimum history length
//! - Date continuity at the series cadence (monthly, or quarterly for output)

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::data::{IndicatorKind, LoaderError, Observation, RawSeries, Region, SeriesLoader};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result of a single validation check.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Integrity report for one series file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DataIntegrityReport {
    pub kind: IndicatorKind,
    pub code: String,
    pub row_count: usize,
    pub observation_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub checks: Vec<CheckResult>,
}

impl DataIntegrityReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn summary(&self) -> String {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        let total = self.checks.len();
        let span = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "no dates".to_string(),
        };
        format!(
            "{} {} ({} observations, {}): {}/{} checks passed",
            self.code, self.kind, self.observation_count, span, passed, total
        )
    }
}

/// Validator for macro series files.
pub struct SeriesIntegrityValidator {
    loader: SeriesLoader,
    min_observations: usize,
}

impl SeriesIntegrityValidator {
    pub fn new(data_dir: impl AsRef<std::path::Path>, min_observations: usize) -> Self {
        Self {
            loader: SeriesLoader::new(data_dir),
            min_observations,
        }
    }

    /// Run all validation checks on one series file.
    pub fn validate(
        &self,
        kind: IndicatorKind,
        code: &str,
    ) -> ValidationResult<DataIntegrityReport> {
        let raw = self.loader.load_raw(code)?;
        Ok(self.validate_raw(kind, &raw))
    }

    /// Validate the four series of a region.
    pub fn validate_region(&self, region: Region) -> ValidationResult<Vec<DataIntegrityReport>> {
        let codes = region.series_codes();
        IndicatorKind::ALL
            .iter()
            .map(|&kind| self.validate(kind, codes.code(kind)))
            .collect()
    }

    /// Run all validation checks on already-read series contents.
    pub fn validate_raw(&self, kind: IndicatorKind, raw: &RawSeries) -> DataIntegrityReport {
        let observations = &raw.observations;

        let checks = vec![
            // 1. Ordering
            check_ordering(observations),
            // 2. Duplicates
            check_duplicates(observations),
            // 3. Finiteness
            check_finite(observations),
            // 4. Missing markers
            check_missing(raw),
            // 5. History length
            self.check_history(observations),
            // 6. Continuity
            check_continuity(observations, cadence_months(kind)),
        ];

        DataIntegrityReport {
            kind,
            code: raw.code.clone(),
            row_count: raw.rows,
            observation_count: observations.len(),
            first_date: observations.iter().map(|o| o.date).min(),
            last_date: observations.iter().map(|o| o.date).max(),
            checks,
        }
    }

    fn check_history(&self, observations: &[Observation]) -> CheckResult {
        if observations.len() >= self.min_observations {
            CheckResult::pass(
                "minimum_history",
                &format!(
                    "{} observations (need {})",
                    observations.len(),
                    self.min_observations
                ),
            )
        } else {
            CheckResult::fail(
                "minimum_history",
                &format!(
                    "Only {} observations, need {}",
                    observations.len(),
                    self.min_observations
                ),
                None,
            )
        }
    }
}

/// Expected months between observations.
fn cadence_months(kind: IndicatorKind) -> i32 {
    match kind {
        IndicatorKind::OutputIndex => 3,
        _ => 1,
    }
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn check_ordering(observations: &[Observation]) -> CheckResult {
    let out_of_order: Vec<String> = observations
        .windows(2)
        .filter(|w| w[1].date < w[0].date)
        .map(|w| format!("{} after {}", w[1].date, w[0].date))
        .collect();

    if out_of_order.is_empty() {
        CheckResult::pass("date_ordering", "Dates in ascending order")
    } else {
        CheckResult::fail(
            "date_ordering",
            &format!("{} dates out of order", out_of_order.len()),
            Some(out_of_order.join(", ")),
        )
    }
}

fn check_duplicates(observations: &[Observation]) -> CheckResult {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<NaiveDate> = observations
        .iter()
        .filter(|o| !seen.insert(o.date))
        .map(|o| o.date)
        .collect();
    duplicates.sort();
    duplicates.dedup();

    if duplicates.is_empty() {
        CheckResult::pass("duplicate_dates", "No duplicate dates")
    } else {
        let details: Vec<String> = duplicates.iter().map(|d| d.to_string()).collect();
        CheckResult::fail(
            "duplicate_dates",
            &format!("{} duplicated dates", duplicates.len()),
            Some(details.join(", ")),
        )
    }
}

fn check_finite(observations: &[Observation]) -> CheckResult {
    let bad: Vec<String> = observations
        .iter()
        .filter(|o| !o.value.is_finite())
        .map(|o| o.date.to_string())
        .collect();

    if bad.is_empty() {
        CheckResult::pass("finite_values", "All values finite")
    } else {
        CheckResult::fail(
            "finite_values",
            &format!("{} non-finite values", bad.len()),
            Some(bad.join(", ")),
        )
    }
}

fn check_missing(raw: &RawSeries) -> CheckResult {
    let missing = raw.missing();
    if missing == 0 {
        return CheckResult::pass("missing_values", "No missing values");
    }

    let pct = missing as f64 / raw.rows.max(1) as f64 * 100.0;
    // Sparse "." markers are routine in FRED files and are skipped on load.
    if pct <= 5.0 {
        CheckResult::pass(
            "missing_values",
            &format!("{} ({:.1}%) missing values skipped", missing, pct),
        )
    } else {
        CheckResult::fail(
            "missing_values",
            &format!("{} ({:.1}%) rows missing", missing, pct),
            None,
        )
    }
}

fn check_continuity(observations: &[Observation], cadence: i32) -> CheckResult {
    if observations.is_empty() {
        return CheckResult::fail("date_continuity", "No dates found", None);
    }

    let gaps: Vec<String> = observations
        .windows(2)
        .filter_map(|w| {
            let months = month_index(w[1].date) - month_index(w[0].date);
            (months > cadence)
                .then(|| format!("{} to {} ({} months)", w[0].date, w[1].date, months))
        })
        .collect();

    if gaps.is_empty() {
        CheckResult::pass(
            "date_continuity",
            &format!("No gaps at a {}-month cadence", cadence),
        )
    } else {
        CheckResult::fail(
            "date_continuity",
            &format!("{} gaps found", gaps.len()),
            Some(gaps.join(", ")),
        )
    }
}
