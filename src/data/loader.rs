//! Loader for FRED-style CSV series files.
//!
//! Each indicator lives in `<data_dir>/<series_code>.csv`, the format FRED
//! serves for downloads: a header row, a date column (`DATE` or
//! `observation_date`) and a value column named after the series code.
//! FRED writes `.` for a missing observation; it is read as null and those
//! rows are skipped.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::types::{IndicatorKind, IndicatorSeries, MacroDataset, Observation, Region};
use crate::error::AnalysisError;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Series error: {0}")]
    Series(#[from] AnalysisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unvalidated contents of one series file.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub code: String,
    /// Data rows in the file, including missing markers.
    pub rows: usize,
    pub observations: Vec<Observation>,
}

impl RawSeries {
    /// Rows dropped for a missing date or value.
    pub fn missing(&self) -> usize {
        self.rows - self.observations.len()
    }
}

/// CSV loader for macro indicator series.
pub struct SeriesLoader {
    data_dir: PathBuf,
}

impl SeriesLoader {
    /// Create a loader pointing at a directory of series files.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file holding `series_code`.
    fn series_path(&self, series_code: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", series_code))
    }

    /// Read the observations of `series_code` in file order.
    ///
    /// Rows with a missing date or value are dropped; ordering and finiteness
    /// are left unchecked.
    pub fn load_raw(&self, series_code: &str) -> Result<RawSeries, LoaderError> {
        let path = self.series_path(series_code);
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        // FRED's "." marker can first appear past any inference window.
        let parse_options = CsvParseOptions::default()
            .with_null_values(Some(NullValues::AllColumnsSingle(".".into())));
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.clone()))?
            .finish()?;

        let observations = dataframe_to_observations(&df, series_code)?;
        debug!(
            "Read {} of {} rows of {} from {}",
            observations.len(),
            df.height(),
            series_code,
            path.display()
        );

        Ok(RawSeries {
            code: series_code.to_string(),
            rows: df.height(),
            observations,
        })
    }

    /// Load one series, keeping observations on or after `start`.
    pub fn load_series(
        &self,
        kind: IndicatorKind,
        series_code: &str,
        start: Option<NaiveDate>,
    ) -> Result<IndicatorSeries, LoaderError> {
        let mut observations = self.load_raw(series_code)?.observations;
        if let Some(start) = start {
            observations.retain(|o| o.date >= start);
        }

        let series = IndicatorSeries::new(kind, observations)?;
        series.require_non_empty(series_code)?;
        Ok(series)
    }

    /// Load the four series of a region.
    pub fn load_region(
        &self,
        region: Region,
        start: Option<NaiveDate>,
    ) -> Result<MacroDataset, LoaderError> {
        let codes = region.series_codes();
        let load = |kind: IndicatorKind| self.load_series(kind, codes.code(kind), start);

        let dataset = MacroDataset::new(
            Some(region),
            load(IndicatorKind::PriceIndex)?,
            load(IndicatorKind::OutputIndex)?,
            load(IndicatorKind::PolicyRate)?,
            load(IndicatorKind::UnemploymentRate)?,
        )?;
        Ok(dataset)
    }
}

/// Convert days since Unix epoch to NaiveDate.
fn date_from_days(days: i32) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days + 719163).unwrap_or_default()
}

/// Read the date column (first) and value column (second) of a series frame.
fn dataframe_to_observations(
    df: &DataFrame,
    series_code: &str,
) -> Result<Vec<Observation>, LoaderError> {
    let columns = df.get_columns();
    if columns.len() < 2 {
        return Err(LoaderError::InvalidData(format!(
            "{}: expected a date and a value column, found {}",
            series_code,
            columns.len()
        )));
    }

    let date_col = &columns[0];
    let dates: Vec<Option<NaiveDate>> = if let Ok(str_col) = date_col.str() {
        str_col
            .into_iter()
            .map(|s| s.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
            .collect()
    } else if let Ok(date_col) = date_col.date() {
        date_col
            .into_iter()
            .map(|d| d.map(date_from_days))
            .collect()
    } else {
        return Err(LoaderError::InvalidData(format!(
            "{}: date column has unexpected type",
            series_code
        )));
    };

    // Integer-typed columns are widened; anything unparseable becomes null.
    let value_col = columns[1].cast(&DataType::Float64)?;
    let values = value_col.f64()?;

    let observations = dates
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(date, value)| match (date, value) {
            (Some(date), Some(value)) => Some(Observation::new(date, value)),
            _ => None,
        })
        .collect();

    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, code: &str, body: &str) {
        fs::write(dir.join(format!("{}.csv", code)), body).unwrap();
    }

    /// Monthly CSV body starting in January 2000.
    fn monthly_csv(code: &str, values: &[&str]) -> String {
        let mut body = format!("DATE,{}\n", code);
        for (i, value) in values.iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2000 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                .unwrap();
            body.push_str(&format!("{},{}\n", date, value));
        }
        body
    }

    #[test]
    fn test_date_from_days() {
        let date = date_from_days(18262);
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_series_path() {
        let loader = SeriesLoader::new("data/fred");
        let path = loader.series_path("UNRATE");
        assert_eq!(path, PathBuf::from("data/fred/UNRATE.csv"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SeriesLoader::new(dir.path());
        let result = loader.load_series(IndicatorKind::PolicyRate, "FEDFUNDS", None);
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn test_load_series_skips_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "FEDFUNDS",
            "observation_date,FEDFUNDS\n2024-01-01,5.33\n2024-02-01,.\n2024-03-01,5.33\n",
        );

        let loader = SeriesLoader::new(dir.path());
        let series = loader
            .load_series(IndicatorKind::PolicyRate, "FEDFUNDS", None)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.kind(), IndicatorKind::PolicyRate);
        assert_eq!(loader.load_raw("FEDFUNDS").unwrap().missing(), 1);
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_load_series_start_filter_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "UNRATE", "DATE,UNRATE\n2020-01-01,3.5\n2020-02-01,3.6\n");

        let loader = SeriesLoader::new(dir.path());
        let result = loader.load_series(
            IndicatorKind::UnemploymentRate,
            "UNRATE",
            NaiveDate::from_ymd_opt(2023, 1, 1),
        );

        assert!(matches!(
            result,
            Err(LoaderError::Series(AnalysisError::EmptySeries { .. }))
        ));
    }

    #[test]
    fn test_missing_marker_late_in_long_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut values = vec!["5.33"; 150];
        values[120] = ".";
        write_csv(dir.path(), "FEDFUNDS", &monthly_csv("FEDFUNDS", &values));

        let loader = SeriesLoader::new(dir.path());
        let series = loader
            .load_series(IndicatorKind::PolicyRate, "FEDFUNDS", None)
            .unwrap();
        assert_eq!(series.len(), 149);

        let raw = loader.load_raw("FEDFUNDS").unwrap();
        assert_eq!(raw.rows, 150);
        assert_eq!(raw.missing(), 1);
    }

    #[test]
    fn test_integer_values_after_inference_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut values = vec!["100"; 130];
        values[129] = "100.5";
        write_csv(dir.path(), "CPIAUCNS", &monthly_csv("CPIAUCNS", &values));

        let series = SeriesLoader::new(dir.path())
            .load_series(IndicatorKind::PriceIndex, "CPIAUCNS", None)
            .unwrap();
        assert_eq!(series.len(), 130);
        assert_eq!(series.last().unwrap().value, 100.5);
    }

    #[test]
    fn test_load_region_fills_each_slot() {
        let dir = tempfile::tempdir().unwrap();
        let codes = Region::US.series_codes();
        let values = ["1.0", "2.0", "3.0"];
        for kind in IndicatorKind::ALL {
            let code = codes.code(kind);
            write_csv(dir.path(), code, &monthly_csv(code, &values));
        }
        // Distinct lengths so a swapped file would show.
        write_csv(dir.path(), "GDP", &monthly_csv("GDP", &["10.0", "11.0"]));

        let dataset = SeriesLoader::new(dir.path())
            .load_region(Region::US, None)
            .unwrap();

        assert_eq!(dataset.region, Some(Region::US));
        for kind in IndicatorKind::ALL {
            assert_eq!(dataset.series(kind).kind(), kind);
        }
        assert_eq!(dataset.output_index.len(), 2);
        assert_eq!(dataset.price_index.len(), 3);
        assert_eq!(dataset.unemployment_rate.values(), vec![1.0, 2.0, 3.0]);

        let recent = SeriesLoader::new(dir.path())
            .load_region(Region::US, NaiveDate::from_ymd_opt(2000, 2, 1))
            .unwrap();
        assert_eq!(recent.policy_rate.len(), 2);
    }

    #[test]
    fn test_load_region_missing_series() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "CPIAUCNS", &monthly_csv("CPIAUCNS", &["1.0"]));

        let result = SeriesLoader::new(dir.path()).load_region(Region::US, None);
        assert!(matches!(
            result,
            Err(LoaderError::FileNotFound(path)) if path.ends_with("GDP.csv")
        ));
    }

    #[test]
    fn test_date_typed_column() {
        let dates = Series::new("DATE".into(), &[18262i32, 18293])
            .cast(&DataType::Date)
            .unwrap();
        let values = Series::new("UNRATE".into(), &[Some(3.5f64), None]);
        let df = DataFrame::new(vec![dates.into(), values.into()]).unwrap();

        let observations = dataframe_to_observations(&df, "UNRATE").unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(observations[0].value, 3.5);
    }

    #[test]
    fn test_single_column_is_invalid() {
        let df = DataFrame::new(vec![Series::new("DATE".into(), &["2020-01-01"]).into()]).unwrap();
        assert!(matches!(
            dataframe_to_observations(&df, "UNRATE"),
            Err(LoaderError::InvalidData(_))
        ));
    }
}
