//! Macro indicator data: series types and the CSV boundary loader.

pub mod loader;
pub mod types;

pub use loader::{LoaderError, RawSeries, SeriesLoader};
pub use types::{IndicatorKind, IndicatorSeries, MacroDataset, Observation, Region, SeriesCodes};
