pub mod allocation;
pub mod analysis;
pub mod data;
pub mod error;
pub mod indicators;
pub mod regime;
pub mod validation;

// Re-export commonly used types
pub use allocation::{allocate, Allocation, AllocationPolicy};
pub use analysis::{AnalyzerConfig, MacroAnalyzer, MacroReport, MacroSnapshot, RegimeHistory};
pub use data::{IndicatorKind, IndicatorSeries, MacroDataset, Observation, Region, SeriesLoader};
pub use error::{AnalysisError, AnalysisResult};
pub use indicators::{HistoryAlignment, PressureDiagnostics};
pub use regime::{
    detect_regime, position_pct, CoarseBand, FineLevel, IndicatorClass, LevelClassifier,
    MacroRegime, Quadrant,
};
pub use validation::SeriesIntegrityValidator;
