//! Validation module for macro series files.
//!
//! Checks raw series contents before analysis:
//! - Date ordering, duplicates and continuity
//! - Value finiteness and missing markers
//! - Minimum history length

pub mod data_integrity;

pub use data_integrity::{
    CheckResult, DataIntegrityReport, SeriesIntegrityValidator, ValidationError,
    ValidationResult,
};
