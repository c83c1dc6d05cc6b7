//! Analysis module.
//!
//! Ties the indicator, regime and allocation layers together:
//! - Analyzer configuration loaded from TOML
//! - Live snapshot classification
//! - Historical regime records with duration outlook

pub mod config;
pub mod engine;

pub use config::{AnalyzerConfig, ConfigError};
pub use engine::{MacroAnalyzer, MacroReport, MacroSnapshot, RegimeHistory};
