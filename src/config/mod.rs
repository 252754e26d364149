//! Configuration module for the wave-scout pipeline.

pub mod analysis;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
