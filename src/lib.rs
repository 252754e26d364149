//! Elliott wave price-structure analysis over daily OHLCV history.
//!
//! The pipeline runs in three stages: turning-point detection (zigzag with a
//! local-extrema fallback), wave pattern validation over pivot windows, and
//! Fibonacci target projection feeding a prediction, a trade recommendation,
//! and an optional walk-forward backtest.

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use analysis::{
    BacktestResult, BacktestSimulator, CurrentWave, Outlook, Prediction, Recommendation,
    TradeAction, WaveAnalyzer, WaveCatalog, WaveKind, recommend,
};
pub use domain::{PriceField, PriceObservation, PriceSeries};

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Mode {
    Analyze,
    Backtest,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

// CLI argument parsing
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Elliott wave analyzer for OHLCV price history", long_about = None)]
pub struct Cli {
    /// CSV file with the price history to analyze
    #[arg(long)]
    pub data: PathBuf,

    /// Operating mode
    #[arg(long, value_enum, default_value_t = Mode::Analyze)]
    pub mode: Mode,

    /// Start date (YYYY-MM-DD), clamped to the nearest observation
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), clamped to the nearest observation
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Minimum fractional reversal for the zigzag filter (0.03 = 3%)
    #[arg(long, default_value_t = config::ANALYSIS.pivots.zigzag_threshold)]
    pub threshold: f64,

    /// Window size for the local-extrema fallback
    #[arg(long, default_value_t = config::ANALYSIS.pivots.extrema_window)]
    pub window: usize,

    /// Initial investment amount for backtests
    #[arg(long, default_value_t = config::ANALYSIS.backtest.default_investment)]
    pub invest: f64,

    /// Risk tolerance for stop-loss placement (0.02 = 2%)
    #[arg(long, default_value_t = config::ANALYSIS.risk_tolerance)]
    pub risk: f64,

    /// Output format for backtest results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}
