//! Wave detection, prediction, and simulation.

pub mod analyzer;
pub mod backtest;
pub mod patterns;
pub mod pivots;
pub mod recommendation;

pub use analyzer::{CurrentWave, Outlook, Prediction, WaveAnalyzer, WaveCatalog, WaveRecord};
pub use backtest::{BacktestResult, BacktestSimulator, EquityPoint, Trade, TradeSide};
pub use patterns::{TargetRange, WaveKind, WavePattern, WavePoint};
pub use pivots::{local_extrema, zigzag};
pub use recommendation::{PriceTarget, Recommendation, TradeAction, recommend};
