//! Analysis and simulation configuration

/// Tunables for turning-point detection
pub struct PivotSettings {
    // Minimum fractional reversal for the zigzag filter (0.03 = 3%)
    pub zigzag_threshold: f64,
    // Symmetric window (points each side) for the local-extrema fallback
    pub extrema_window: usize,
    // Below this pivot count the zigzag result is replaced by local extrema
    pub min_zigzag_pivots: usize,
}

/// Settings for current-wave detection over the tail of the series
pub struct CurrentWaveSettings {
    // How many trailing observations to re-scan
    pub look_back: usize,
    // Fixed reversal threshold used for the tail re-scan
    pub zigzag_threshold: f64,
}

/// Fixed confidence levels attached to predictions
pub struct PredictionSettings {
    // A completed impulse usually resolves into a correction
    pub impulse_confidence: f64,
    // A completed correction usually resolves into trend continuation
    pub corrective_confidence: f64,
    // Gate below which no recommendation or backtest entry is taken
    pub actionable_confidence: f64,
}

/// Settings for the backtest simulator
#[derive(Debug, Clone, Copy)]
pub struct BacktestSettings {
    // Days of history required before the forward walk starts
    pub warmup_days: usize,
    pub default_investment: f64,
}

/// The master analysis configuration
pub struct AnalysisConfig {
    pub pivots: PivotSettings,
    pub current_wave: CurrentWaveSettings,
    pub prediction: PredictionSettings,
    pub backtest: BacktestSettings,
    // Default risk tolerance (fractional) used for stop-loss placement
    pub risk_tolerance: f64,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    pivots: PivotSettings {
        zigzag_threshold: 0.03,
        extrema_window: 10,
        min_zigzag_pivots: 5,
    },

    current_wave: CurrentWaveSettings {
        look_back: 30,
        zigzag_threshold: 0.03,
    },

    prediction: PredictionSettings {
        impulse_confidence: 0.7,
        corrective_confidence: 0.6,
        actionable_confidence: 0.5,
    },

    backtest: BacktestSettings {
        warmup_days: 60,
        default_investment: 10_000.0,
    },

    risk_tolerance: 0.02,
};
