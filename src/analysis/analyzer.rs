//! Wave analysis orchestration.
//!
//! `WaveAnalyzer` owns one pass over a price series: it detects pivots,
//! scans every candidate pivot window for valid wave structures, and derives
//! a forward prediction from the most recent structure in the tail of the
//! data. Everything it builds is call-local; two analyzers over the same
//! series never share state.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::analysis::patterns::{TargetRange, WaveKind, WavePattern, WavePoint};
use crate::analysis::pivots::{local_extrema, zigzag};
use crate::config::ANALYSIS;
use crate::domain::{PriceField, PriceSeries};

/// A validated pattern plus its absolute pivot indices and a running
/// per-kind sequence number.
#[derive(Debug, Clone)]
pub struct WaveRecord {
    pub indices: Vec<usize>,
    pub pattern: WavePattern,
    pub wave_count: usize,
}

/// Per-kind record lists with compile-time exhaustiveness over the four
/// wave kinds. The analyzer's only mutable aggregate during `analyze`.
#[derive(Debug, Default, Clone)]
pub struct WaveCatalog {
    pub impulse: Vec<WaveRecord>,
    pub corrective: Vec<WaveRecord>,
    pub motive: Vec<WaveRecord>,
    pub diagonal: Vec<WaveRecord>,
}

impl WaveCatalog {
    pub fn records(&self, kind: WaveKind) -> &[WaveRecord] {
        match kind {
            WaveKind::Impulse => &self.impulse,
            WaveKind::Corrective => &self.corrective,
            WaveKind::Motive => &self.motive,
            WaveKind::Diagonal => &self.diagonal,
        }
    }

    fn records_mut(&mut self, kind: WaveKind) -> &mut Vec<WaveRecord> {
        match kind {
            WaveKind::Impulse => &mut self.impulse,
            WaveKind::Corrective => &mut self.corrective,
            WaveKind::Motive => &mut self.motive,
            WaveKind::Diagonal => &mut self.diagonal,
        }
    }

    fn push(&mut self, pattern: WavePattern) {
        let indices = pattern.points.iter().map(|p| p.index).collect();
        let records = self.records_mut(pattern.kind);
        let wave_count = records.len() + 1;
        records.push(WaveRecord { indices, pattern, wave_count });
    }

    pub fn total(&self) -> usize {
        self.impulse.len() + self.corrective.len() + self.motive.len() + self.diagonal.len()
    }
}

/// The most recent structure found in the tail of the series.
#[derive(Debug, Clone)]
pub struct CurrentWave {
    pub kind: WaveKind,
    pub points: Vec<WavePoint>,
    pub next_target: Option<TargetRange>,
}

/// Directional forecast labels.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, strum_macros::Display)]
pub enum Outlook {
    #[strum(serialize = "trend continuation expected")]
    TrendContinuation,
    #[strum(serialize = "correction expected")]
    Correction,
    #[strum(serialize = "undetermined")]
    Undetermined,
}

/// Forecast with a fixed per-outlook confidence; the confidence is a rule
/// constant, not a statistic of the data.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub outlook: Outlook,
    pub confidence: f64,
    pub target: Option<TargetRange>,
}

impl Prediction {
    fn undetermined() -> Self {
        Self {
            outlook: Outlook::Undetermined,
            confidence: 0.0,
            target: None,
        }
    }
}

pub struct WaveAnalyzer<'a> {
    series: &'a PriceSeries,
    field: PriceField,
    prices: Vec<f64>,
}

impl<'a> WaveAnalyzer<'a> {
    pub fn new(series: &'a PriceSeries, field: PriceField) -> Result<Self> {
        Self::truncated(series, field, series.len())
    }

    /// Analyzer over only the first `len` observations. The backtest walks
    /// forward in time by re-analyzing ever-longer prefixes of its window.
    pub fn truncated(series: &'a PriceSeries, field: PriceField, len: usize) -> Result<Self> {
        if series.is_empty() || len == 0 {
            bail!("cannot analyze an empty price series");
        }
        let mut prices = series.values(field);
        prices.truncate(len);
        Ok(Self { series, field, prices })
    }

    pub fn series(&self) -> &PriceSeries {
        self.series
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Last analyzed price. The constructor guarantees a non-empty buffer.
    pub fn last_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    /// Exhaustive overlapping scan for wave structures.
    ///
    /// Runs the zigzag filter, substituting merged local extrema when it
    /// produces too few pivots, then tries an impulse window at every offset
    /// with six pivots remaining and a corrective window at every offset
    /// with four. Windows overlap deliberately, so records may share pivots.
    pub fn analyze(&self, zigzag_threshold: f64, window_size: usize) -> WaveCatalog {
        let mut pivots = zigzag(&self.prices, zigzag_threshold);
        if pivots.len() < ANALYSIS.pivots.min_zigzag_pivots {
            log::warn!(
                "zigzag produced only {} pivots, falling back to local extrema",
                pivots.len()
            );
            pivots = local_extrema(&self.prices, window_size);
        }

        let mut catalog = WaveCatalog::default();
        for i in 0..pivots.len() {
            if i + 6 <= pivots.len() {
                let pattern =
                    WavePattern::new(WaveKind::Impulse, self.wave_points(&pivots[i..i + 6]));
                if pattern.is_valid {
                    catalog.push(pattern);
                }
            }
            if i + 4 <= pivots.len() {
                let pattern =
                    WavePattern::new(WaveKind::Corrective, self.wave_points(&pivots[i..i + 4]));
                if pattern.is_valid {
                    catalog.push(pattern);
                }
            }
        }

        log::info!(
            "analysis found {} wave structures over {} pivots",
            catalog.total(),
            pivots.len()
        );
        catalog
    }

    /// Re-scans only the last `look_back` prices for a structure still in
    /// progress. Tries an impulse reading first (five or more pivots), then
    /// a corrective one; returns the first that validates.
    pub fn find_current_wave(&self, look_back: usize) -> Option<CurrentWave> {
        let start = self.prices.len().saturating_sub(look_back);
        let tail_pivots = zigzag(&self.prices[start..], ANALYSIS.current_wave.zigzag_threshold);

        // Remap tail-relative indices to absolute series indices
        let pivots: Vec<usize> = tail_pivots.into_iter().map(|idx| start + idx).collect();
        if pivots.len() < 3 {
            return None;
        }

        let points = self.wave_points(&pivots);

        if points.len() >= 5 {
            let pattern = WavePattern::new(WaveKind::Impulse, points.clone());
            if pattern.is_valid {
                return Some(CurrentWave {
                    kind: WaveKind::Impulse,
                    next_target: pattern.next_target(),
                    points,
                });
            }
        }

        let pattern = WavePattern::new(WaveKind::Corrective, points.clone());
        if pattern.is_valid {
            return Some(CurrentWave {
                kind: WaveKind::Corrective,
                next_target: pattern.next_target(),
                points,
            });
        }

        None
    }

    /// Maps the current wave to a directional forecast: a completed impulse
    /// implies a correction, a completed correction implies continuation.
    pub fn predict_next_move(&self) -> Prediction {
        let Some(current) = self.find_current_wave(ANALYSIS.current_wave.look_back) else {
            return Prediction::undetermined();
        };

        match current.kind {
            WaveKind::Impulse => Prediction {
                outlook: Outlook::Correction,
                confidence: ANALYSIS.prediction.impulse_confidence,
                target: current.next_target,
            },
            WaveKind::Corrective => Prediction {
                outlook: Outlook::TrendContinuation,
                confidence: ANALYSIS.prediction.corrective_confidence,
                target: current.next_target,
            },
            _ => Prediction::undetermined(),
        }
    }

    fn wave_points(&self, indices: &[usize]) -> Vec<WavePoint> {
        indices
            .iter()
            .map(|&index| WavePoint { index, price: self.prices[index] })
            .collect()
    }
}
