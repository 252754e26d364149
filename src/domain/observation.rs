use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single OHLCV row. Immutable once loaded; the date is carried through
/// for reporting only, all analysis works on index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Which scalar of an observation the wave analysis reads.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl PriceField {
    pub fn value(&self, observation: &PriceObservation) -> f64 {
        match self {
            PriceField::Open => observation.open,
            PriceField::High => observation.high,
            PriceField::Low => observation.low,
            PriceField::Close => observation.close,
        }
    }
}
