use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::domain::observation::{PriceField, PriceObservation};

/// Date-ascending sequence of observations, indexed 0..N-1.
///
/// Construction rejects empty or out-of-order input, so every instance the
/// analysis sees is usable. The core only ever reads a series; all derived
/// state (pivot lists, wave records, equity curves) is allocated per call.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<PriceObservation>) -> Result<Self> {
        if observations.is_empty() {
            bail!("price series must contain at least one observation");
        }
        if let Some(pair) = observations.windows(2).find(|w| w[0].date > w[1].date) {
            bail!(
                "price series rows must be date-ascending ({} appears after {})",
                pair[1].date,
                pair[0].date
            );
        }
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn date(&self, index: usize) -> NaiveDate {
        self.observations[index].date
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    /// Extracts the analyzed scalar for every row.
    pub fn values(&self, field: PriceField) -> Vec<f64> {
        self.observations.iter().map(|obs| field.value(obs)).collect()
    }

    /// Index of the row whose date is closest to `date`; ties resolve to the
    /// earlier row. Mirrors nearest-match date lookup so callers can pass
    /// dates that fall on weekends or gaps.
    pub fn nearest_index(&self, date: NaiveDate) -> usize {
        self.observations
            .iter()
            .enumerate()
            .min_by_key(|(_, obs)| (obs.date - date).num_days().abs())
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    /// Owned sub-series over the inclusive index range [start, end].
    pub fn window(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end >= self.observations.len() {
            bail!(
                "invalid series window [{start}, {end}] for {} observations",
                self.observations.len()
            );
        }
        Self::new(self.observations[start..=end].to_vec())
    }
}
