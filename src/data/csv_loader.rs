//! Loading OHLCV history from CSV exports.
//!
//! Expects the column layout brokers and portals commonly export: a `Date`
//! column (German exports use `Datum`) plus `Open`, `High`, `Low`, `Close`
//! and `Volume`. Rows must already be in chronological order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{PriceObservation, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "Datum")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: f64,
}

impl From<CsvRow> for PriceObservation {
    fn from(row: CsvRow) -> Self {
        Self {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

pub fn load_csv(path: &Path) -> Result<PriceSeries> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_reader(file).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_reader<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut observations = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row.context("malformed csv row")?;
        observations.push(row.into());
    }
    log::info!("loaded {} observations", observations.len());
    PriceSeries::new(observations)
}
