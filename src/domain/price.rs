//! Canonical price rows and the (instrument, date) close lookup.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::error::NetrankError;

/// One close observation for an instrument on a trading day.
#[derive(Debug, Clone, Serialize)]
pub struct PricePoint {
    pub instrument: String,
    pub date: NaiveDate,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Close lookup keyed by instrument and date.
///
/// Construction is the duplicate-key gate: a repeated (instrument, date)
/// pair aborts the run before any trade is computed.
#[derive(Debug, Default)]
pub struct PriceIndex {
    closes: HashMap<String, HashMap<NaiveDate, f64>>,
}

impl PriceIndex {
    pub fn build(prices: &[PricePoint]) -> Result<Self, NetrankError> {
        let mut closes: HashMap<String, HashMap<NaiveDate, f64>> = HashMap::new();
        for point in prices {
            let by_date = closes.entry(point.instrument.clone()).or_default();
            if by_date.insert(point.date, point.close).is_some() {
                return Err(NetrankError::Validation {
                    reason: "Duplicate (instrument, date) rows found in prices".to_string(),
                });
            }
        }
        Ok(Self { closes })
    }

    pub fn close(&self, instrument: &str, date: NaiveDate) -> Option<f64> {
        self.closes.get(instrument)?.get(&date).copied()
    }
}
