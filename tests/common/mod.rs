#![allow(dead_code)]

use chrono::NaiveDate;
use netrank::domain::earnings::{Confidence, EarningsEvent};
use netrank::domain::error::NetrankError;
use netrank::domain::planner::PlannerRow;
use netrank::domain::price::PricePoint;
use netrank::domain::trade::Entry;
use netrank::ports::data_port::DataPort;

pub struct MockDataPort {
    pub prices: Vec<PricePoint>,
    pub entries: Vec<Entry>,
    pub events: Vec<EarningsEvent>,
    pub planner_rows: Vec<PlannerRow>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            prices: Vec::new(),
            entries: Vec::new(),
            events: Vec::new(),
            planner_rows: Vec::new(),
        }
    }

    pub fn with_prices(mut self, prices: Vec<PricePoint>) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_events(mut self, events: Vec<EarningsEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_planner_rows(mut self, rows: Vec<PlannerRow>) -> Self {
        self.planner_rows = rows;
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, NetrankError> {
        Ok(self.prices.clone())
    }

    fn fetch_entries(&self) -> Result<Vec<Entry>, NetrankError> {
        Ok(self.entries.clone())
    }

    fn fetch_events(&self) -> Result<Vec<EarningsEvent>, NetrankError> {
        Ok(self.events.clone())
    }

    fn fetch_planner_rows(&self) -> Result<Vec<PlannerRow>, NetrankError> {
        Ok(self.planner_rows.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_price(instrument: &str, date: NaiveDate, close: f64) -> PricePoint {
    PricePoint {
        instrument: instrument.to_string(),
        date,
        close,
        volume: None,
    }
}

pub fn make_price_with_volume(
    instrument: &str,
    date: NaiveDate,
    close: f64,
    volume: f64,
) -> PricePoint {
    PricePoint {
        instrument: instrument.to_string(),
        date,
        close,
        volume: Some(volume),
    }
}

pub fn make_entry(instrument: &str, entry_date: NaiveDate) -> Entry {
    Entry {
        instrument: instrument.to_string(),
        entry_date,
    }
}

pub fn make_event(instrument: &str, earnings_date: NaiveDate, confidence: Confidence) -> EarningsEvent {
    EarningsEvent {
        instrument: instrument.to_string(),
        earnings_date,
        confidence,
    }
}

/// Consecutive daily closes starting 2024-01-01.
pub fn make_price_series(instrument: &str, closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            make_price(
                instrument,
                date(2024, 1, 1) + chrono::Duration::days(i as i64),
                close,
            )
        })
        .collect()
}
