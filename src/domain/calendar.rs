//! Per-instrument trading calendars and day-offset arithmetic.
//!
//! All holding-window math counts listed trading days, never calendar
//! days. Each instrument carries its sorted date sequence plus a
//! date-to-position map so exit resolution and phase tagging stay
//! near-linear in total row count.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::price::PricePoint;

#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    dates: BTreeMap<String, Vec<NaiveDate>>,
    positions: HashMap<String, HashMap<NaiveDate, usize>>,
}

impl TradingCalendar {
    /// Build calendars from price rows. Dates within an instrument are
    /// de-duplicated and sorted ascending.
    pub fn build(prices: &[PricePoint]) -> Self {
        Self::from_observations(prices.iter().map(|p| (p.instrument.as_str(), p.date)))
    }

    /// Build calendars from arbitrary (instrument, date) observations.
    pub fn from_observations<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, NaiveDate)>,
    {
        let mut grouped: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for (instrument, date) in rows {
            grouped.entry(instrument.to_string()).or_default().insert(date);
        }

        let mut dates = BTreeMap::new();
        let mut positions = HashMap::new();
        for (instrument, set) in grouped {
            let sorted: Vec<NaiveDate> = set.into_iter().collect();
            let by_date: HashMap<NaiveDate, usize> =
                sorted.iter().enumerate().map(|(i, d)| (*d, i)).collect();
            positions.insert(instrument.clone(), by_date);
            dates.insert(instrument, sorted);
        }
        Self { dates, positions }
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.dates.keys().map(String::as_str)
    }

    /// Sorted trading dates for an instrument; empty when unknown.
    pub fn dates(&self, instrument: &str) -> &[NaiveDate] {
        self.dates.get(instrument).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact position of a date in an instrument's sequence.
    pub fn position(&self, instrument: &str, date: NaiveDate) -> Option<usize> {
        self.positions.get(instrument)?.get(&date).copied()
    }

    /// Position of the first listed date at or after the given date.
    pub fn position_at_or_after(&self, instrument: &str, date: NaiveDate) -> Option<usize> {
        let dates = self.dates(instrument);
        let idx = dates.partition_point(|d| *d < date);
        (idx < dates.len()).then_some(idx)
    }

    pub fn date_at(&self, instrument: &str, position: usize) -> Option<NaiveDate> {
        self.dates(instrument).get(position).copied()
    }

    /// Exit date `window` trading days after the entry, or `None` when
    /// the entry date is not listed or the window runs past the end.
    /// Exact match only; entries off the calendar produce no trade.
    pub fn resolve_exit(
        &self,
        instrument: &str,
        entry_date: NaiveDate,
        window: u32,
    ) -> Option<NaiveDate> {
        let entry_idx = self.position(instrument, entry_date)?;
        self.date_at(instrument, entry_idx + window as usize)
    }
}
