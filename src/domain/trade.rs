//! Trade-level net return computation.

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::TradingCalendar;
use super::earnings::{Phase, PhaseMap};
use super::error::NetrankError;
use super::price::{PriceIndex, PricePoint};

pub const DEFAULT_WINDOWS: [u32; 4] = [5, 10, 20, 30];

/// The only exit rule in scope is the time-based one.
pub const TIME_EXIT: &str = "Time Exit";

/// A signal entry to evaluate across holding windows.
#[derive(Debug, Clone)]
pub struct Entry {
    pub instrument: String,
    pub entry_date: NaiveDate,
}

/// One evaluated (entry, holding window) pair.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    pub instrument: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub holding_window: u32,
    pub gross_return_pct: f64,
    pub net_return_pct: f64,
    pub cost_drag_pct: f64,
    pub exit_reason: &'static str,
}

/// Compute trade-level returns for each entry across holding windows.
///
/// Duplicate (instrument, date) price rows abort the run before any
/// trade is computed. Entries with a missing entry price, an
/// unresolvable exit date, or a missing exit price are skipped without
/// emitting a row.
pub fn compute_trades(
    prices: &[PricePoint],
    entries: &[Entry],
    windows: &[u32],
    round_trip_cost_rate: f64,
) -> Result<Vec<Trade>, NetrankError> {
    let index = PriceIndex::build(prices)?;
    let calendar = TradingCalendar::build(prices);

    let mut trades = Vec::new();
    for entry in entries {
        let Some(entry_price) = index.close(&entry.instrument, entry.entry_date) else {
            continue;
        };
        for &window in windows {
            let Some(exit_date) =
                calendar.resolve_exit(&entry.instrument, entry.entry_date, window)
            else {
                continue;
            };
            let Some(exit_price) = index.close(&entry.instrument, exit_date) else {
                continue;
            };

            let gross_return_pct = (exit_price / entry_price - 1.0) * 100.0;
            let cost_drag_pct = round_trip_cost_rate * 100.0;
            trades.push(Trade {
                instrument: entry.instrument.clone(),
                entry_date: entry.entry_date,
                exit_date,
                entry_price,
                exit_price,
                holding_window: window,
                gross_return_pct,
                net_return_pct: gross_return_pct - cost_drag_pct,
                cost_drag_pct,
                exit_reason: TIME_EXIT,
            });
        }
    }
    Ok(trades)
}

/// A trade annotated with earnings phases at entry and exit.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedTrade {
    #[serde(flatten)]
    pub trade: Trade,
    pub entry_phase: Phase,
    pub entry_day_offset: Option<i64>,
    pub exit_phase: Phase,
    pub exit_day_offset: Option<i64>,
}

/// Annotate trades with entry- and exit-date phases from the phase map.
pub fn tag_trades(trades: &[Trade], phases: &PhaseMap) -> Vec<TaggedTrade> {
    trades
        .iter()
        .map(|trade| {
            let entry = phases.tag(&trade.instrument, trade.entry_date);
            let exit = phases.tag(&trade.instrument, trade.exit_date);
            TaggedTrade {
                trade: trade.clone(),
                entry_phase: entry.phase,
                entry_day_offset: entry.day_offset,
                exit_phase: exit.phase,
                exit_day_offset: exit.day_offset,
            }
        })
        .collect()
}
