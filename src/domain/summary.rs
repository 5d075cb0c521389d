//! Trade aggregation by (instrument, window) and by window.

use serde::Serialize;
use std::collections::BTreeMap;

use super::stats::{mean, median, positive_rate};
use super::trade::Trade;

/// Aggregates for one (instrument, holding window) trade group.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub instrument: String,
    pub holding_window: u32,
    pub n_trades: usize,
    pub win_rate_net: f64,
    pub median_net_return: f64,
    pub median_gross_return: f64,
    pub avg_net_return: f64,
    pub cost_drag_median: f64,
    pub hit_rate_above_cost: f64,
}

/// Aggregates for one holding window across all instruments.
#[derive(Debug, Clone, Serialize)]
pub struct OverallRow {
    pub holding_window: u32,
    pub n_trades: usize,
    pub win_rate_net: f64,
    pub median_net_return: f64,
    pub median_gross_return: f64,
    pub avg_net_return: f64,
}

/// Group trades by (instrument, window) and by window only.
///
/// Only non-empty groups appear; an empty trade set yields empty
/// tables. `hit_rate_above_cost` compares each trade's gross return
/// against that same trade's cost drag, row by row.
pub fn summarize(trades: &[Trade]) -> (Vec<SummaryRow>, Vec<OverallRow>) {
    let mut by_instrument: BTreeMap<(String, u32), Vec<&Trade>> = BTreeMap::new();
    let mut by_window: BTreeMap<u32, Vec<&Trade>> = BTreeMap::new();
    for trade in trades {
        by_instrument
            .entry((trade.instrument.clone(), trade.holding_window))
            .or_default()
            .push(trade);
        by_window.entry(trade.holding_window).or_default().push(trade);
    }

    let summary = by_instrument
        .into_iter()
        .map(|((instrument, holding_window), group)| {
            let net: Vec<f64> = group.iter().map(|t| t.net_return_pct).collect();
            let gross: Vec<f64> = group.iter().map(|t| t.gross_return_pct).collect();
            let drag: Vec<f64> = group.iter().map(|t| t.cost_drag_pct).collect();
            let above_cost = group
                .iter()
                .filter(|t| t.gross_return_pct > t.cost_drag_pct)
                .count();
            SummaryRow {
                instrument,
                holding_window,
                n_trades: group.len(),
                win_rate_net: positive_rate(&net),
                median_net_return: median(&net),
                median_gross_return: median(&gross),
                avg_net_return: mean(&net),
                cost_drag_median: median(&drag),
                hit_rate_above_cost: above_cost as f64 / group.len() as f64,
            }
        })
        .collect();

    let overall = by_window
        .into_iter()
        .map(|(holding_window, group)| {
            let net: Vec<f64> = group.iter().map(|t| t.net_return_pct).collect();
            let gross: Vec<f64> = group.iter().map(|t| t.gross_return_pct).collect();
            OverallRow {
                holding_window,
                n_trades: group.len(),
                win_rate_net: positive_rate(&net),
                median_net_return: median(&net),
                median_gross_return: median(&gross),
                avg_net_return: mean(&net),
            }
        })
        .collect();

    (summary, overall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TIME_EXIT;
    use chrono::NaiveDate;

    fn make_trade(instrument: &str, window: u32, gross: f64, drag: f64) -> Trade {
        let entry_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Trade {
            instrument: instrument.to_string(),
            entry_date,
            exit_date: entry_date + chrono::Duration::days(window as i64),
            entry_price: 100.0,
            exit_price: 100.0 * (1.0 + gross / 100.0),
            holding_window: window,
            gross_return_pct: gross,
            net_return_pct: gross - drag,
            cost_drag_pct: drag,
            exit_reason: TIME_EXIT,
        }
    }

    #[test]
    fn empty_trades_yield_empty_summaries() {
        let (summary, overall) = summarize(&[]);
        assert!(summary.is_empty());
        assert!(overall.is_empty());
    }

    #[test]
    fn groups_by_instrument_and_window() {
        let trades = vec![
            make_trade("AAA", 5, 2.0, 0.3),
            make_trade("AAA", 5, -1.0, 0.3),
            make_trade("AAA", 10, 4.0, 0.3),
            make_trade("BBB", 5, 1.0, 0.3),
        ];
        let (summary, overall) = summarize(&trades);

        assert_eq!(summary.len(), 3);
        let aaa5 = &summary[0];
        assert_eq!(aaa5.instrument, "AAA");
        assert_eq!(aaa5.holding_window, 5);
        assert_eq!(aaa5.n_trades, 2);
        assert!((aaa5.win_rate_net - 0.5).abs() < f64::EPSILON);
        assert!((aaa5.median_gross_return - 0.5).abs() < 1e-12);
        assert!((aaa5.median_net_return - 0.2).abs() < 1e-12);
        assert!((aaa5.cost_drag_median - 0.3).abs() < 1e-12);

        assert_eq!(overall.len(), 2);
        assert_eq!(overall[0].holding_window, 5);
        assert_eq!(overall[0].n_trades, 3);
        assert_eq!(overall[1].holding_window, 10);
        assert_eq!(overall[1].n_trades, 1);
    }

    #[test]
    fn hit_rate_compares_per_row() {
        // Each trade is judged against its own cost drag, not a group
        // aggregate: 2.0 > 0.3, 0.2 < 0.3, -1.0 < 0.3.
        let trades = vec![
            make_trade("AAA", 5, 2.0, 0.3),
            make_trade("AAA", 5, 0.2, 0.3),
            make_trade("AAA", 5, -1.0, 0.3),
        ];
        let (summary, _) = summarize(&trades);
        assert!((summary[0].hit_rate_above_cost - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn avg_net_return() {
        let trades = vec![
            make_trade("AAA", 5, 3.0, 1.0),
            make_trade("AAA", 5, 1.0, 1.0),
        ];
        let (summary, _) = summarize(&trades);
        assert!((summary[0].avg_net_return - 1.0).abs() < 1e-12);
    }
}
