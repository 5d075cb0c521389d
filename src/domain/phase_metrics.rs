//! Return metrics grouped by instrument and earnings phase.

use serde::Serialize;
use std::collections::BTreeMap;

use super::earnings::Phase;
use super::stats::{median, positive_rate, quantile, sample_std};

/// Groups with fewer rows than this are flagged as thin history.
pub const MIN_PHASE_HISTORY: usize = 12;

/// One tagged return observation.
#[derive(Debug, Clone)]
pub struct PhaseReturn {
    pub instrument: String,
    pub phase: Phase,
    pub return_pct: f64,
}

/// Aggregates for one (instrument, phase) group.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseMetricsRow {
    pub instrument: String,
    pub phase: Phase,
    pub n: usize,
    pub win_rate: f64,
    pub median_return: f64,
    pub p25: f64,
    pub p75: f64,
    pub vol: Option<f64>,
    pub insufficient_history: bool,
}

/// Compute grouped phase metrics and flag insufficient history.
pub fn compute_phase_metrics(rows: &[PhaseReturn]) -> Vec<PhaseMetricsRow> {
    let mut grouped: BTreeMap<(String, Phase), Vec<f64>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry((row.instrument.clone(), row.phase))
            .or_default()
            .push(row.return_pct);
    }

    grouped
        .into_iter()
        .map(|((instrument, phase), returns)| PhaseMetricsRow {
            instrument,
            phase,
            n: returns.len(),
            win_rate: positive_rate(&returns),
            median_return: median(&returns),
            p25: quantile(&returns, 0.25),
            p75: quantile(&returns, 0.75),
            vol: sample_std(&returns),
            insufficient_history: returns.len() < MIN_PHASE_HISTORY,
        })
        .collect()
}
