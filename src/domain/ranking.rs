//! Objective-weighted scoring, guardrail override, and tiering.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::error::NetrankError;
use super::metadata::DatasetMeta;
use super::stats::percentile_ranks;
use super::summary::SummaryRow;

pub const TIER_A_THRESHOLD: f64 = 0.7;
pub const TIER_B_THRESHOLD: f64 = 0.55;

const GUARDRAIL_TURNOVER_LIMIT: f64 = 0.75;
const GUARDRAIL_SCORE_RATIO: f64 = 0.95;

pub const LIQUIDITY_WARNING: &str = "Tier capped at B due to limited liquidity data.";

/// Component weights for one objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub r: f64,
    pub w: f64,
    pub h: f64,
    pub t: f64,
}

/// Weight map for the selected objective.
pub fn objective_weights(objective: &str) -> Result<Weights, NetrankError> {
    match objective {
        "income_stability" => Ok(Weights { r: 0.35, w: 0.35, h: 0.2, t: 0.1 }),
        "active_growth" => Ok(Weights { r: 0.45, w: 0.2, h: 0.2, t: 0.15 }),
        "risk_controlled_total_return" => Ok(Weights { r: 0.4, w: 0.3, h: 0.2, t: 0.1 }),
        "capital_preservation" => Ok(Weights { r: 0.25, w: 0.4, h: 0.25, t: 0.1 }),
        _ => Err(NetrankError::UnknownObjective {
            name: objective.to_string(),
        }),
    }
}

/// Emphasis multiplier for a holding window; 1.0 for unmapped windows.
fn window_multiplier(objective: &str, window: u32) -> f64 {
    match (objective, window) {
        ("income_stability", 5) => 0.98,
        ("income_stability", 10) => 1.03,
        ("income_stability", 20) => 1.03,
        ("active_growth", 5) => 1.03,
        ("active_growth", 20) => 0.99,
        ("active_growth", 30) => 0.98,
        ("risk_controlled_total_return", 5) => 0.99,
        ("risk_controlled_total_return", 10) => 1.01,
        ("risk_controlled_total_return", 20) => 1.02,
        ("capital_preservation", 5) => 0.98,
        ("capital_preservation", 10) => 1.02,
        ("capital_preservation", 20) => 1.03,
        _ => 1.0,
    }
}

/// Trades per year, the inverse activity signal penalized in scoring.
pub fn turnover_rate(n_trades: usize, years: f64) -> f64 {
    n_trades as f64 / years
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::A => f.write_str("A"),
            Tier::B => f.write_str("B"),
            Tier::C => f.write_str("C"),
        }
    }
}

/// Assign a tier based on score thresholds.
pub fn assign_tier(score: f64) -> Tier {
    if score >= TIER_A_THRESHOLD {
        Tier::A
    } else if score >= TIER_B_THRESHOLD {
        Tier::B
    } else {
        Tier::C
    }
}

/// Cap tiers for datasets without reliable volume data.
///
/// The warning attaches whenever the cap is in force, even for tiers B
/// and C that keep their tier. Kept bug-for-bug with the historical
/// behavior; downstream consumers read the warning as informational.
pub fn apply_liquidity_cap(
    tier: Tier,
    volume_confirmed: bool,
    liquidity_ceiling: &str,
) -> (Tier, Option<String>) {
    if volume_confirmed && liquidity_ceiling == "A" {
        return (tier, None);
    }
    let warning = Some(LIQUIDITY_WARNING.to_string());
    if tier == Tier::A {
        (Tier::B, warning)
    } else {
        (tier, warning)
    }
}

/// One instrument in the ranked output.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub instrument: String,
    pub best_window: u32,
    pub score_total: f64,
    pub tier: Tier,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
struct ScoredRow {
    instrument: String,
    holding_window: u32,
    t: f64,
    score_window: f64,
}

/// Normalize summary metrics into components and score each
/// (instrument, window) row under the objective.
fn score_summary(summary: &[SummaryRow], years: f64, objective: &str) -> Result<Vec<ScoredRow>, NetrankError> {
    let weights = objective_weights(objective)?;

    let medians: Vec<f64> = summary.iter().map(|r| r.median_net_return).collect();
    let r_components = percentile_ranks(&medians);

    let turnovers: Vec<f64> = summary
        .iter()
        .map(|row| turnover_rate(row.n_trades, years))
        .collect();
    let t_components = percentile_ranks(&turnovers);

    Ok(summary
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let r = r_components[i];
            let w = row.win_rate_net;
            let h = row.hit_rate_above_cost;
            let t = t_components[i];
            let score_base = weights.r * r + weights.w * w + weights.h * h + weights.t * (1.0 - t);
            ScoredRow {
                instrument: row.instrument.clone(),
                holding_window: row.holding_window,
                t,
                score_window: score_base * window_multiplier(objective, row.holding_window),
            }
        })
        .collect())
}

/// Rank instruments based on objective and summary metrics.
///
/// Exactly one output row per instrument present in the summary,
/// sorted by score descending with ties broken by instrument id.
pub fn rank_instruments(
    summary: &[SummaryRow],
    meta: &DatasetMeta,
    objective: &str,
) -> Result<Vec<RankedRow>, NetrankError> {
    let years = meta.dataset_years();
    let scored = score_summary(summary, years, objective)?;

    let mut grouped: BTreeMap<String, Vec<ScoredRow>> = BTreeMap::new();
    for row in scored {
        grouped.entry(row.instrument.clone()).or_default().push(row);
    }

    let mut ranked = Vec::with_capacity(grouped.len());
    for (instrument, mut group) in grouped {
        group.sort_by(|a, b| {
            b.score_window
                .partial_cmp(&a.score_window)
                .unwrap_or(Ordering::Equal)
        });
        let mut best = group[0].clone();
        let mut reasons = vec![format!("Top score at {}D window.", best.holding_window)];

        // The one cross-window override: for income stability, a
        // high-turnover 5-day winner yields to a 10-day row scoring
        // within 95% of it.
        if objective == "income_stability" && best.holding_window == 5 {
            let high_turnover = best.t > GUARDRAIL_TURNOVER_LIMIT;
            let candidate = group.iter().find(|row| row.holding_window == 10);
            if let (true, Some(candidate)) = (high_turnover, candidate) {
                if candidate.score_window >= best.score_window * GUARDRAIL_SCORE_RATIO {
                    best = candidate.clone();
                    reasons.push("Guardrail: shifted to 10D due to high turnover.".to_string());
                }
            }
        }

        let tier = assign_tier(best.score_window);
        let (tier, warning) =
            apply_liquidity_cap(tier, meta.volume_confirmed(), &meta.liquidity_ceiling);

        ranked.push(RankedRow {
            instrument,
            best_window: best.holding_window,
            score_total: best.score_window,
            tier,
            reasons,
            warnings: warning.into_iter().collect(),
        });
    }

    ranked.sort_by(|a, b| {
        b.score_total
            .partial_cmp(&a.score_total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.instrument.cmp(&b.instrument))
    });
    Ok(ranked)
}
