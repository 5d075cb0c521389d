//! Earnings-aware advisory composition for planned trades.
//!
//! A planner row names an instrument, an entry date, and a holding
//! window; the composer projects the exit date, reads entry and exit
//! phases off the price calendar, and selects advisory copy keyed by
//! (objective, entry phase).

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::calendar::TradingCalendar;
use super::earnings::{tag_earnings_phases, EarningsEvent, Phase};
use super::error::NetrankError;
use super::price::PricePoint;

const OVERLAP_LINE: &str = "This trade overlaps an earnings window.";

/// A trade the user intends to place.
#[derive(Debug, Clone)]
pub struct PlannerRow {
    pub instrument: String,
    pub entry_date: NaiveDate,
    pub holding_window: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Caution,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Caution => f.write_str("caution"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// A planner row annotated with phases and advisory copy.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerWarning {
    pub instrument: String,
    pub entry_date: NaiveDate,
    pub holding_window: u32,
    pub planned_exit_date: Option<NaiveDate>,
    pub entry_phase: Phase,
    pub entry_day_offset: Option<i64>,
    pub exit_phase: Phase,
    pub overlaps_earnings_window: bool,
    pub warning_title: Option<String>,
    pub warning_body: Option<String>,
    pub warning_severity: Option<Severity>,
}

struct PhaseCopy {
    title: &'static str,
    body: &'static str,
    severity: Severity,
}

struct ObjectiveCopy {
    pre: PhaseCopy,
    event: PhaseCopy,
    post: PhaseCopy,
}

const INCOME_STABILITY_COPY: ObjectiveCopy = ObjectiveCopy {
    pre: PhaseCopy {
        title: "⚠️ Earnings upcoming",
        body: "Earnings in {days} trading days... Consider smaller size or \
               allowing more time for the trade.",
        severity: Severity::Caution,
    },
    event: PhaseCopy {
        title: "⚠️ Earnings reaction period",
        body: "Earnings reactions can increase volatility.",
        severity: Severity::Caution,
    },
    post: PhaseCopy {
        title: "ℹ️ Post-earnings window",
        body: "Post-earnings prices may still be stabilizing.",
        severity: Severity::Info,
    },
};

const ACTIVE_GROWTH_COPY: ObjectiveCopy = ObjectiveCopy {
    pre: PhaseCopy {
        title: "⚠️ Earnings upcoming",
        body: "Earnings reactions can drive outsized volatility.",
        severity: Severity::Caution,
    },
    event: PhaseCopy {
        title: "⚠️ Earnings reaction period",
        body: "Expect wider variance around earnings reactions.",
        severity: Severity::Caution,
    },
    post: PhaseCopy {
        title: "ℹ️ Post-earnings window",
        body: "Watch for post-earnings follow-through.",
        severity: Severity::Info,
    },
};

const CAPITAL_PRESERVATION_COPY: ObjectiveCopy = ObjectiveCopy {
    pre: PhaseCopy {
        title: "⚠️ Earnings upcoming",
        body: "Earnings windows can amplify downside gaps.",
        severity: Severity::Caution,
    },
    event: PhaseCopy {
        title: "⚠️ Earnings reaction period",
        body: "Earnings reactions can elevate downside risk.",
        severity: Severity::Caution,
    },
    post: PhaseCopy {
        title: "ℹ️ Post-earnings window",
        body: "Post-earnings pricing can still settle.",
        severity: Severity::Info,
    },
};

fn objective_copy(objective: &str) -> Result<&'static ObjectiveCopy, NetrankError> {
    match objective {
        "income_stability" => Ok(&INCOME_STABILITY_COPY),
        "active_growth" => Ok(&ACTIVE_GROWTH_COPY),
        "capital_preservation" => Ok(&CAPITAL_PRESERVATION_COPY),
        _ => Err(NetrankError::UnknownObjective {
            name: objective.to_string(),
        }),
    }
}

/// Attach earnings phases, overlap flags, and advisory copy to planner
/// rows.
///
/// The projected exit prefers an exact entry match but tolerates
/// non-trading-day entries by falling forward to the next listed date.
/// Phase lookups run against the price calendar.
pub fn compose_planner_warnings(
    rows: &[PlannerRow],
    prices: &[PricePoint],
    events: &[EarningsEvent],
    objective: &str,
) -> Result<Vec<PlannerWarning>, NetrankError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let copy = objective_copy(objective)?;

    let calendar = TradingCalendar::build(prices);
    let phases = tag_earnings_phases(&calendar, events);

    let mut warnings = Vec::with_capacity(rows.len());
    for row in rows {
        let entry_idx = calendar
            .position(&row.instrument, row.entry_date)
            .or_else(|| calendar.position_at_or_after(&row.instrument, row.entry_date));
        let planned_exit_date = entry_idx
            .and_then(|idx| calendar.date_at(&row.instrument, idx + row.holding_window as usize));

        let (entry_phase, entry_day_offset) = match phases.get(&row.instrument, row.entry_date) {
            Some((phase, offset)) => (phase, Some(offset)),
            None => (Phase::Non, None),
        };
        let exit_phase = planned_exit_date
            .map(|d| phases.phase(&row.instrument, d))
            .unwrap_or(Phase::Non);

        let overlaps = entry_phase != exit_phase
            && (entry_phase != Phase::Non || exit_phase != Phase::Non);

        let (warning_title, warning_body, warning_severity) =
            build_warning(copy, entry_phase, entry_day_offset, overlaps);

        warnings.push(PlannerWarning {
            instrument: row.instrument.clone(),
            entry_date: row.entry_date,
            holding_window: row.holding_window,
            planned_exit_date,
            entry_phase,
            entry_day_offset,
            exit_phase,
            overlaps_earnings_window: overlaps,
            warning_title,
            warning_body,
            warning_severity,
        });
    }
    Ok(warnings)
}

fn build_warning(
    copy: &ObjectiveCopy,
    entry_phase: Phase,
    entry_offset: Option<i64>,
    overlaps: bool,
) -> (Option<String>, Option<String>, Option<Severity>) {
    let phase_copy = match entry_phase {
        Phase::Pre => &copy.pre,
        Phase::Event => &copy.event,
        Phase::Post => &copy.post,
        Phase::Non => return (None, None, None),
    };

    let mut body = phase_copy.body.to_string();
    if entry_phase == Phase::Pre {
        match entry_offset {
            Some(offset) => body = body.replace("{days}", &offset.abs().to_string()),
            None => body = body.replace("{days} ", "").replace("{days}", ""),
        }
    }
    if overlaps {
        body = format!("{body}\n{OVERLAP_LINE}");
    }

    (
        Some(phase_copy.title.to_string()),
        Some(body),
        Some(phase_copy.severity),
    )
}
