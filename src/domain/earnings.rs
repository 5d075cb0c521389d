//! Earnings event phase tagging over trading-day offsets.
//!
//! Every trading day within ±30 positions of an earnings event is a
//! candidate for that event; the winning event per day is chosen by a
//! total ordering (nearest, then most confident, then earliest), and
//! the winning offset maps onto a phase bucket.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::calendar::TradingCalendar;
use super::error::NetrankError;

pub const PRE_WINDOW: (i64, i64) = (-30, -1);
pub const EVENT_WINDOW: (i64, i64) = (0, 3);
pub const POST_WINDOW: (i64, i64) = (4, 30);

/// Reliability of an earnings date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Confirmed,
    Estimated,
    Unconfirmed,
}

impl Confidence {
    /// Lenient parse; anything unrecognized counts as unconfirmed.
    pub fn parse(label: &str) -> Confidence {
        match label.trim().to_lowercase().as_str() {
            "confirmed" => Confidence::Confirmed,
            "estimated" => Confidence::Estimated,
            _ => Confidence::Unconfirmed,
        }
    }

    pub fn score(self) -> i32 {
        match self {
            Confidence::Confirmed => 2,
            Confidence::Estimated => 1,
            Confidence::Unconfirmed => 0,
        }
    }
}

/// A scheduled or observed earnings announcement.
#[derive(Debug, Clone)]
pub struct EarningsEvent {
    pub instrument: String,
    pub earnings_date: NaiveDate,
    pub confidence: Confidence,
}

/// Earnings-relative bucket for a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    #[serde(rename = "pre_earnings")]
    Pre,
    #[serde(rename = "earnings")]
    Event,
    #[serde(rename = "post_earnings")]
    Post,
    #[serde(rename = "non")]
    Non,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Pre => "pre_earnings",
            Phase::Event => "earnings",
            Phase::Post => "post_earnings",
            Phase::Non => "non",
        }
    }

    /// Parse a phase label, accepting the short aliases used by older
    /// datasets ("pre", "reaction", "event", "post", "non"/"none").
    pub fn parse(label: &str) -> Result<Phase, NetrankError> {
        match label.trim().to_lowercase().as_str() {
            "pre" | "pre_earnings" => Ok(Phase::Pre),
            "reaction" | "event" | "earnings" => Ok(Phase::Event),
            "post" | "post_earnings" => Ok(Phase::Post),
            "non" | "none" | "" => Ok(Phase::Non),
            _ => Err(NetrankError::UnknownPhase {
                label: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a winning offset onto its phase bucket. Offsets outside every
/// bucket cannot occur under the candidate window, but the fallback is
/// kept explicit.
pub fn phase_of_offset(offset: i64) -> Phase {
    if (PRE_WINDOW.0..=PRE_WINDOW.1).contains(&offset) {
        Phase::Pre
    } else if (EVENT_WINDOW.0..=EVENT_WINDOW.1).contains(&offset) {
        Phase::Event
    } else if (POST_WINDOW.0..=POST_WINDOW.1).contains(&offset) {
        Phase::Post
    } else {
        Phase::Non
    }
}

/// Phase and signed trading-day offset for one (instrument, date).
#[derive(Debug, Clone, Serialize)]
pub struct PhaseTag {
    pub instrument: String,
    pub date: NaiveDate,
    pub phase: Phase,
    pub day_offset: Option<i64>,
}

/// Phase assignments keyed by instrument and trading date. Dates with
/// no qualifying event are absent and read back as `Phase::Non`.
#[derive(Debug, Default)]
pub struct PhaseMap {
    tags: HashMap<String, HashMap<NaiveDate, (Phase, i64)>>,
}

impl PhaseMap {
    pub fn get(&self, instrument: &str, date: NaiveDate) -> Option<(Phase, i64)> {
        self.tags.get(instrument)?.get(&date).copied()
    }

    pub fn phase(&self, instrument: &str, date: NaiveDate) -> Phase {
        self.get(instrument, date).map_or(Phase::Non, |(p, _)| p)
    }

    pub fn tag(&self, instrument: &str, date: NaiveDate) -> PhaseTag {
        let (phase, day_offset) = match self.get(instrument, date) {
            Some((phase, offset)) => (phase, Some(offset)),
            None => (Phase::Non, None),
        };
        PhaseTag {
            instrument: instrument.to_string(),
            date,
            phase,
            day_offset,
        }
    }
}

/// One event in trading-day position space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    offset: i64,
    confidence: i32,
}

impl Candidate {
    /// Smaller key wins: nearest first, then higher confidence, then
    /// the more negative ("before" biased) offset.
    fn rank_key(self) -> (i64, i32, i64) {
        (self.offset.abs(), -self.confidence, self.offset)
    }
}

/// Tag every date in the calendar with its nearest-event phase.
///
/// Event dates snap forward to the first listed trading day at or
/// after them; events past the last listed day are ignored.
pub fn tag_earnings_phases(calendar: &TradingCalendar, events: &[EarningsEvent]) -> PhaseMap {
    let mut events_by_instrument: HashMap<&str, Vec<&EarningsEvent>> = HashMap::new();
    for event in events {
        events_by_instrument
            .entry(event.instrument.as_str())
            .or_default()
            .push(event);
    }

    let mut map = PhaseMap::default();
    for instrument in calendar.instruments() {
        let Some(instrument_events) = events_by_instrument.get(instrument) else {
            continue;
        };
        let event_positions: Vec<(usize, i32)> = instrument_events
            .iter()
            .filter_map(|e| {
                calendar
                    .position_at_or_after(instrument, e.earnings_date)
                    .map(|pos| (pos, e.confidence.score()))
            })
            .collect();
        if event_positions.is_empty() {
            continue;
        }

        let dates = calendar.dates(instrument);
        let mut tags = HashMap::new();
        for (day, &date) in dates.iter().enumerate() {
            let best = event_positions
                .iter()
                .filter_map(|&(event_pos, confidence)| {
                    let offset = day as i64 - event_pos as i64;
                    (PRE_WINDOW.0..=POST_WINDOW.1)
                        .contains(&offset)
                        .then_some(Candidate { offset, confidence })
                })
                .min_by_key(|candidate| candidate.rank_key());

            if let Some(winner) = best {
                let phase = phase_of_offset(winner.offset);
                if phase != Phase::Non {
                    tags.insert(date, (phase, winner.offset));
                }
            }
        }
        if !tags.is_empty() {
            map.tags.insert(instrument.to_string(), tags);
        }
    }
    map
}
