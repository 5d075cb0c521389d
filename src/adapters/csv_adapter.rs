//! CSV file data adapter.
//!
//! Parses canonical tables by header name. Rows with unparseable dates
//! or non-finite numerics are dropped; a missing required header is a
//! hard error.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::domain::earnings::{Confidence, EarningsEvent};
use crate::domain::error::NetrankError;
use crate::domain::planner::PlannerRow;
use crate::domain::price::PricePoint;
use crate::domain::trade::Entry;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    prices_path: PathBuf,
    entries_path: Option<PathBuf>,
    events_path: Option<PathBuf>,
    planner_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new<P: Into<PathBuf>>(prices_path: P) -> Self {
        Self {
            prices_path: prices_path.into(),
            entries_path: None,
            events_path: None,
            planner_path: None,
        }
    }

    pub fn with_entries<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.entries_path = Some(path.into());
        self
    }

    pub fn with_events<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.events_path = Some(path.into());
        self
    }

    pub fn with_planner<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.planner_path = Some(path.into());
        self
    }

    fn required_path<'a>(
        path: &'a Option<PathBuf>,
        key: &str,
    ) -> Result<&'a Path, NetrankError> {
        path.as_deref().ok_or_else(|| NetrankError::ConfigMissing {
            section: "data".to_string(),
            key: key.to_string(),
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, NetrankError> {
        let mut reader = open(&self.prices_path)?;
        let columns = Columns::resolve(&mut reader, &["date", "instrument", "close"])?;
        let volume_col = columns.optional("volume");

        let mut prices = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            let Some(date) = columns.date(&record, "date") else {
                continue;
            };
            let Some(instrument) = columns.text(&record, "instrument") else {
                continue;
            };
            let Some(close) = columns.number(&record, "close") else {
                continue;
            };
            let volume = volume_col
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());
            prices.push(PricePoint {
                instrument,
                date,
                close,
                volume,
            });
        }
        Ok(prices)
    }

    fn fetch_entries(&self) -> Result<Vec<Entry>, NetrankError> {
        let path = Self::required_path(&self.entries_path, "entries")?;
        let mut reader = open(path)?;
        let columns = Columns::resolve(&mut reader, &["instrument", "entry_date"])?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            let Some(instrument) = columns.text(&record, "instrument") else {
                continue;
            };
            let Some(entry_date) = columns.date(&record, "entry_date") else {
                continue;
            };
            entries.push(Entry {
                instrument,
                entry_date,
            });
        }
        Ok(entries)
    }

    fn fetch_events(&self) -> Result<Vec<EarningsEvent>, NetrankError> {
        let path = Self::required_path(&self.events_path, "events")?;
        let mut reader = open(path)?;
        let columns = Columns::resolve(&mut reader, &["instrument", "earnings_date"])?;
        let confidence_col = columns.optional("confidence");

        let mut events = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            let Some(instrument) = columns.text(&record, "instrument") else {
                continue;
            };
            let Some(earnings_date) = columns.date(&record, "earnings_date") else {
                continue;
            };
            // Datasets without a confidence column are treated as
            // estimated schedules, not unconfirmed rumors.
            let confidence = match confidence_col {
                Some(i) => Confidence::parse(record.get(i).unwrap_or("")),
                None => Confidence::Estimated,
            };
            events.push(EarningsEvent {
                instrument,
                earnings_date,
                confidence,
            });
        }
        Ok(events)
    }

    fn fetch_planner_rows(&self) -> Result<Vec<PlannerRow>, NetrankError> {
        let path = Self::required_path(&self.planner_path, "planner")?;
        let mut reader = open(path)?;
        let columns =
            Columns::resolve(&mut reader, &["instrument", "entry_date", "holding_window"])?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            let Some(instrument) = columns.text(&record, "instrument") else {
                continue;
            };
            let Some(entry_date) = columns.date(&record, "entry_date") else {
                continue;
            };
            let Some(holding_window) = columns
                .index("holding_window")
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<u32>().ok())
            else {
                continue;
            };
            rows.push(PlannerRow {
                instrument,
                entry_date,
                holding_window,
            });
        }
        Ok(rows)
    }
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, NetrankError> {
    csv::Reader::from_path(path).map_err(|e| NetrankError::Data {
        reason: format!("failed to open {}: {}", path.display(), e),
    })
}

fn read_error(e: csv::Error) -> NetrankError {
    NetrankError::Data {
        reason: format!("CSV parse error: {e}"),
    }
}

/// Header-name to column-index resolution, case-insensitive.
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn resolve(
        reader: &mut csv::Reader<std::fs::File>,
        required: &[&str],
    ) -> Result<Self, NetrankError> {
        let headers = reader.headers().map_err(read_error)?;
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let columns = Columns { names };
        for column in required {
            if columns.index(column).is_none() {
                return Err(NetrankError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
        Ok(columns)
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.index(name)
    }

    fn text(&self, record: &csv::StringRecord, name: &str) -> Option<String> {
        let value = record.get(self.index(name)?)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn date(&self, record: &csv::StringRecord, name: &str) -> Option<NaiveDate> {
        let value = record.get(self.index(name)?)?.trim();
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    }

    fn number(&self, record: &csv::StringRecord, name: &str) -> Option<f64> {
        let value = record.get(self.index(name)?)?.trim();
        value.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}
