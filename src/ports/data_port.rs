//! Data access port trait.
//!
//! Upstream ingestion hands the core canonical, typed tables; the
//! concrete adapter decides where they come from.

use crate::domain::earnings::EarningsEvent;
use crate::domain::error::NetrankError;
use crate::domain::planner::PlannerRow;
use crate::domain::price::PricePoint;
use crate::domain::trade::Entry;

pub trait DataPort {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, NetrankError>;

    fn fetch_entries(&self) -> Result<Vec<Entry>, NetrankError>;

    fn fetch_events(&self) -> Result<Vec<EarningsEvent>, NetrankError>;

    fn fetch_planner_rows(&self) -> Result<Vec<PlannerRow>, NetrankError>;
}
