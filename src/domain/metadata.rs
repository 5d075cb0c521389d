//! Dataset-level metadata consumed by the ranking engine.

use chrono::NaiveDate;
use serde::Serialize;

use super::price::PricePoint;

const DAYS_PER_YEAR: f64 = 365.25;
const MIN_DATASET_YEARS: f64 = 0.01;

/// Ranking inputs describing the dataset as a whole.
///
/// `volume_confirmation_enabled` is the current key; `volume_available`
/// is the legacy one and is only consulted when the former is unset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub volume_confirmation_enabled: Option<bool>,
    pub volume_available: Option<bool>,
    pub liquidity_ceiling: String,
}

impl Default for DatasetMeta {
    fn default() -> Self {
        DatasetMeta {
            start_date: None,
            end_date: None,
            volume_confirmation_enabled: None,
            volume_available: None,
            liquidity_ceiling: "B".to_string(),
        }
    }
}

impl DatasetMeta {
    /// Derive metadata from a canonical price table: volume anywhere in
    /// the data unlocks ceiling "A" and volume confirmation; the date
    /// span feeds the turnover denominator.
    pub fn from_prices(prices: &[PricePoint]) -> Self {
        let volume_present = prices.iter().any(|p| p.volume.is_some());
        DatasetMeta {
            start_date: prices.iter().map(|p| p.date).min(),
            end_date: prices.iter().map(|p| p.date).max(),
            volume_confirmation_enabled: Some(volume_present),
            volume_available: None,
            liquidity_ceiling: if volume_present { "A" } else { "B" }.to_string(),
        }
    }

    /// Volume confirmation with the legacy-key fallback.
    pub fn volume_confirmed(&self) -> bool {
        self.volume_confirmation_enabled
            .or(self.volume_available)
            .unwrap_or(false)
    }

    /// Dataset length in years, floored to avoid division blow-up;
    /// 1.0 when either boundary date is absent.
    pub fn dataset_years(&self) -> f64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let delta_days = (end - start).num_days() as f64;
                (delta_days / DAYS_PER_YEAR).max(MIN_DATASET_YEARS)
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_price(date: NaiveDate, volume: Option<f64>) -> PricePoint {
        PricePoint {
            instrument: "AAA".to_string(),
            date,
            close: 100.0,
            volume,
        }
    }

    #[test]
    fn volume_presence_unlocks_ceiling_a() {
        let prices = vec![
            make_price(date(2024, 1, 1), None),
            make_price(date(2024, 1, 2), Some(1000.0)),
        ];
        let meta = DatasetMeta::from_prices(&prices);
        assert_eq!(meta.liquidity_ceiling, "A");
        assert_eq!(meta.volume_confirmation_enabled, Some(true));
        assert!(meta.volume_confirmed());
        assert_eq!(meta.start_date, Some(date(2024, 1, 1)));
        assert_eq!(meta.end_date, Some(date(2024, 1, 2)));
    }

    #[test]
    fn missing_volume_caps_at_b() {
        let prices = vec![make_price(date(2024, 1, 1), None)];
        let meta = DatasetMeta::from_prices(&prices);
        assert_eq!(meta.liquidity_ceiling, "B");
        assert!(!meta.volume_confirmed());
    }

    #[test]
    fn legacy_volume_key_fallback() {
        let meta = DatasetMeta {
            volume_available: Some(true),
            ..DatasetMeta::default()
        };
        assert!(meta.volume_confirmed());

        // The current key takes precedence over the legacy one.
        let meta = DatasetMeta {
            volume_confirmation_enabled: Some(false),
            volume_available: Some(true),
            ..DatasetMeta::default()
        };
        assert!(!meta.volume_confirmed());
    }

    #[test]
    fn dataset_years_from_span() {
        let meta = DatasetMeta {
            start_date: Some(date(2023, 1, 1)),
            end_date: Some(date(2024, 1, 1)),
            ..DatasetMeta::default()
        };
        assert!((meta.dataset_years() - 365.0 / 365.25).abs() < 1e-12);
    }

    #[test]
    fn dataset_years_floor_and_default() {
        let same_day = DatasetMeta {
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 1)),
            ..DatasetMeta::default()
        };
        assert!((same_day.dataset_years() - 0.01).abs() < f64::EPSILON);

        let no_dates = DatasetMeta::default();
        assert!((no_dates.dataset_years() - 1.0).abs() < f64::EPSILON);
    }
}
