//! Integration tests.
//!
//! Covers the full evaluation pipeline with a mock data port (no
//! files), the planner warning pipeline, and error propagation for
//! duplicate price rows and bad configuration keys.

mod common;

use common::*;
use netrank::domain::calendar::TradingCalendar;
use netrank::domain::costs::resolve_cost_config;
use netrank::domain::earnings::{tag_earnings_phases, Confidence, Phase};
use netrank::domain::error::NetrankError;
use netrank::domain::metadata::DatasetMeta;
use netrank::domain::planner::compose_planner_warnings;
use netrank::domain::ranking::{rank_instruments, Tier};
use netrank::domain::summary::summarize;
use netrank::domain::trade::{compute_trades, tag_trades};
use netrank::ports::data_port::DataPort;

mod full_pipeline {
    use super::*;

    fn rising_and_falling_port() -> MockDataPort {
        let mut prices = make_price_series("AAA", &(0..12).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        prices.extend(make_price_series("BBB", &(0..12).map(|i| 100.0 - i as f64).collect::<Vec<_>>()));
        MockDataPort::new()
            .with_prices(prices)
            .with_entries(vec![
                make_entry("AAA", date(2024, 1, 1)),
                make_entry("BBB", date(2024, 1, 1)),
            ])
    }

    #[test]
    fn evaluate_pipeline_ranks_winner_first() {
        let port = rising_and_falling_port();
        let prices = port.fetch_prices().unwrap();
        let entries = port.fetch_entries().unwrap();

        let config = resolve_cost_config("Default", true, Some(0.0), Some(0.0)).unwrap();
        let trades =
            compute_trades(&prices, &entries, &[5, 10], config.round_trip_cost_rate).unwrap();
        assert_eq!(trades.len(), 4);

        let (summary, overall) = summarize(&trades);
        assert_eq!(summary.len(), 4);
        assert_eq!(overall.len(), 2);

        let meta = DatasetMeta {
            volume_confirmation_enabled: Some(true),
            liquidity_ceiling: "A".to_string(),
            ..DatasetMeta::default()
        };
        let ranked = rank_instruments(&summary, &meta, "active_growth").unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].instrument, "AAA");
        assert_eq!(ranked[0].best_window, 10);
        assert_eq!(ranked[0].tier, Tier::A);
        assert!(ranked[0].warnings.is_empty());
        assert_eq!(ranked[1].instrument, "BBB");
        assert_eq!(ranked[1].tier, Tier::C);
    }

    #[test]
    fn evaluate_pipeline_applies_liquidity_cap_from_metadata() {
        let port = rising_and_falling_port();
        let prices = port.fetch_prices().unwrap();
        let entries = port.fetch_entries().unwrap();

        let trades = compute_trades(&prices, &entries, &[5, 10], 0.0).unwrap();
        let (summary, _) = summarize(&trades);

        // No volume anywhere: derived metadata disables confirmation
        // and ceilings at B, so no instrument can reach tier A.
        let meta = DatasetMeta::from_prices(&prices);
        assert_eq!(meta.liquidity_ceiling, "B");
        let ranked = rank_instruments(&summary, &meta, "active_growth").unwrap();
        assert!(ranked.iter().all(|r| r.tier != Tier::A));
        assert!(ranked.iter().all(|r| !r.warnings.is_empty()));
    }

    #[test]
    fn duplicate_prices_abort_before_any_trade() {
        let mut prices = make_price_series("AAA", &[100.0, 101.0, 102.0]);
        prices.push(make_price("AAA", date(2024, 1, 2), 999.0));
        let entries = vec![make_entry("AAA", date(2024, 1, 1))];

        let err = compute_trades(&prices, &entries, &[1], 0.0).unwrap_err();
        assert!(
            matches!(err, NetrankError::Validation { reason } if reason.contains("Duplicate"))
        );
    }

    #[test]
    fn empty_inputs_flow_through_as_empty_outputs() {
        let trades = compute_trades(&[], &[], &[5], 0.003).unwrap();
        assert!(trades.is_empty());

        let (summary, overall) = summarize(&trades);
        assert!(summary.is_empty());
        assert!(overall.is_empty());

        let ranked =
            rank_instruments(&summary, &DatasetMeta::default(), "income_stability").unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn trades_tag_with_phases_from_the_same_calendar() {
        let prices = make_price_series("AAA", &(0..12).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let entries = vec![make_entry("AAA", date(2024, 1, 1))];
        let events = vec![make_event("AAA", date(2024, 1, 6), Confidence::Confirmed)];

        let trades = compute_trades(&prices, &entries, &[5], 0.0).unwrap();
        let calendar = TradingCalendar::build(&prices);
        let phases = tag_earnings_phases(&calendar, &events);

        let tagged = tag_trades(&trades, &phases);
        assert_eq!(tagged[0].entry_phase, Phase::Pre);
        // Exit lands exactly on the event day.
        assert_eq!(tagged[0].exit_phase, Phase::Event);
        assert_eq!(tagged[0].exit_day_offset, Some(0));
    }
}

mod planner_pipeline {
    use super::*;

    fn planner_port() -> MockDataPort {
        let prices = vec![
            make_price("AAA", date(2024, 1, 2), 10.0),
            make_price("AAA", date(2024, 1, 3), 11.0),
            make_price("AAA", date(2024, 1, 4), 12.0),
            make_price("AAA", date(2024, 1, 5), 13.0),
            make_price("AAA", date(2024, 1, 8), 14.0),
            make_price("AAA", date(2024, 1, 9), 15.0),
        ];
        MockDataPort::new()
            .with_prices(prices)
            .with_events(vec![make_event(
                "AAA",
                date(2024, 1, 3),
                Confidence::Confirmed,
            )])
            .with_planner_rows(vec![netrank::domain::planner::PlannerRow {
                instrument: "AAA".to_string(),
                entry_date: date(2024, 1, 2),
                holding_window: 2,
            }])
    }

    #[test]
    fn plan_pipeline_flags_phase_crossing() {
        let port = planner_port();
        let warnings = compose_planner_warnings(
            &port.fetch_planner_rows().unwrap(),
            &port.fetch_prices().unwrap(),
            &port.fetch_events().unwrap(),
            "income_stability",
        )
        .unwrap();

        assert_eq!(warnings.len(), 1);
        let row = &warnings[0];
        assert_eq!(row.entry_phase, Phase::Pre);
        assert_eq!(row.exit_phase, Phase::Event);
        assert!(row.overlaps_earnings_window);
        assert!(row.warning_body.as_deref().unwrap().contains("overlaps an earnings window"));
    }

    #[test]
    fn plan_pipeline_rejects_objective_without_copy() {
        let port = planner_port();
        let err = compose_planner_warnings(
            &port.fetch_planner_rows().unwrap(),
            &port.fetch_prices().unwrap(),
            &port.fetch_events().unwrap(),
            "risk_controlled_total_return",
        )
        .unwrap_err();
        assert!(matches!(err, NetrankError::UnknownObjective { .. }));
    }
}
