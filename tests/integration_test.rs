//! Integration tests for the full session pipeline.
//!
//! Tests cover:
//! - Full weekly session with in-memory data: inert then active allocations
//! - Target-weight invariants across every evaluated event
//! - Under-allocation when the universe is smaller than top_n
//! - Dynamic universe membership reflected in the weight keys
//! - Strategy and benchmark sessions running concurrently on separate
//!   threads, agreeing with their serial counterparts

mod common;

use common::*;
use rotator::adapters::memory_data_adapter::MemoryDataAdapter;
use rotator::domain::alpha::{AlphaModel, FixedWeightsEngine};
use rotator::domain::calendar::{RebalanceCalendar, Schedule};
use rotator::domain::session::{run_session, SessionConfig, SessionResult};
use rotator::domain::universe::DynamicUniverse;
use chrono::Weekday;

fn weekly_monday() -> RebalanceCalendar {
    RebalanceCalendar::new(
        Schedule::Weekly {
            weekday: Weekday::Mon,
        },
        false,
    )
}

fn two_week_session() -> SessionConfig {
    SessionConfig {
        start: dt(2024, 1, 1, 0, 0),
        end: dt(2024, 1, 12, 23, 59),
        burn_in: None,
    }
}

mod full_session_pipeline {
    use super::*;

    #[test]
    fn weekly_session_produces_expected_allocation_history() {
        let config = two_week_session();
        let calendar = weekly_monday();
        let model = rank_blend_model(2);
        let universe = universe(&["A", "B", "C"]);
        let mut signals = momentum_signals();
        let data = sample_data();

        let result =
            run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap();

        assert_eq!(result.observation_days, 10);
        assert_eq!(result.allocations.len(), 2);

        // First Monday: one observation against a 3-period lookback — inert
        let first = &result.allocations[0];
        assert_eq!(first.at, dt(2024, 1, 1, 21, 0));
        assert!(first.weights.is_flat());

        // Second Monday: warmed up; A leads both signals, B beats C on the
        // tie (see common::sample_data)
        let second = &result.allocations[1];
        assert_eq!(second.at, dt(2024, 1, 8, 21, 0));
        assert_eq!(second.weights.get("A"), 0.5);
        assert_eq!(second.weights.get("B"), 0.5);
        assert_eq!(second.weights.get("C"), 0.0);
    }

    #[test]
    fn events_arrive_in_strictly_increasing_order() {
        let config = two_week_session();
        let calendar = RebalanceCalendar::new(Schedule::Daily, false);
        let model = rank_blend_model(1);
        let universe = universe(&["A", "B", "C"]);
        let mut signals = momentum_signals();
        let data = sample_data();

        let result =
            run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap();

        for pair in result.allocations.windows(2) {
            assert!(pair[0].at < pair[1].at);
        }
    }
}

mod target_weight_invariants {
    use super::*;

    #[test]
    fn keys_match_universe_and_sum_stays_bounded() {
        let config = two_week_session();
        let calendar = RebalanceCalendar::new(Schedule::Daily, false);
        let model = rank_blend_model(2);
        let universe = universe(&["A", "B", "C"]);
        let mut signals = momentum_signals();
        let data = sample_data();

        let result =
            run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap();

        assert_eq!(result.allocations.len(), 10);
        for record in &result.allocations {
            let mut keys: Vec<&str> =
                record.weights.assets().map(|a| a.as_str()).collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["A", "B", "C"]);
            assert!(record.weights.allocated() <= 1.0 + 1e-12);
            for (_, weight) in record.weights.iter() {
                assert!(*weight >= 0.0);
            }
        }
    }

    #[test]
    fn under_allocates_with_small_universe() {
        let config = two_week_session();
        let calendar = weekly_monday();
        let model = rank_blend_model(3);
        let universe = universe(&["A", "B"]);
        let mut signals = momentum_signals();
        let data = sample_data();

        let result =
            run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap();

        // Active from the second Monday: both assets at exactly 1/3, a third
        // of capital deliberately left in cash
        let active = &result.allocations[1];
        assert!((active.weights.get("A") - 1.0 / 3.0).abs() < 1e-12);
        assert!((active.weights.get("B") - 1.0 / 3.0).abs() < 1e-12);
        assert!((active.weights.allocated() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn dynamic_universe_changes_the_key_set() {
        let config = two_week_session();
        let calendar = weekly_monday();
        let model = rank_blend_model(2);
        // C joins the universe between the two Mondays
        let universe = DynamicUniverse::new()
            .with_member("A", dt(2024, 1, 1, 0, 0), None)
            .with_member("B", dt(2024, 1, 1, 0, 0), None)
            .with_member("C", dt(2024, 1, 5, 0, 0), None);
        let mut signals = momentum_signals();
        let data = sample_data();

        let result =
            run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap();

        assert_eq!(result.allocations[0].weights.len(), 2);
        assert!(!result.allocations[0].weights.contains("C"));
        assert_eq!(result.allocations[1].weights.len(), 3);
        assert!(result.allocations[1].weights.contains("C"));
    }
}

mod concurrent_runs {
    use super::*;
    use std::thread;

    fn strategy_run() -> SessionResult {
        let config = two_week_session();
        let calendar = weekly_monday();
        let model = rank_blend_model(2);
        let universe = universe(&["A", "B", "C"]);
        let mut signals = momentum_signals();
        let data = sample_data();
        run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap()
    }

    fn benchmark_run() -> SessionResult {
        let config = two_week_session();
        let calendar = RebalanceCalendar::new(Schedule::BuyAndHold, true);
        let model =
            AlphaModel::FixedWeights(FixedWeightsEngine::new(vec![("SPY".to_string(), 1.0)]));
        let universe = universe(&["SPY"]);
        let mut signals = momentum_signals();
        let data = MemoryDataAdapter::new().with_series(
            "SPY",
            date(2024, 1, 1),
            &[400.0, 402.0, 401.0, 405.0, 407.0, 406.0, 409.0, 411.0, 410.0, 413.0],
        );
        run_session(&config, &calendar, &model, &universe, &mut signals, &data).unwrap()
    }

    #[test]
    fn strategy_and_benchmark_share_nothing_and_agree_with_serial_runs() {
        let serial_strategy = strategy_run();
        let serial_benchmark = benchmark_run();

        let strategy_handle = thread::spawn(strategy_run);
        let benchmark_handle = thread::spawn(benchmark_run);

        let threaded_strategy = strategy_handle.join().unwrap();
        let threaded_benchmark = benchmark_handle.join().unwrap();

        assert_eq!(serial_strategy.allocations, threaded_strategy.allocations);
        assert_eq!(serial_benchmark.allocations, threaded_benchmark.allocations);

        // The benchmark is a single buy-and-hold event at the session start
        assert_eq!(threaded_benchmark.allocations.len(), 1);
        assert_eq!(threaded_benchmark.allocations[0].weights.get("SPY"), 1.0);
    }
}
