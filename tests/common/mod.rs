#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use rotator::adapters::memory_data_adapter::MemoryDataAdapter;
use rotator::domain::alpha::{AlphaModel, RankBlendEngine, RankBlendParams};
use rotator::domain::momentum::MomentumSignal;
use rotator::domain::signals::SignalSet;
use rotator::domain::universe::StaticUniverse;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn universe(assets: &[&str]) -> StaticUniverse {
    StaticUniverse::new(assets.iter().map(|a| a.to_string()).collect())
}

/// Rank-blend model over a 3-day heat and 1-day chill, matching
/// [`momentum_signals`].
pub fn rank_blend_model(top_n: usize) -> AlphaModel {
    let params = RankBlendParams {
        heat_signal: "heat".to_string(),
        chill_signal: "chill".to_string(),
        heat_lookback: 3,
        chill_lookback: 1,
        heat_weight: 0.5,
        top_n,
    };
    AlphaModel::RankBlend(RankBlendEngine::new(params).unwrap())
}

pub fn momentum_signals() -> SignalSet {
    SignalSet::new()
        .with("heat", Box::new(MomentumSignal::new(3)))
        .with("chill", Box::new(MomentumSignal::new(1)))
}

/// Ten business days from Mon 2024-01-01: A trends up strongly and dips at
/// the end of week one, B climbs mildly with a pop, C falls throughout.
pub fn sample_data() -> MemoryDataAdapter {
    MemoryDataAdapter::new()
        .with_series(
            "A",
            date(2024, 1, 1),
            &[100.0, 101.0, 100.0, 104.0, 108.0, 106.0, 107.0, 109.0, 110.0, 111.0],
        )
        .with_series(
            "B",
            date(2024, 1, 1),
            &[100.0, 100.0, 101.0, 102.0, 102.0, 104.0, 104.0, 105.0, 105.0, 106.0],
        )
        .with_series(
            "C",
            date(2024, 1, 1),
            &[100.0, 100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0],
        )
}
