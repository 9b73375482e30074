//! In-memory market-data adapter.
//!
//! Closing prices held entirely in memory, keyed by session date. This is
//! the data surface for tests and programmatic runs; file and database
//! loaders are deliberately out of scope.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::domain::calendar::{add_business_days, is_business_day};
use crate::domain::error::RotatorError;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, Default)]
pub struct MemoryDataAdapter {
    days: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl MemoryDataAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_close(mut self, asset: &str, date: NaiveDate, close: f64) -> Self {
        self.days
            .entry(date)
            .or_default()
            .insert(asset.to_string(), close);
        self
    }

    /// Insert one close per consecutive business day, starting at `start`
    /// (rolled forward off a weekend).
    pub fn with_series(mut self, asset: &str, start: NaiveDate, closes: &[f64]) -> Self {
        let mut date = if is_business_day(start) {
            start
        } else {
            add_business_days(start, 1)
        };
        for close in closes {
            self.days
                .entry(date)
                .or_default()
                .insert(asset.to_string(), *close);
            date = add_business_days(date, 1);
        }
        self
    }

    pub fn session_count(&self) -> usize {
        self.days.len()
    }
}

impl DataPort for MemoryDataAdapter {
    fn close_prices(&self, date: NaiveDate) -> Result<HashMap<String, f64>, RotatorError> {
        Ok(self.days.get(&date).cloned().unwrap_or_default())
    }
}
