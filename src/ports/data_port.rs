//! Market-data port trait.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::error::RotatorError;

/// The market-data collaborator's only surface: closing prices per asset for
/// one session date. An empty map means no session (holiday). Failures
/// propagate to the caller unchanged.
pub trait DataPort {
    fn close_prices(&self, date: NaiveDate) -> Result<HashMap<String, f64>, RotatorError>;
}
