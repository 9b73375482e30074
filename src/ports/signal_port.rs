//! Signal provider port trait.

use std::collections::HashMap;

/// A named per-asset performance signal.
///
/// `value` is a pure query; the weighting engine never mutates a signal.
/// Observation happens on the driver side, once per observation period.
pub trait SignalPort {
    /// Record one observation period of closing prices.
    fn observe(&mut self, closes: &HashMap<String, f64>);

    /// Scalar signal value for `asset` over `lookback` periods. Returns NaN
    /// when no value can be produced (unknown asset, insufficient history,
    /// or a lookback the signal does not support).
    fn value(&self, asset: &str, lookback: usize) -> f64;

    /// Elapsed full observation periods, monotonically non-decreasing.
    fn warmup(&self) -> usize;
}
