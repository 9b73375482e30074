//! Named signal collection.

use std::collections::HashMap;

use crate::domain::error::RotatorError;
use crate::ports::signal_port::SignalPort;

/// A named set of signals, updated together once per observation period.
///
/// The driver owns the set and feeds it observations; the weighting engine
/// only reads from it.
#[derive(Default)]
pub struct SignalSet {
    signals: HashMap<String, Box<dyn SignalPort>>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, signal: Box<dyn SignalPort>) -> Self {
        self.insert(name, signal);
        self
    }

    pub fn insert(&mut self, name: &str, signal: Box<dyn SignalPort>) {
        self.signals.insert(name.to_string(), signal);
    }

    pub fn get(&self, name: &str) -> Option<&dyn SignalPort> {
        self.signals.get(name).map(|s| s.as_ref())
    }

    /// Fan one observation period out to every signal.
    pub fn observe(&mut self, closes: &HashMap<String, f64>) {
        for signal in self.signals.values_mut() {
            signal.observe(closes);
        }
    }

    /// Minimum warmup across the named signals. Zero names yields zero.
    pub fn min_warmup(&self, names: &[&str]) -> Result<usize, RotatorError> {
        if names.is_empty() {
            return Ok(0);
        }
        let mut minimum = usize::MAX;
        for name in names {
            let signal = self
                .get(name)
                .ok_or_else(|| RotatorError::UnknownSignal(name.to_string()))?;
            minimum = minimum.min(signal.warmup());
        }
        Ok(minimum)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::momentum::MomentumSignal;

    fn closes(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(a, c)| (a.to_string(), *c)).collect()
    }

    fn two_signal_set() -> SignalSet {
        SignalSet::new()
            .with("heat", Box::new(MomentumSignal::new(6)))
            .with("chill", Box::new(MomentumSignal::new(1)))
    }

    #[test]
    fn observe_fans_out_to_all_signals() {
        let mut signals = two_signal_set();
        signals.observe(&closes(&[("XLB", 100.0)]));
        signals.observe(&closes(&[("XLB", 110.0)]));

        let chill = signals.get("chill").unwrap();
        assert_eq!(chill.warmup(), 2);
        assert!((chill.value("XLB", 1) - 0.10).abs() < 1e-12);

        let heat = signals.get("heat").unwrap();
        assert_eq!(heat.warmup(), 2);
    }

    #[test]
    fn get_unknown_signal_is_none() {
        let signals = two_signal_set();
        assert!(signals.get("volume").is_none());
    }

    #[test]
    fn min_warmup_takes_the_minimum() {
        let mut late = MomentumSignal::new(3);
        late.observe(&closes(&[("XLB", 100.0)]));

        let mut early = MomentumSignal::new(3);
        for close in [100.0, 101.0, 102.0] {
            early.observe(&closes(&[("XLB", close)]));
        }

        let signals = SignalSet::new()
            .with("late", Box::new(late))
            .with("early", Box::new(early));

        assert_eq!(signals.min_warmup(&["late", "early"]).unwrap(), 1);
        assert_eq!(signals.min_warmup(&["early"]).unwrap(), 3);
    }

    #[test]
    fn min_warmup_of_no_names_is_zero() {
        let signals = two_signal_set();
        assert_eq!(signals.min_warmup(&[]).unwrap(), 0);
    }

    #[test]
    fn min_warmup_unknown_name_fails() {
        let signals = two_signal_set();
        let result = signals.min_warmup(&["heat", "volume"]);
        assert!(matches!(
            result,
            Err(RotatorError::UnknownSignal(s)) if s == "volume"
        ));
    }
}
