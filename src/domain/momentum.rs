//! Holding-period-return momentum signal.

use std::collections::{HashMap, VecDeque};

use crate::ports::signal_port::SignalPort;

/// Rolling momentum over daily closes.
///
/// Keeps the last `max_lookback + 1` closes per asset; the value over
/// `lookback` periods is the holding-period return
/// `latest / close[lookback periods ago] - 1`. Returns NaN until an asset
/// has accumulated `lookback + 1` observations, which the ranking layer
/// demotes to the worst rank.
#[derive(Debug, Clone, Default)]
pub struct MomentumSignal {
    max_lookback: usize,
    buffers: HashMap<String, VecDeque<f64>>,
    warmup: usize,
}

impl MomentumSignal {
    pub fn new(max_lookback: usize) -> Self {
        Self {
            max_lookback,
            buffers: HashMap::new(),
            warmup: 0,
        }
    }

    pub fn max_lookback(&self) -> usize {
        self.max_lookback
    }
}

impl SignalPort for MomentumSignal {
    fn observe(&mut self, closes: &HashMap<String, f64>) {
        for (asset, close) in closes {
            let buffer = self.buffers.entry(asset.clone()).or_default();
            buffer.push_back(*close);
            if buffer.len() > self.max_lookback + 1 {
                buffer.pop_front();
            }
        }
        self.warmup += 1;
    }

    fn value(&self, asset: &str, lookback: usize) -> f64 {
        if lookback == 0 || lookback > self.max_lookback {
            return f64::NAN;
        }
        let Some(buffer) = self.buffers.get(asset) else {
            return f64::NAN;
        };
        if buffer.len() < lookback + 1 {
            return f64::NAN;
        }
        let latest = buffer[buffer.len() - 1];
        let base = buffer[buffer.len() - 1 - lookback];
        if base == 0.0 {
            return f64::NAN;
        }
        latest / base - 1.0
    }

    fn warmup(&self) -> usize {
        self.warmup
    }
}
