//! Alpha models: converting signals into target portfolio weights.
//!
//! The rank-blend engine ranks a long-horizon "heat" signal descending and a
//! short-horizon "chill" signal ascending, blends the two rank lists, and
//! allocates `1 / top_n` of capital to each of the `top_n` smallest composite
//! ranks. The fixed-weights engine emits a static allocation and is the usual
//! benchmark counterpart.

use chrono::{DateTime, Utc};

use crate::domain::composite::blend;
use crate::domain::error::RotatorError;
use crate::domain::ranking::{rank, Direction};
use crate::domain::signals::SignalSet;
use crate::domain::weights::TargetWeights;
use crate::ports::universe_port::UniversePort;

/// Parameters for the rank-blend engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RankBlendParams {
    pub heat_signal: String,
    pub chill_signal: String,
    pub heat_lookback: usize,
    pub chill_lookback: usize,
    pub heat_weight: f64,
    pub top_n: usize,
}

impl Default for RankBlendParams {
    fn default() -> Self {
        // Six months of business days against one trading week
        RankBlendParams {
            heat_signal: "heat".to_string(),
            chill_signal: "chill".to_string(),
            heat_lookback: 126,
            chill_lookback: 5,
            heat_weight: 0.5,
            top_n: 3,
        }
    }
}

impl RankBlendParams {
    pub fn validate(&self) -> Result<(), RotatorError> {
        if self.top_n < 1 {
            return Err(RotatorError::InvalidTopN(self.top_n));
        }
        if !(0.0..=1.0).contains(&self.heat_weight) {
            return Err(RotatorError::InvalidBlendWeight(self.heat_weight));
        }
        Ok(())
    }

    /// Observation periods required before the engine activates.
    pub fn required_warmup(&self) -> usize {
        self.heat_lookback.max(self.chill_lookback)
    }
}

/// Composite-rank alpha-weighting engine.
#[derive(Debug, Clone)]
pub struct RankBlendEngine {
    params: RankBlendParams,
}

impl RankBlendEngine {
    pub fn new(params: RankBlendParams) -> Result<Self, RotatorError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RankBlendParams {
        &self.params
    }

    /// Compute target weights for one rebalance event.
    ///
    /// `warmup` is the minimum warmup across the engine's signals, supplied
    /// explicitly by the driver. Below the required lookback the engine is
    /// inert and returns the all-zero vector; the comparison is made fresh at
    /// every call, with no memory of prior activations.
    pub fn evaluate(
        &self,
        at: DateTime<Utc>,
        universe: &dyn UniversePort,
        signals: &SignalSet,
        warmup: usize,
    ) -> Result<TargetWeights, RotatorError> {
        let members = universe.members_at(at);
        let mut weights = TargetWeights::zeroed(&members);

        if members.is_empty() || warmup < self.params.required_warmup() {
            return Ok(weights);
        }

        let heat = signals
            .get(&self.params.heat_signal)
            .ok_or_else(|| RotatorError::UnknownSignal(self.params.heat_signal.clone()))?;
        let chill = signals
            .get(&self.params.chill_signal)
            .ok_or_else(|| RotatorError::UnknownSignal(self.params.chill_signal.clone()))?;

        let heat_values: Vec<(String, f64)> = members
            .iter()
            .map(|asset| (asset.clone(), heat.value(asset, self.params.heat_lookback)))
            .collect();
        let chill_values: Vec<(String, f64)> = members
            .iter()
            .map(|asset| (asset.clone(), chill.value(asset, self.params.chill_lookback)))
            .collect();

        let heat_ranks = rank(&heat_values, Direction::Descending);
        let chill_ranks = rank(&chill_values, Direction::Ascending);

        let composite = blend(&[
            (&heat_ranks, self.params.heat_weight),
            (&chill_ranks, 1.0 - self.params.heat_weight),
        ])?;

        // Always 1/top_n, never 1/selected: with fewer assets than top_n the
        // remainder stays deliberately uninvested.
        let per_asset = 1.0 / self.params.top_n as f64;
        for (asset, _) in composite.top(self.params.top_n) {
            weights.set(asset, per_asset);
        }

        Ok(weights)
    }
}

/// Static allocation, re-emitted at every event.
#[derive(Debug, Clone)]
pub struct FixedWeightsEngine {
    weights: Vec<(String, f64)>,
}

impl FixedWeightsEngine {
    pub fn new(weights: Vec<(String, f64)>) -> Self {
        Self { weights }
    }

    /// Configured weights restricted to the current universe; members with
    /// no configured weight stay at zero.
    pub fn evaluate(&self, at: DateTime<Utc>, universe: &dyn UniversePort) -> TargetWeights {
        let members = universe.members_at(at);
        let mut target = TargetWeights::zeroed(&members);
        for (asset, weight) in &self.weights {
            if target.contains(asset) {
                target.set(asset, *weight);
            }
        }
        target
    }
}

/// The closed set of alpha-weighting policies.
pub enum AlphaModel {
    RankBlend(RankBlendEngine),
    FixedWeights(FixedWeightsEngine),
}

impl AlphaModel {
    /// Signal names this model reads; the driver passes their minimum warmup
    /// into [`AlphaModel::evaluate`].
    pub fn signal_names(&self) -> Vec<&str> {
        match self {
            AlphaModel::RankBlend(engine) => vec![
                engine.params().heat_signal.as_str(),
                engine.params().chill_signal.as_str(),
            ],
            AlphaModel::FixedWeights(_) => Vec::new(),
        }
    }

    pub fn evaluate(
        &self,
        at: DateTime<Utc>,
        universe: &dyn UniversePort,
        signals: &SignalSet,
        warmup: usize,
    ) -> Result<TargetWeights, RotatorError> {
        match self {
            AlphaModel::RankBlend(engine) => engine.evaluate(at, universe, signals, warmup),
            AlphaModel::FixedWeights(engine) => Ok(engine.evaluate(at, universe)),
        }
    }
}
