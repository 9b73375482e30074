//! Target portfolio weights.

use std::collections::BTreeMap;

/// Map of asset → fraction of capital in [0, 1].
///
/// The key set always equals the universe member set the map was created
/// from; unselected assets stay at 0.0. The sum of values never exceeds 1.0;
/// any residual is implicitly held as cash. Recreated fresh at every
/// evaluation, never carried between events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetWeights {
    weights: BTreeMap<String, f64>,
}

impl TargetWeights {
    /// A weight map covering `assets`, every entry at 0.0.
    pub fn zeroed(assets: &[String]) -> Self {
        Self {
            weights: assets.iter().map(|a| (a.clone(), 0.0)).collect(),
        }
    }

    pub fn set(&mut self, asset: &str, weight: f64) {
        self.weights.insert(asset.to_string(), weight);
    }

    /// Weight for `asset`; assets outside the map are unallocated.
    pub fn get(&self, asset: &str) -> f64 {
        self.weights.get(asset).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.weights.contains_key(asset)
    }

    /// Total allocated fraction.
    pub fn allocated(&self) -> f64 {
        self.weights.values().sum()
    }

    /// True when no capital is allocated at all.
    pub fn is_flat(&self) -> bool {
        self.weights.values().all(|w| *w == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.weights.iter()
    }

    pub fn assets(&self) -> impl Iterator<Item = &String> {
        self.weights.keys()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
