//! Composite rank blending.
//!
//! Blends several rank lists over the same asset set into one score per
//! asset. The system favors the smallest blended rank: for a two-signal
//! heat/chill combination this selects assets that are simultaneously strong
//! over the long horizon and not overbought over the short one.

use std::collections::HashMap;

use crate::domain::error::RotatorError;
use crate::domain::ranking::RankedList;

/// (asset, blended rank) pairs sorted ascending; ties keep the assets'
/// original iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub entries: Vec<(String, f64)>,
}

impl CompositeScore {
    /// The `n` most-preferred entries; all of them when fewer exist.
    pub fn top(&self, n: usize) -> &[(String, f64)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn score_of(&self, asset: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| a == asset)
            .map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Blend weighted rank lists into a composite score.
///
/// Every list must cover an identical asset set; a mismatch is a
/// configuration error. Scores are the weighted sum of each asset's ranks,
/// accumulated in the first list's iteration order and stable-sorted
/// ascending.
pub fn blend(lists: &[(&RankedList, f64)]) -> Result<CompositeScore, RotatorError> {
    let Some((first, _)) = lists.first() else {
        return Ok(CompositeScore {
            entries: Vec::new(),
        });
    };

    let reference = first.asset_set();
    let mut rank_maps: Vec<(HashMap<&str, usize>, f64)> = Vec::with_capacity(lists.len());
    for (index, (list, weight)) in lists.iter().enumerate() {
        if list.asset_set() != reference {
            return Err(RotatorError::MismatchedAssetSets {
                reason: format!(
                    "list {} covers {} assets, list 1 covers {}",
                    index + 1,
                    list.len(),
                    first.len()
                ),
            });
        }
        let map = list
            .entries
            .iter()
            .map(|(asset, rank)| (asset.as_str(), *rank))
            .collect();
        rank_maps.push((map, *weight));
    }

    let mut entries: Vec<(String, f64)> = first
        .entries
        .iter()
        .map(|(asset, _)| {
            let score = rank_maps
                .iter()
                .map(|(map, weight)| weight * map[asset.as_str()] as f64)
                .sum();
            (asset.clone(), score)
        })
        .collect();

    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(CompositeScore { entries })
}
