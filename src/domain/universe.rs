//! Universe implementations and asset-list parsing.
//!
//! A universe owns asset membership: a static universe is a fixed list, a
//! dynamic universe gives each asset a membership window (start, optional
//! end). Both preserve insertion order, which downstream ranking uses as the
//! tie-break order.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::ports::universe_port::UniversePort;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in asset list")]
    EmptyToken,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),
}

/// Parse a comma-separated asset list: trimmed, uppercased, order-preserving.
pub fn parse_assets(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let asset = trimmed.to_uppercase();
        if seen.contains(&asset) {
            return Err(UniverseError::DuplicateAsset(asset));
        }
        seen.insert(asset.clone());
        assets.push(asset);
    }

    Ok(assets)
}

/// A fixed asset list, valid at every timestamp.
#[derive(Debug, Clone)]
pub struct StaticUniverse {
    assets: Vec<String>,
}

impl StaticUniverse {
    pub fn new(assets: Vec<String>) -> Self {
        Self { assets }
    }

    pub fn count(&self) -> usize {
        self.assets.len()
    }
}

impl UniversePort for StaticUniverse {
    fn members_at(&self, _at: DateTime<Utc>) -> Vec<String> {
        self.assets.clone()
    }
}

/// One asset's membership window. A `None` end means open-ended.
#[derive(Debug, Clone)]
pub struct Membership {
    pub asset: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// A universe whose members come and go over time.
#[derive(Debug, Clone, Default)]
pub struct DynamicUniverse {
    memberships: Vec<Membership>,
}

impl DynamicUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(
        mut self,
        asset: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.add(asset, start, end);
        self
    }

    pub fn add(&mut self, asset: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) {
        self.memberships.push(Membership {
            asset: asset.to_string(),
            start,
            end,
        });
    }

    pub fn count(&self) -> usize {
        self.memberships.len()
    }
}

impl UniversePort for DynamicUniverse {
    fn members_at(&self, at: DateTime<Utc>) -> Vec<String> {
        self.memberships
            .iter()
            .filter(|m| m.start <= at && m.end.is_none_or(|end| at < end))
            .map(|m| m.asset.clone())
            .collect()
    }
}
