//! Universe provider port trait.

use chrono::{DateTime, Utc};

/// Provider of the set of eligible assets at a given time.
///
/// The returned order is meaningful: it is the tie-break order used by
/// ranking and selection downstream.
pub trait UniversePort {
    fn members_at(&self, at: DateTime<Utc>) -> Vec<String>;
}
