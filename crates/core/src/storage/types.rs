use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::coil::Coil;

/// Range filters for listing coils. All bounds are inclusive and optional;
/// an empty filter matches every coil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CoilFilter {
    pub id: Option<Uuid>,
    pub weight_gte: Option<f64>,
    pub weight_lte: Option<f64>,
    pub length_gte: Option<f64>,
    pub length_lte: Option<f64>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    pub deleted_at_gte: Option<DateTime<Utc>>,
    pub deleted_at_lte: Option<DateTime<Utc>>,
    /// When true, only coils with `deleted_at` unset match.
    #[serde(default)]
    pub active: bool,
}

impl CoilFilter {
    /// A filter matching only active (not soft-deleted) coils.
    pub fn active_only() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    /// Returns true if `coil` satisfies every supplied bound.
    ///
    /// A `deleted_at` bound never matches a coil that is still active,
    /// mirroring SQL comparison semantics against NULL.
    pub fn matches(&self, coil: &Coil) -> bool {
        if self.active && coil.deleted_at.is_some() {
            return false;
        }
        if self.id.is_some_and(|id| coil.id != id) {
            return false;
        }
        if self.weight_gte.is_some_and(|w| coil.weight < w)
            || self.weight_lte.is_some_and(|w| coil.weight > w)
        {
            return false;
        }
        if self.length_gte.is_some_and(|l| coil.length < l)
            || self.length_lte.is_some_and(|l| coil.length > l)
        {
            return false;
        }
        if self.created_at_gte.is_some_and(|t| coil.created_at < t)
            || self.created_at_lte.is_some_and(|t| coil.created_at > t)
        {
            return false;
        }
        if let Some(gte) = self.deleted_at_gte {
            match coil.deleted_at {
                Some(deleted_at) if deleted_at >= gte => {}
                _ => return false,
            }
        }
        if let Some(lte) = self.deleted_at_lte {
            match coil.deleted_at {
                Some(deleted_at) if deleted_at <= lte => {}
                _ => return false,
            }
        }
        true
    }
}

/// Time window for aggregate statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct StatsFilter {
    /// Include coils created at or after this timestamp.
    pub created_at_gte: Option<DateTime<Utc>>,
    /// Include coils soft-deleted at or before this timestamp.
    pub deleted_at_lte: Option<DateTime<Utc>>,
}

impl StatsFilter {
    /// Returns true if `coil` falls inside the window.
    pub fn matches(&self, coil: &Coil) -> bool {
        if self.created_at_gte.is_some_and(|t| coil.created_at < t) {
            return false;
        }
        if let Some(lte) = self.deleted_at_lte {
            match coil.deleted_at {
                Some(deleted_at) if deleted_at <= lte => {}
                _ => return false,
            }
        }
        true
    }
}
