use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked inventory unit: a roll of material with weight and length.
///
/// A coil is "active" while `deleted_at` is unset. Soft deletion stamps
/// `deleted_at` without removing the record; hard deletion removes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coil {
    pub id: Uuid,
    /// Weight in kilograms, always > 0.
    pub weight: f64,
    /// Length in meters, always > 0.
    pub length: f64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Coil {
    /// Creates a new active coil with a fresh id and `created_at = now`.
    ///
    /// Measurements are NOT validated here; callers go through
    /// [`validate_for_create`](super::validate_for_create) first.
    pub fn new(weight: f64, length: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight,
            length,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Sets a specific ID for this coil (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Returns true if the coil has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Returns a copy with `deleted_at` stamped to the current time.
    ///
    /// `deleted_at` must stay strictly greater than `created_at`, so if the
    /// clock has not advanced past `created_at` within timestamp precision
    /// the stamp is nudged one microsecond forward.
    pub fn soft_deleted_now(&self) -> Self {
        let now = Utc::now();
        let stamp = if now > self.created_at {
            now
        } else {
            self.created_at + chrono::Duration::microseconds(1)
        };

        Self {
            deleted_at: Some(stamp),
            ..self.clone()
        }
    }
}

/// Measurements for a coil that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewCoil {
    pub weight: f64,
    pub length: f64,
}

/// A partial update to a coil's mutable fields.
///
/// `None` means "leave unchanged". `deleted_at` can only ever be set, never
/// cleared, so a deleted coil cannot transition back to active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoilPatch {
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CoilPatch {
    /// Returns a copy of `coil` with this patch applied.
    pub fn apply_to(&self, coil: &Coil) -> Coil {
        Coil {
            id: coil.id,
            weight: self.weight.unwrap_or(coil.weight),
            length: self.length.unwrap_or(coil.length),
            created_at: coil.created_at,
            deleted_at: self.deleted_at.or(coil.deleted_at),
        }
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.length.is_none() && self.deleted_at.is_none()
    }
}

/// How a delete request should be carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Stamp `deleted_at`, keep the record.
    #[default]
    Soft,
    /// Remove the record permanently.
    Hard,
}

/// Registration totals for a single calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotals {
    pub day: NaiveDate,
    /// Coils created on `day`.
    pub count: u64,
    /// Combined weight of the coils created on `day`.
    pub weight: f64,
}

/// Summary statistics over a set of coils.
///
/// The numeric fields are zero over an empty set; an empty selection is not
/// an error. The optional fields are `None` when the selection holds no
/// soft-deleted coil (durations) or no coil at all (day extremes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of coils in the selection.
    pub count: u64,
    /// Number of those coils that have been soft-deleted.
    pub soft_deleted: u64,
    pub total_weight: f64,
    pub total_length: f64,
    pub avg_weight: f64,
    pub avg_length: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub min_length: f64,
    pub max_length: f64,
    /// Longest observed lifetime (creation to soft deletion) in seconds.
    pub max_duration_seconds: Option<f64>,
    /// Shortest observed lifetime in seconds.
    pub min_duration_seconds: Option<f64>,
    /// Day on which the most coils were registered.
    pub max_count_day: Option<NaiveDate>,
    /// Day on which the fewest coils were registered.
    pub min_count_day: Option<NaiveDate>,
    /// Day whose registered coils weigh the most in total.
    pub max_weight_day: Option<NaiveDate>,
    /// Day whose registered coils weigh the least in total.
    pub min_weight_day: Option<NaiveDate>,
}

impl AggregateStats {
    /// Folds a set of coils into aggregate statistics.
    ///
    /// This is the reference implementation of the aggregate; the SQLite
    /// backend computes the same numbers in SQL.
    pub fn from_coils<'a, I>(coils: I) -> Self
    where
        I: IntoIterator<Item = &'a Coil>,
    {
        let mut stats = Self::default();
        let mut per_day: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();

        for coil in coils {
            if stats.count == 0 {
                stats.min_weight = coil.weight;
                stats.max_weight = coil.weight;
                stats.min_length = coil.length;
                stats.max_length = coil.length;
            } else {
                stats.min_weight = stats.min_weight.min(coil.weight);
                stats.max_weight = stats.max_weight.max(coil.weight);
                stats.min_length = stats.min_length.min(coil.length);
                stats.max_length = stats.max_length.max(coil.length);
            }

            stats.count += 1;
            if let Some(deleted_at) = coil.deleted_at {
                stats.soft_deleted += 1;

                let secs = (deleted_at - coil.created_at).num_milliseconds() as f64 / 1000.0;
                stats.max_duration_seconds =
                    Some(stats.max_duration_seconds.map_or(secs, |max| max.max(secs)));
                stats.min_duration_seconds =
                    Some(stats.min_duration_seconds.map_or(secs, |min| min.min(secs)));
            }
            stats.total_weight += coil.weight;
            stats.total_length += coil.length;

            let day = coil.created_at.date_naive();
            let totals = per_day.entry(day).or_insert(DailyTotals {
                day,
                count: 0,
                weight: 0.0,
            });
            totals.count += 1;
            totals.weight += coil.weight;
        }

        if stats.count > 0 {
            stats.avg_weight = stats.total_weight / stats.count as f64;
            stats.avg_length = stats.total_length / stats.count as f64;
        }

        let days: Vec<DailyTotals> = per_day.into_values().collect();
        stats.set_day_extremes(&days);

        stats
    }

    /// Fills the busiest/quietest day fields from per-day totals.
    ///
    /// Ties go to the earlier day for the maxima and to the later day for
    /// the minima.
    pub fn set_day_extremes(&mut self, days: &[DailyTotals]) {
        let mut by_count: Vec<&DailyTotals> = days.iter().collect();
        by_count.sort_by(|a, b| b.count.cmp(&a.count).then(a.day.cmp(&b.day)));
        self.max_count_day = by_count.first().map(|d| d.day);
        self.min_count_day = by_count.last().map(|d| d.day);

        let mut by_weight: Vec<&DailyTotals> = days.iter().collect();
        by_weight.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.day.cmp(&b.day))
        });
        self.max_weight_day = by_weight.first().map(|d| d.day);
        self.min_weight_day = by_weight.last().map(|d| d.day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coil(weight: f64, length: f64) -> Coil {
        Coil::new(weight, length)
    }

    #[test]
    fn test_new_coil_is_active() {
        let coil = Coil::new(100.0, 50.0);

        assert!(coil.is_active());
        assert_eq!(coil.weight, 100.0);
        assert_eq!(coil.length, 50.0);
        assert!(coil.deleted_at.is_none());
    }

    #[test]
    fn test_soft_deleted_now_is_strictly_after_created_at() {
        let coil = Coil::new(100.0, 50.0);
        let deleted = coil.soft_deleted_now();

        assert!(deleted.deleted_at.unwrap() > deleted.created_at);
        assert_eq!(deleted.id, coil.id);
        assert!(!deleted.is_active());

        // Even when the clock reads at or before created_at.
        let future = Coil {
            created_at: Utc::now() + Duration::hours(1),
            ..coil
        };
        let deleted = future.soft_deleted_now();
        assert!(deleted.deleted_at.unwrap() > deleted.created_at);
    }

    #[test]
    fn test_patch_apply_changes_only_supplied_fields() {
        let original = coil(100.0, 50.0);
        let patch = CoilPatch {
            weight: Some(80.0),
            ..Default::default()
        };

        let updated = patch.apply_to(&original);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.weight, 80.0);
        assert_eq!(updated.length, 50.0);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.deleted_at.is_none());
    }

    #[test]
    fn test_patch_cannot_clear_deleted_at() {
        let mut original = coil(100.0, 50.0);
        original.deleted_at = Some(original.created_at + Duration::hours(1));

        let updated = CoilPatch::default().apply_to(&original);

        assert_eq!(updated.deleted_at, original.deleted_at);
    }

    #[test]
    fn test_empty_patch() {
        assert!(CoilPatch::default().is_empty());
        assert!(!CoilPatch {
            length: Some(1.0),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_stats_over_empty_set_is_all_zero() {
        let coils: Vec<Coil> = Vec::new();
        let stats = AggregateStats::from_coils(&coils);

        assert_eq!(stats, AggregateStats::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total_weight, 0.0);
        assert_eq!(stats.min_weight, 0.0);
        assert_eq!(stats.max_weight, 0.0);
        assert!(stats.max_duration_seconds.is_none());
        assert!(stats.max_count_day.is_none());
        assert!(stats.min_weight_day.is_none());
    }

    #[test]
    fn test_stats_fold() {
        let mut deleted = coil(10.0, 5.0);
        deleted.deleted_at = Some(deleted.created_at + Duration::hours(2));
        let coils = vec![coil(100.0, 50.0), coil(40.0, 80.0), deleted];

        let stats = AggregateStats::from_coils(&coils);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.soft_deleted, 1);
        assert_eq!(stats.total_weight, 150.0);
        assert_eq!(stats.total_length, 135.0);
        assert_eq!(stats.avg_weight, 50.0);
        assert_eq!(stats.avg_length, 45.0);
        assert_eq!(stats.min_weight, 10.0);
        assert_eq!(stats.max_weight, 100.0);
        assert_eq!(stats.min_length, 5.0);
        assert_eq!(stats.max_length, 80.0);
        // Only the soft-deleted coil contributes a lifetime.
        assert_eq!(stats.max_duration_seconds, Some(7200.0));
        assert_eq!(stats.min_duration_seconds, Some(7200.0));
    }

    #[test]
    fn test_stats_duration_bounds() {
        let mut short = coil(10.0, 5.0);
        short.deleted_at = Some(short.created_at + Duration::hours(1));
        let mut long = coil(20.0, 5.0);
        long.deleted_at = Some(long.created_at + Duration::days(3));

        let stats = AggregateStats::from_coils([&short, &long, &coil(30.0, 5.0)]);

        assert_eq!(stats.min_duration_seconds, Some(3600.0));
        assert_eq!(stats.max_duration_seconds, Some(3.0 * 86400.0));
    }

    #[test]
    fn test_stats_day_extremes() {
        let coil_on = |day: &str, weight: f64| Coil {
            created_at: day.parse().unwrap(),
            ..Coil::new(weight, 1.0)
        };
        let day = |s: &str| s.parse::<NaiveDate>().unwrap();

        let coils = vec![
            coil_on("2024-01-01T08:00:00Z", 10.0),
            coil_on("2024-01-01T14:00:00Z", 20.0),
            coil_on("2024-01-02T09:00:00Z", 100.0),
            coil_on("2024-01-03T09:00:00Z", 5.0),
        ];

        let stats = AggregateStats::from_coils(&coils);

        assert_eq!(stats.max_count_day, Some(day("2024-01-01")));
        // Jan 2 and Jan 3 tie on count; the minimum reports the later day.
        assert_eq!(stats.min_count_day, Some(day("2024-01-03")));
        assert_eq!(stats.max_weight_day, Some(day("2024-01-02")));
        assert_eq!(stats.min_weight_day, Some(day("2024-01-03")));
    }

    #[test]
    fn test_delete_mode_serde() {
        assert_eq!(
            serde_json::from_str::<DeleteMode>(r#""soft""#).unwrap(),
            DeleteMode::Soft
        );
        assert_eq!(
            serde_json::from_str::<DeleteMode>(r#""hard""#).unwrap(),
            DeleteMode::Hard
        );
        assert_eq!(DeleteMode::default(), DeleteMode::Soft);
    }
}
