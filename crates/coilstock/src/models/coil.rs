//! Request payloads for the coil endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use coilstock_core::coil::{CoilPatch, DeleteMode};

/// Body of `POST /api/coils`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RegisterCoil {
    pub weight: f64,
    pub length: f64,
}

/// Body of `PATCH /api/coils/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UpdateCoil {
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<UpdateCoil> for CoilPatch {
    fn from(update: UpdateCoil) -> Self {
        CoilPatch {
            weight: update.weight,
            length: update.length,
            deleted_at: update.deleted_at,
        }
    }
}

/// Query string of `DELETE /api/coils/{id}`. Defaults to a soft delete.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DeleteCoilQuery {
    #[serde(default)]
    pub mode: DeleteMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_coil_into_patch() {
        let update = UpdateCoil {
            weight: Some(80.0),
            ..Default::default()
        };
        let patch: CoilPatch = update.into();

        assert_eq!(patch.weight, Some(80.0));
        assert_eq!(patch.length, None);
        assert_eq!(patch.deleted_at, None);
    }

    #[test]
    fn test_delete_query_defaults_to_soft() {
        let query: DeleteCoilQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.mode, DeleteMode::Soft);

        let query: DeleteCoilQuery = serde_json::from_str(r#"{"mode":"hard"}"#).unwrap();
        assert_eq!(query.mode, DeleteMode::Hard);
    }
}
