//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use coilstock_core::coil::Coil;

/// Convert a SQLite row to a Coil.
///
/// Expected columns: id, weight, length, created_at, deleted_at
pub fn row_to_coil(row: &Row) -> rusqlite::Result<Coil> {
    let id: String = row.get(0)?;
    let weight: f64 = row.get(1)?;
    let length: f64 = row.get(2)?;
    let created_at: String = row.get(3)?;
    let deleted_at: Option<String> = row.get(4)?;

    Ok(Coil {
        id: parse_uuid(&id)?,
        weight,
        length,
        created_at: parse_datetime(&created_at)?,
        deleted_at: deleted_at.as_deref().map(parse_datetime).transpose()?,
    })
}

/// Parse a UUID from its canonical string form.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 text.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a calendar day as produced by SQLite's `date()` function.
pub fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    s.parse::<NaiveDate>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Format a datetime for SQLite storage.
///
/// Fixed-width microsecond precision with a `Z` suffix, so stored values
/// compare lexicographically in chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
