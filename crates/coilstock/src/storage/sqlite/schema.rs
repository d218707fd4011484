//! SQLite schema definitions and SQL query constants.
//!
//! Timestamps are stored as fixed-width RFC 3339 text (microsecond
//! precision, `Z` suffix), so string comparison in the CHECK constraint and
//! the range filters matches chronological order. The CHECK constraints
//! mirror the invariants the core layer enforces first; they are a
//! second line of defense, not the primary one.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Coils table
CREATE TABLE IF NOT EXISTS coils (
    id TEXT PRIMARY KEY,
    weight REAL NOT NULL CHECK (weight > 0),
    length REAL NOT NULL CHECK (length > 0),
    created_at TEXT NOT NULL,
    deleted_at TEXT CHECK (deleted_at IS NULL OR deleted_at > created_at)
);

-- Indexes for listing and stats windows
CREATE INDEX IF NOT EXISTS idx_coils_created_at ON coils(created_at);
CREATE INDEX IF NOT EXISTS idx_coils_deleted_at ON coils(deleted_at);
"#;

pub const INSERT_COIL: &str = r#"
INSERT INTO coils (id, weight, length, created_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_COIL_BY_ID: &str = r#"
SELECT id, weight, length, created_at, deleted_at
FROM coils
WHERE id = ?1
"#;

pub const SELECT_ACTIVE_COILS: &str = r#"
SELECT id, weight, length, created_at, deleted_at
FROM coils
WHERE deleted_at IS NULL
"#;

/// Filtered listing. Every bound is optional; a NULL parameter disables
/// its clause. `?10` toggles the active-only restriction.
pub const SELECT_COILS_FILTERED: &str = r#"
SELECT id, weight, length, created_at, deleted_at
FROM coils
WHERE (?1 IS NULL OR id = ?1)
  AND (?2 IS NULL OR weight >= ?2)
  AND (?3 IS NULL OR weight <= ?3)
  AND (?4 IS NULL OR length >= ?4)
  AND (?5 IS NULL OR length <= ?5)
  AND (?6 IS NULL OR created_at >= ?6)
  AND (?7 IS NULL OR created_at <= ?7)
  AND (?8 IS NULL OR deleted_at >= ?8)
  AND (?9 IS NULL OR deleted_at <= ?9)
  AND (?10 = 0 OR deleted_at IS NULL)
"#;

pub const UPDATE_COIL: &str = r#"
UPDATE coils
SET weight = ?2, length = ?3, deleted_at = ?4
WHERE id = ?1
"#;

pub const DELETE_COIL: &str = r#"
DELETE FROM coils
WHERE id = ?1
"#;

/// Aggregates over an optional time window. COALESCE turns the NULLs an
/// empty selection produces into the zero-valued aggregates callers expect;
/// the duration columns stay NULL when no coil in the window was
/// soft-deleted.
pub const COIL_STATS: &str = r#"
SELECT
    COUNT(*),
    COALESCE(SUM(deleted_at IS NOT NULL), 0),
    COALESCE(SUM(weight), 0.0),
    COALESCE(SUM(length), 0.0),
    COALESCE(AVG(weight), 0.0),
    COALESCE(AVG(length), 0.0),
    COALESCE(MIN(weight), 0.0),
    COALESCE(MAX(weight), 0.0),
    COALESCE(MIN(length), 0.0),
    COALESCE(MAX(length), 0.0),
    MAX((julianday(deleted_at) - julianday(created_at)) * 86400.0),
    MIN((julianday(deleted_at) - julianday(created_at)) * 86400.0)
FROM coils
WHERE (?1 IS NULL OR created_at >= ?1)
  AND (?2 IS NULL OR deleted_at <= ?2)
"#;

/// Registration totals grouped by creation day. The busiest/quietest day
/// extremes and their tie-breaking live in `AggregateStats::set_day_extremes`.
pub const COIL_DAILY_TOTALS: &str = r#"
SELECT date(created_at), COUNT(*), SUM(weight)
FROM coils
WHERE (?1 IS NULL OR created_at >= ?1)
  AND (?2 IS NULL OR deleted_at <= ?2)
GROUP BY date(created_at)
ORDER BY date(created_at)
"#;
