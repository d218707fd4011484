//! SQLite repository implementation.
//!
//! Implements [`CoilRepository`] on top of `tokio_rusqlite`. Every
//! fetch-validate-write operation runs inside a single SQLite transaction so
//! concurrent calls on the same id cannot interleave between the validation
//! read and the commit.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use coilstock_core::coil::{
    validate_for_update, AggregateStats, Coil, CoilPatch, DailyTotals, NewCoil,
};
use coilstock_core::storage::{CoilFilter, CoilRepository, RepositoryError, Result, StatsFilter};

use super::conversions::{format_datetime, parse_date, row_to_coil};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based coil repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    /// Fetches a coil inside a transaction, tunneling `NotFound` out of the
    /// closure through the outer `Ok` arm.
    fn fetch_in_tx(
        tx: &rusqlite::Transaction<'_>,
        id: Uuid,
    ) -> std::result::Result<std::result::Result<Coil, RepositoryError>, tokio_rusqlite::Error>
    {
        match tx.query_row(schema::SELECT_COIL_BY_ID, [id.to_string()], row_to_coil) {
            Ok(coil) => Ok(Ok(coil)),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Ok(Err(RepositoryError::NotFound { id }))
            }
            Err(e) => Err(wrap_err(e)),
        }
    }
}

#[async_trait]
impl CoilRepository for SqliteRepository {
    async fn create(&self, new: NewCoil) -> Result<Coil> {
        let coil = Coil::new(new.weight, new.length);
        let stored = coil.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COIL,
                    rusqlite::params![
                        coil.id.to_string(),
                        coil.weight,
                        coil.length,
                        format_datetime(&coil.created_at),
                        coil.deleted_at.map(|dt| format_datetime(&dt)),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        Ok(stored)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Coil> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_COIL_BY_ID, [id.to_string()], row_to_coil)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn list(&self, filter: &CoilFilter) -> Result<Vec<Coil>> {
        let id = filter.id.map(|id| id.to_string());
        let (weight_gte, weight_lte) = (filter.weight_gte, filter.weight_lte);
        let (length_gte, length_lte) = (filter.length_gte, filter.length_lte);
        let created_at_gte = filter.created_at_gte.map(|t| format_datetime(&t));
        let created_at_lte = filter.created_at_lte.map(|t| format_datetime(&t));
        let deleted_at_gte = filter.deleted_at_gte.map(|t| format_datetime(&t));
        let deleted_at_lte = filter.deleted_at_lte.map(|t| format_datetime(&t));
        let active = filter.active as i64;

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_COILS_FILTERED)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![
                            id,
                            weight_gte,
                            weight_lte,
                            length_gte,
                            length_lte,
                            created_at_gte,
                            created_at_lte,
                            deleted_at_gte,
                            deleted_at_lte,
                            active,
                        ],
                        row_to_coil,
                    )
                    .map_err(wrap_err)?;

                let mut coils = Vec::new();
                for row_result in rows {
                    coils.push(row_result.map_err(wrap_err)?);
                }
                Ok(coils)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn list_active(&self) -> Result<Vec<Coil>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ACTIVE_COILS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_coil).map_err(wrap_err)?;

                let mut coils = Vec::new();
                for row_result in rows {
                    coils.push(row_result.map_err(wrap_err)?);
                }
                Ok(coils)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn update(&self, id: Uuid, patch: CoilPatch) -> Result<Coil> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let existing = match Self::fetch_in_tx(&tx, id)? {
                    Ok(coil) => coil,
                    Err(e) => return Ok(Err(e)),
                };
                if let Err(e) = validate_for_update(&existing, &patch) {
                    return Ok(Err(e.into()));
                }

                let updated = patch.apply_to(&existing);
                tx.execute(
                    schema::UPDATE_COIL,
                    rusqlite::params![
                        id.to_string(),
                        updated.weight,
                        updated.length,
                        updated.deleted_at.map(|dt| format_datetime(&dt)),
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Ok(updated))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))?
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Coil> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let existing = match Self::fetch_in_tx(&tx, id)? {
                    Ok(coil) => coil,
                    Err(e) => return Ok(Err(e)),
                };
                // Already soft-deleted coils are not addressable here.
                if !existing.is_active() {
                    return Ok(Err(RepositoryError::NotFound { id }));
                }

                let deleted = existing.soft_deleted_now();
                tx.execute(
                    schema::UPDATE_COIL,
                    rusqlite::params![
                        id.to_string(),
                        deleted.weight,
                        deleted.length,
                        deleted.deleted_at.map(|dt| format_datetime(&dt)),
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Ok(deleted))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))?
    }

    async fn hard_delete(&self, id: Uuid) -> Result<Coil> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let snapshot = match Self::fetch_in_tx(&tx, id)? {
                    Ok(coil) => coil,
                    Err(e) => return Ok(Err(e)),
                };

                tx.execute(schema::DELETE_COIL, [id.to_string()])
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Ok(snapshot))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))?
    }

    async fn stats(&self, filter: &StatsFilter) -> Result<AggregateStats> {
        let created_at_gte = filter.created_at_gte.map(|t| format_datetime(&t));
        let deleted_at_lte = filter.deleted_at_lte.map(|t| format_datetime(&t));

        self.conn
            .call(move |conn| {
                let mut stats = conn
                    .query_row(
                        schema::COIL_STATS,
                        rusqlite::params![created_at_gte, deleted_at_lte],
                        |row| {
                            Ok(AggregateStats {
                                count: row.get::<_, i64>(0)? as u64,
                                soft_deleted: row.get::<_, i64>(1)? as u64,
                                total_weight: row.get(2)?,
                                total_length: row.get(3)?,
                                avg_weight: row.get(4)?,
                                avg_length: row.get(5)?,
                                min_weight: row.get(6)?,
                                max_weight: row.get(7)?,
                                min_length: row.get(8)?,
                                max_length: row.get(9)?,
                                max_duration_seconds: row.get(10)?,
                                min_duration_seconds: row.get(11)?,
                                ..Default::default()
                            })
                        },
                    )
                    .map_err(wrap_err)?;

                let mut stmt = conn
                    .prepare(schema::COIL_DAILY_TOTALS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![created_at_gte, deleted_at_lte],
                        |row| {
                            Ok(DailyTotals {
                                day: parse_date(&row.get::<_, String>(0)?)?,
                                count: row.get::<_, i64>(1)? as u64,
                                weight: row.get(2)?,
                            })
                        },
                    )
                    .map_err(wrap_err)?;

                let mut days = Vec::new();
                for row_result in rows {
                    days.push(row_result.map_err(wrap_err)?);
                }
                stats.set_day_extremes(&days);

                Ok(stats)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}
