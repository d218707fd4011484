//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to the core
//! `RepositoryError` taxonomy without leaking SQLite specifics past the
//! storage abstraction. CHECK constraint violations surface as
//! `InvalidValue` since the schema constraints mirror the domain invariants.

use uuid::Uuid;

use coilstock_core::storage::RepositoryError;

/// Maps a rusqlite error to a RepositoryError.
///
/// - `SQLITE_CONSTRAINT_CHECK` → `InvalidValue`
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` → `QueryFailed` (ids are generated v4s;
///   a collision is a storage fault, not caller error)
/// - `CannotOpen` → `ConnectionFailed`
/// - `QueryReturnedNoRows` → `NotFound` when an id is known
/// - everything else → `QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, id: Option<Uuid>) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, msg)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK =>
        {
            RepositoryError::InvalidValue(
                msg.clone()
                    .unwrap_or_else(|| "CHECK constraint failed".to_string()),
            )
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => match id {
            Some(id) => RepositoryError::NotFound { id },
            None => RepositoryError::QueryFailed(err.to_string()),
        },

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error from an operation without a subject id.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> RepositoryError {
    map_with_id(err, None)
}

/// Maps a tokio_rusqlite error from an operation on a known coil id.
pub fn map_tokio_rusqlite_error_with_id(err: tokio_rusqlite::Error, id: Uuid) -> RepositoryError {
    map_with_id(err, Some(id))
}

fn map_with_id(err: tokio_rusqlite::Error, id: Option<Uuid>) -> RepositoryError {
    match err {
        tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed".to_string())
        }
        tokio_rusqlite::Error::Rusqlite(e) => map_rusqlite_error(&e, id),
        tokio_rusqlite::Error::Close((_, e)) => map_rusqlite_error(&e, id),
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
