//! Mapping of `sqlx` failures onto domain errors.

use storyloom_core::error::DomainError;
use tracing::error;

/// Converts a database error, surfacing unique violations as conflicts.
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::Conflict(db.message().to_owned());
        }
    }
    error!(error = %err, "database operation failed");
    DomainError::Infrastructure(err.to_string())
}

/// Parses an enum column stored as text.
pub(crate) fn decode_text<T>(column: &str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse().map_err(|err: DomainError| {
        DomainError::Infrastructure(format!("corrupt {column} column: {err}"))
    })
}
