//! Storage-specific error type wrapping sqlx errors.

use clinicflow_domain::error::ClinicFlowError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to (de)serialize a stored JSON payload.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for ClinicFlowError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Turn a column decoding failure into a sqlx decode error.
pub(crate) fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Clamp a `usize` count to a value `SQLite` accepts as a bound integer.
pub(crate) fn to_sql_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert an affected-row count back to `usize`.
pub(crate) fn to_count(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
