//! Session store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the session.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored blob could not be encoded or decoded.
    #[error("invalid stored value for {key}: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
