//! Error types for supabase-client.

use thiserror::Error;

/// Errors returned by the remote database.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// URL or key missing; nothing was sent.
    #[error("Database not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the REST API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// An insert succeeded but no id came back.
    #[error("No id returned from {table}")]
    MissingId { table: &'static str },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for remote database operations.
pub type Result<T> = std::result::Result<T, SupabaseError>;
