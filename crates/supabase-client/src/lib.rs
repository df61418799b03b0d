//! Remote persistence for EB Rescue via Supabase's REST API.
//!
//! Writes are best effort from the app's point of view. When no project is
//! configured, [`UnconfiguredDatabase`] answers every call with
//! [`SupabaseError::NotConfigured`] so the caller can log and move on.
//!
//! # Example
//!
//! ```no_run
//! use supabase_client::{connect_from_env, UserRow};
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = connect_from_env();
//!     if let Err(e) = db.upsert_user(&UserRow::verified("91234567")).await {
//!         eprintln!("skipped: {}", e);
//!     }
//! }
//! ```

mod client;
mod config;
mod database;
mod error;
mod types;

use std::sync::Arc;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use database::{RemoteDatabase, UnconfiguredDatabase};
pub use error::{Result, SupabaseError};
pub use types::{EmergencyRow, OrderRow, ReviewRow, UserRow};

/// Build the remote database from the environment.
///
/// Falls back to [`UnconfiguredDatabase`] when the project URL or key is
/// missing or the HTTP client cannot be built.
pub fn connect_from_env() -> Arc<dyn RemoteDatabase> {
    let Some(config) = SupabaseConfig::from_env() else {
        tracing::warn!("Supabase not configured, remote writes will be skipped");
        return Arc::new(UnconfiguredDatabase);
    };

    match SupabaseClient::new(config) {
        Ok(client) => {
            tracing::info!("Supabase client ready: {}", client.config().url);
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!("Failed to build Supabase client: {}", e);
            Arc::new(UnconfiguredDatabase)
        }
    }
}
