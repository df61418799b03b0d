//! Persisted session state for EB Rescue.
//!
//! The session survives restarts as three key/value blobs in SQLite:
//! the verified phone number, the user profile and the repair history.
//!
//! # Example
//!
//! ```no_run
//! use session_store::{SessionStore, SqliteSessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteSessionStore::open("sqlite:eb_rescue.db?mode=rwc").await?;
//!
//!     store.set_phone("91234567").await?;
//!     assert_eq!(store.phone().await?.as_deref(), Some("91234567"));
//!
//!     Ok(())
//! }
//! ```

pub mod entry;
pub mod error;
pub mod models;
mod store;

pub use error::{Result, StoreError};
pub use models::SessionEntry;
pub use store::{
    MemorySessionStore, SessionStore, SqliteSessionStore, HISTORY_KEY, PHONE_KEY, PROFILE_KEY,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size. The router issues one write at a time.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`;
    /// `sqlite::memory:` gives a throwaway database.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to session database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running session store migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
