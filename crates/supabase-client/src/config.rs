//! Configuration for the Supabase client.

use std::env;
use std::time::Duration;

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://xyz.supabase.co").
    pub url: String,
    /// Public anon key, sent as both `apikey` and bearer token.
    pub anon_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Load from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let url = env::var("SUPABASE_URL").ok().filter(|v| !v.trim().is_empty())?;
        let key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        Some(Self::new(url.trim(), key.trim()))
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// REST endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }
}
