//! The remote database seam.

use async_trait::async_trait;

use crate::error::{Result, SupabaseError};
use crate::types::{EmergencyRow, OrderRow, ReviewRow, UserRow};

/// Remote persistence for users, orders, emergency requests and reviews.
///
/// Callers treat every method as best effort: an error is logged and the
/// user flow continues.
#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    /// Whether writes will actually be attempted.
    fn is_configured(&self) -> bool {
        true
    }

    /// Create or update a user, merging on phone number.
    async fn upsert_user(&self, user: &UserRow) -> Result<()>;

    /// Insert an order. Returns the new order id.
    async fn insert_order(&self, order: &OrderRow) -> Result<String>;

    /// Insert an emergency request. Returns the new request id.
    async fn insert_emergency_request(&self, request: &EmergencyRow) -> Result<String>;

    /// Flag an emergency request as having its location shared.
    async fn mark_location_sent(&self, request_id: &str) -> Result<()>;

    async fn insert_review(&self, review: &ReviewRow) -> Result<()>;

    /// Look up a user. `Ok(None)` when no row matches.
    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<UserRow>>;
}

/// Stand-in used when no Supabase project is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredDatabase;

#[async_trait]
impl RemoteDatabase for UnconfiguredDatabase {
    fn is_configured(&self) -> bool {
        false
    }

    async fn upsert_user(&self, _user: &UserRow) -> Result<()> {
        Err(SupabaseError::NotConfigured)
    }

    async fn insert_order(&self, _order: &OrderRow) -> Result<String> {
        Err(SupabaseError::NotConfigured)
    }

    async fn insert_emergency_request(&self, _request: &EmergencyRow) -> Result<String> {
        Err(SupabaseError::NotConfigured)
    }

    async fn mark_location_sent(&self, _request_id: &str) -> Result<()> {
        Err(SupabaseError::NotConfigured)
    }

    async fn insert_review(&self, _review: &ReviewRow) -> Result<()> {
        Err(SupabaseError::NotConfigured)
    }

    async fn get_user_by_phone(&self, _phone: &str) -> Result<Option<UserRow>> {
        Err(SupabaseError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_rejects_everything() {
        let db: &dyn RemoteDatabase = &UnconfiguredDatabase;
        assert!(!db.is_configured());

        let err = db.upsert_user(&UserRow::verified("91234567")).await.unwrap_err();
        assert!(matches!(err, SupabaseError::NotConfigured));
        assert_eq!(err.to_string(), "Database not configured");

        assert!(matches!(
            db.mark_location_sent("42").await,
            Err(SupabaseError::NotConfigured)
        ));
        assert!(matches!(
            db.get_user_by_phone("91234567").await,
            Err(SupabaseError::NotConfigured)
        ));
    }
}
