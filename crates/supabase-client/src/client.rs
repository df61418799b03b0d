//! Supabase REST (PostgREST) client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SupabaseConfig;
use crate::database::RemoteDatabase;
use crate::error::{Result, SupabaseError};
use crate::types::{EmergencyRow, OrderRow, ReviewRow, UserRow};

const USERS: &str = "users";
const ORDERS: &str = "orders";
const EMERGENCY_REQUESTS: &str = "emergency_requests";
const REVIEWS: &str = "reviews";

/// Client for a Supabase project's REST API.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        if config.url.is_empty() || config.anon_key.is_empty() {
            return Err(SupabaseError::NotConfigured);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SupabaseError::Http)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
            .header("Content-Type", "application/json")
    }

    /// Insert one row and return its `id`.
    async fn insert_returning_id<T: Serialize>(
        &self,
        table: &'static str,
        row: &T,
    ) -> Result<String> {
        let url = format!("{}?select=id", self.config.table_url(table));
        let body = stamped(row, true)?;
        debug!("Inserting into {}", table);

        let response = self
            .authorized(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let rows: Vec<Value> = check(response).await?.json().await?;
        let id = rows
            .first()
            .and_then(|row| row.get("id"))
            .and_then(id_to_string)
            .ok_or(SupabaseError::MissingId { table })?;

        info!("Inserted {} row {}", table, id);
        Ok(id)
    }
}

#[async_trait]
impl RemoteDatabase for SupabaseClient {
    async fn upsert_user(&self, user: &UserRow) -> Result<()> {
        let url = format!("{}?on_conflict=phone_number", self.config.table_url(USERS));
        let body = stamped(user, false)?;

        let response = self
            .authorized(self.http.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&body)
            .send()
            .await?;
        check(response).await?;

        info!("User saved: {}", user.phone_number);
        Ok(())
    }

    async fn insert_order(&self, order: &OrderRow) -> Result<String> {
        self.insert_returning_id(ORDERS, order).await
    }

    async fn insert_emergency_request(&self, request: &EmergencyRow) -> Result<String> {
        self.insert_returning_id(EMERGENCY_REQUESTS, request).await
    }

    async fn mark_location_sent(&self, request_id: &str) -> Result<()> {
        let url = format!(
            "{}?id=eq.{}",
            self.config.table_url(EMERGENCY_REQUESTS),
            urlencoding::encode(request_id)
        );
        let body = serde_json::json!({
            "location_sent": true,
            "updated_at": now(),
        });

        let response = self
            .authorized(self.http.patch(&url))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        check(response).await?;

        info!("Emergency request {} marked location sent", request_id);
        Ok(())
    }

    async fn insert_review(&self, review: &ReviewRow) -> Result<()> {
        let url = self.config.table_url(REVIEWS);
        let mut body = serde_json::to_value(review)?;
        if let Value::Object(map) = &mut body {
            map.insert("created_at".to_string(), Value::String(now()));
        }

        let response = self
            .authorized(self.http.post(&url))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        check(response).await?;

        info!("Review saved ({} stars)", review.rating);
        Ok(())
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<UserRow>> {
        let url = format!(
            "{}?phone_number=eq.{}&select=*&limit=1",
            self.config.table_url(USERS),
            urlencoding::encode(phone)
        );

        let response = self.authorized(self.http.get(&url)).send().await?;
        let mut rows: Vec<UserRow> = check(response).await?.json().await?;

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}

/// Turn a non-success response into [`SupabaseError::Api`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    Err(SupabaseError::Api {
        status: status.as_u16(),
        message,
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Serialize a row and add `updated_at` (and `created_at` for inserts).
fn stamped<T: Serialize>(row: &T, created: bool) -> Result<Value> {
    let mut value = serde_json::to_value(row)?;
    if let Value::Object(map) = &mut value {
        let now = now();
        if created {
            map.insert("created_at".to_string(), Value::String(now.clone()));
        }
        map.insert("updated_at".to_string(), Value::String(now));
    }
    Ok(value)
}

/// Ids may be bigint or uuid columns.
fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
