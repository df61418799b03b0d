//! Row types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SessionEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
