use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::base64_bytes;

/// Encrypted blob owned by a user. `content` is only loaded when a single
/// store is requested.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Store {
    pub id: i64,
    pub created: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[sqlx(rename = "container_id")]
    pub container: i64,
    #[sqlx(rename = "category_id")]
    pub category: i64,
    pub name: String,
    pub icon: String,
    pub color: i32,
    #[serde(
        serialize_with = "base64_bytes::serialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[sqlx(default)]
    pub content: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreParams {
    pub container: i64,
    pub category: i64,
    pub name: String,
    pub icon: String,
    pub color: i32,
    #[serde(deserialize_with = "base64_bytes::deserialize")]
    pub content: Vec<u8>,
}

impl StoreParams {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
