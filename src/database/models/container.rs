use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::base64_bytes;

/// Encryption envelope / certificate pair. Currently a single container per user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Container {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "base64_bytes::serialize")]
    #[sqlx(rename = "public")]
    pub certificate: Vec<u8>,
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub encrypted: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerParams {
    #[serde(deserialize_with = "base64_bytes::deserialize")]
    pub encrypted: Vec<u8>,
    #[serde(deserialize_with = "base64_bytes::deserialize")]
    pub certificate: Vec<u8>,
}
