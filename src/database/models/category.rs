use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryParams {
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl CategoryParams {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
