use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, CategoryParams, Container, ContainerParams, NewUser, Store, StoreParams, User};

/// Number of stores returned by the "recently used" listing
pub const RECENT_STORES_LIMIT: i64 = 16;

/// Account persistence consumed by the session store and the auth handlers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Insert a new account and return its id. An email already in use is
    /// `DatabaseError::Conflict`.
    async fn save(&self, user: NewUser) -> Result<i64, DatabaseError>;

    /// Persist email, password digest and display preferences of an existing account.
    /// Taking another account's email is `DatabaseError::Conflict`.
    async fn update(&self, user: &User) -> Result<(), DatabaseError>;
}

/// Which stores a listing should return. Every variant is scoped to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFilter {
    All,
    Category(i64),
    Uncategorized,
    Recent,
}

/// Container, category and store persistence keyed by user id.
#[async_trait]
pub trait VaultRepository: Send + Sync {
    async fn find_container(&self, user_id: i64) -> Result<Option<Container>, DatabaseError>;

    /// A user holds at most one container; a second one is `DatabaseError::Conflict`.
    async fn save_container(
        &self,
        user_id: i64,
        name: &str,
        params: &ContainerParams,
    ) -> Result<Container, DatabaseError>;

    async fn categories(&self, user_id: i64) -> Result<Vec<Category>, DatabaseError>;

    async fn save_category(&self, user_id: i64, params: &CategoryParams) -> Result<Category, DatabaseError>;

    /// Store summaries without content
    async fn stores(&self, user_id: i64, filter: StoreFilter) -> Result<Vec<Store>, DatabaseError>;

    /// Single store with content; marks it as used.
    async fn store_content(&self, user_id: i64, store_id: i64) -> Result<Option<Store>, DatabaseError>;

    async fn save_store(&self, user_id: i64, params: &StoreParams) -> Result<Store, DatabaseError>;
}
