use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{Database, DatabaseError};
use crate::database::models::{Category, CategoryParams, Container, ContainerParams, NewUser, Store, StoreParams, User};
use crate::database::repository::{StoreFilter, UserRepository, VaultRepository, RECENT_STORES_LIMIT};

const USER_COLUMNS: &str = "id, username, email, password, avatar, show_last_used, dark_mode";
const STORE_COLUMNS: &str = "id, container_id, category_id, created, last_used, modified, name, icon, color";

/// sqlx-backed implementation of both repositories
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn save(&self, user: NewUser) -> Result<i64, DatabaseError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password, show_last_used, dark_mode)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.last_used)
        .bind(user.dark_mode)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET email = $1, password = $2, show_last_used = $3, dark_mode = $4
             WHERE id = $5",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.last_used)
        .bind(user.dark_mode)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(())
    }
}

#[async_trait]
impl VaultRepository for PostgresRepository {
    async fn find_container(&self, user_id: i64) -> Result<Option<Container>, DatabaseError> {
        let container = sqlx::query_as::<_, Container>(
            "SELECT id, name, public, encrypted FROM containers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(container)
    }

    async fn save_container(
        &self,
        user_id: i64,
        name: &str,
        params: &ContainerParams,
    ) -> Result<Container, DatabaseError> {
        let container = sqlx::query_as::<_, Container>(
            "INSERT INTO containers (user_id, name, public, encrypted) VALUES ($1, $2, $3, $4)
             RETURNING id, name, public, encrypted",
        )
        .bind(user_id)
        .bind(name)
        .bind(&params.certificate)
        .bind(&params.encrypted)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(container)
    }

    async fn categories(&self, user_id: i64) -> Result<Vec<Category>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, title, description, icon FROM categories WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn save_category(&self, user_id: i64, params: &CategoryParams) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (user_id, title, description, icon) VALUES ($1, $2, $3, $4)
             RETURNING id, title, description, icon",
        )
        .bind(user_id)
        .bind(&params.title)
        .bind(&params.description)
        .bind(&params.icon)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn stores(&self, user_id: i64, filter: StoreFilter) -> Result<Vec<Store>, DatabaseError> {
        let stores = match filter {
            StoreFilter::All => {
                let sql = format!("SELECT {} FROM stores WHERE user_id = $1 ORDER BY id", STORE_COLUMNS);
                sqlx::query_as::<_, Store>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            StoreFilter::Category(category) => {
                let sql = format!(
                    "SELECT {} FROM stores WHERE user_id = $1 AND category_id = $2 ORDER BY id",
                    STORE_COLUMNS
                );
                sqlx::query_as::<_, Store>(&sql)
                    .bind(user_id)
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
            }
            StoreFilter::Uncategorized => {
                let sql = format!(
                    "SELECT {} FROM stores WHERE user_id = $1 AND category_id = 0 ORDER BY id",
                    STORE_COLUMNS
                );
                sqlx::query_as::<_, Store>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            StoreFilter::Recent => {
                let sql = format!(
                    "SELECT {} FROM stores WHERE user_id = $1 ORDER BY last_used DESC, id DESC LIMIT $2",
                    STORE_COLUMNS
                );
                sqlx::query_as::<_, Store>(&sql)
                    .bind(user_id)
                    .bind(RECENT_STORES_LIMIT)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(stores)
    }

    async fn store_content(&self, user_id: i64, store_id: i64) -> Result<Option<Store>, DatabaseError> {
        let sql = format!(
            "UPDATE stores SET last_used = now() WHERE id = $1 AND user_id = $2 RETURNING {}, content",
            STORE_COLUMNS
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(store_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    async fn save_store(&self, user_id: i64, params: &StoreParams) -> Result<Store, DatabaseError> {
        let sql = format!(
            "INSERT INTO stores (user_id, container_id, category_id, name, icon, color, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            STORE_COLUMNS
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(user_id)
            .bind(params.container)
            .bind(params.category)
            .bind(&params.name)
            .bind(&params.icon)
            .bind(params.color)
            .bind(&params.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(store)
    }
}
