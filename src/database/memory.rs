use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, CategoryParams, Container, ContainerParams, NewUser, Store, StoreParams, User};
use crate::database::repository::{StoreFilter, UserRepository, VaultRepository, RECENT_STORES_LIMIT};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    containers: Vec<(i64, Container)>,
    categories: Vec<(i64, Category)>,
    stores: Vec<(i64, Store)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local repositories, used when no database is configured.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn summary(store: &Store) -> Store {
    Store {
        content: None,
        ..store.clone()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict);
        }
        let id = tables.next_id();
        tables.users.push(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            avatar: String::new(),
            last_used: user.last_used,
            dark_mode: user.dark_mode,
        });
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(DatabaseError::Conflict);
        }
        if let Some(existing) = tables.users.iter_mut().find(|u| u.id == user.id) {
            existing.email = user.email.clone();
            existing.password_hash = user.password_hash.clone();
            existing.last_used = user.last_used;
            existing.dark_mode = user.dark_mode;
        }
        Ok(())
    }
}

#[async_trait]
impl VaultRepository for MemoryRepository {
    async fn find_container(&self, user_id: i64) -> Result<Option<Container>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .containers
            .iter()
            .find(|(owner, _)| *owner == user_id)
            .map(|(_, c)| c.clone()))
    }

    async fn save_container(
        &self,
        user_id: i64,
        name: &str,
        params: &ContainerParams,
    ) -> Result<Container, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.containers.iter().any(|(owner, _)| *owner == user_id) {
            return Err(DatabaseError::Conflict);
        }
        let container = Container {
            id: tables.next_id(),
            name: name.to_string(),
            certificate: params.certificate.clone(),
            encrypted: params.encrypted.clone(),
        };
        tables.containers.push((user_id, container.clone()));
        Ok(container)
    }

    async fn categories(&self, user_id: i64) -> Result<Vec<Category>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn save_category(&self, user_id: i64, params: &CategoryParams) -> Result<Category, DatabaseError> {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: tables.next_id(),
            title: params.title.clone(),
            description: params.description.clone(),
            icon: params.icon.clone(),
        };
        tables.categories.push((user_id, category.clone()));
        Ok(category)
    }

    async fn stores(&self, user_id: i64, filter: StoreFilter) -> Result<Vec<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        let owned = tables
            .stores
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, s)| s);

        let stores = match filter {
            StoreFilter::All => owned.map(summary).collect(),
            StoreFilter::Category(category) => owned.filter(|s| s.category == category).map(summary).collect(),
            StoreFilter::Uncategorized => owned.filter(|s| s.category == 0).map(summary).collect(),
            StoreFilter::Recent => {
                let mut recent: Vec<Store> = owned.map(summary).collect();
                recent.sort_by(|a, b| b.last_used.cmp(&a.last_used).then(b.id.cmp(&a.id)));
                recent.truncate(RECENT_STORES_LIMIT as usize);
                recent
            }
        };
        Ok(stores)
    }

    async fn store_content(&self, user_id: i64, store_id: i64) -> Result<Option<Store>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let store = tables
            .stores
            .iter_mut()
            .find(|(owner, s)| *owner == user_id && s.id == store_id)
            .map(|(_, s)| {
                s.last_used = Utc::now();
                s.clone()
            });
        Ok(store)
    }

    async fn save_store(&self, user_id: i64, params: &StoreParams) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let store = Store {
            id: tables.next_id(),
            created: now,
            last_used: now,
            modified: now,
            container: params.container,
            category: params.category,
            name: params.name.clone(),
            icon: params.icon.clone(),
            color: params.color,
            content: Some(params.content.clone()),
        };
        tables.stores.push((user_id, store.clone()));
        Ok(summary(&store))
    }
}
