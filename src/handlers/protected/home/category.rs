// handlers/protected/home/category.rs - Category listing, creation and browsing

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::AppState;
use crate::database::models::{Category, CategoryParams, Store};
use crate::database::StoreFilter;
use crate::error::{ApiError, INVALID_PARAMS, USER_DATA_INVALID};
use crate::mux::RequestContext;

/// `global` value selecting stores without a category
pub const GLOBAL_UNCATEGORIZED: i64 = 1;
/// `global` value selecting the most recently used stores
pub const GLOBAL_RECENT: i64 = 2;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: i64,
    #[serde(default)]
    pub global: i64,
}

impl CategoryQuery {
    pub fn filter(&self) -> Result<StoreFilter, ApiError> {
        match (self.category, self.global) {
            (0, GLOBAL_UNCATEGORIZED) => Ok(StoreFilter::Uncategorized),
            (0, GLOBAL_RECENT) => Ok(StoreFilter::Recent),
            (0, _) => Err(INVALID_PARAMS.into()),
            (category, _) => Ok(StoreFilter::Category(category)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub created: Category,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct StoreList {
    pub stores: Vec<Store>,
}

/// GET /api/v1/home/categories - All categories of the user
pub async fn categories_get(state: AppState, ctx: RequestContext) -> Result<Vec<Category>, ApiError> {
    let user = ctx.require_principal()?;
    Ok(state.vault.categories(user.id).await?)
}

/// POST /api/v1/home/category - Create a category
///
/// Expected Input:
/// ```json
/// { "title": "Mail", "description": "", "icon": "envelope" }
/// ```
///
/// Answers the created category plus the refreshed list.
pub async fn category_post(state: AppState, ctx: RequestContext) -> Result<CategoryCreated, ApiError> {
    let params: CategoryParams = ctx.decode()?;
    if !params.is_valid() {
        return Err(USER_DATA_INVALID.into());
    }
    let user = ctx.require_principal()?;

    let created = state.vault.save_category(user.id, &params).await?;
    let categories = state.vault.categories(user.id).await?;
    Ok(CategoryCreated { created, categories })
}

/// GET /api/v1/home/category - Stores of one category, or a global view
///
/// Expected Input:
/// ```json
/// { "category": 4, "global": 0 }
/// ```
///
/// `category != 0` lists that category. With `category == 0`, `global: 1`
/// lists uncategorized stores and `global: 2` the recently used ones.
pub async fn category_get(state: AppState, ctx: RequestContext) -> Result<StoreList, ApiError> {
    let query: CategoryQuery = ctx.decode()?;
    let filter = query.filter()?;
    let user = ctx.require_principal()?;

    debug!("Listing stores for user {} with {:?}", user.id, filter);
    let stores = state.vault.stores(user.id, filter).await?;
    Ok(StoreList { stores })
}
