// handlers/protected/home/store.rs - Store listing, retrieval and creation

use serde::Deserialize;
use tracing::{info, warn};

use super::category::StoreList;
use crate::app::AppState;
use crate::database::models::{Store, StoreParams};
use crate::database::StoreFilter;
use crate::error::{ApiError, STORE_NOT_FOUND, USER_DATA_INVALID};
use crate::mux::RequestContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoresQuery {
    pub category: i64,
}

#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    pub store_id: i64,
}

/// POST /api/v1/home/stores - Store summaries, without content
///
/// Expected Input:
/// ```json
/// { "category": 0 }   // 0 lists every store
/// ```
pub async fn stores_post(state: AppState, ctx: RequestContext) -> Result<StoreList, ApiError> {
    let query: StoresQuery = ctx.decode()?;
    let user = ctx.require_principal()?;

    let filter = match query.category {
        0 => StoreFilter::All,
        category => StoreFilter::Category(category),
    };
    let stores = state.vault.stores(user.id, filter).await?;
    Ok(StoreList { stores })
}

/// GET /api/v1/home/store - One store including its content
///
/// Expected Input:
/// ```json
/// { "store_id": 12 }
/// ```
///
/// Marks the store as used.
pub async fn store_get(state: AppState, ctx: RequestContext) -> Result<Store, ApiError> {
    let query: StoreQuery = ctx.decode()?;
    let user = ctx.require_principal()?;

    let store = state
        .vault
        .store_content(user.id, query.store_id)
        .await?
        .ok_or(STORE_NOT_FOUND)?;
    Ok(store)
}

/// POST /api/v1/home/store - Create a store
///
/// Expected Input:
/// ```json
/// {
///   "container": 1,
///   "category": 4,
///   "name": "Bank",
///   "icon": "bank",
///   "color": 16711680,
///   "content": "<base64>"
/// }
/// ```
///
/// Non-zero `container` and `category` ids must belong to the caller,
/// otherwise `user_data_invalid`.
pub async fn store_post(state: AppState, ctx: RequestContext) -> Result<Store, ApiError> {
    let params: StoreParams = ctx.decode()?;
    if !params.is_valid() {
        return Err(USER_DATA_INVALID.into());
    }
    let user = ctx.require_principal()?;

    if params.container != 0 {
        let owned = state.vault.find_container(user.id).await?;
        if owned.map(|c| c.id) != Some(params.container) {
            warn!("User {} referenced foreign container {}", user.id, params.container);
            return Err(USER_DATA_INVALID.into());
        }
    }
    if params.category != 0 {
        let categories = state.vault.categories(user.id).await?;
        if !categories.iter().any(|c| c.id == params.category) {
            warn!("User {} referenced foreign category {}", user.id, params.category);
            return Err(USER_DATA_INVALID.into());
        }
    }

    let store = state.vault.save_store(user.id, &params).await?;
    info!("Created store {} for user {}", store.id, user.id);
    Ok(store)
}
