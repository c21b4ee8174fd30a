// handlers/protected/home/container.rs - GET/POST /api/v1/home/container handlers

use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::database::models::{Category, Container, ContainerParams};
use crate::error::{ApiError, CONTAINER_EXISTS, CONTAINER_NOT_FOUND};
use crate::mux::RequestContext;

/// Name given to the container created for a new account
pub const DEFAULT_CONTAINER_NAME: &str = "Default";

#[derive(Debug, Serialize)]
pub struct ContainerResponse {
    #[serde(flatten)]
    pub container: Container,
    pub categories: Vec<Category>,
}

/// GET /api/v1/home/container - The user's container with its categories
///
/// Expected Output:
/// ```json
/// {
///   "status": "success",
///   "content": {
///     "id": 1,
///     "name": "Default",
///     "certificate": "<base64>",
///     "encrypted": "<base64>",
///     "categories": [{ "id": 2, "title": "Mail", "description": "", "icon": "" }]
///   }
/// }
/// ```
pub async fn container_get(state: AppState, ctx: RequestContext) -> Result<ContainerResponse, ApiError> {
    let user = ctx.require_principal()?;

    let container = state
        .vault
        .find_container(user.id)
        .await?
        .ok_or(CONTAINER_NOT_FOUND)?;
    let categories = state.vault.categories(user.id).await?;

    Ok(ContainerResponse { container, categories })
}

/// POST /api/v1/home/container - Create the user's container
///
/// Expected Input:
/// ```json
/// { "encrypted": "<base64>", "certificate": "<base64>" }
/// ```
///
/// Answers the same shape as `GET container`. A user holds a single
/// container; a second creation answers `container_exists`.
pub async fn container_post(state: AppState, ctx: RequestContext) -> Result<ContainerResponse, ApiError> {
    let params: ContainerParams = ctx.decode()?;
    let user = ctx.require_principal()?;

    let container = state
        .vault
        .save_container(user.id, DEFAULT_CONTAINER_NAME, &params)
        .await
        .map_err(ApiError::conflict_as(CONTAINER_EXISTS))?;
    info!("Created container {} for user {}", container.id, user.id);

    let categories = state.vault.categories(user.id).await?;
    Ok(ContainerResponse { container, categories })
}
