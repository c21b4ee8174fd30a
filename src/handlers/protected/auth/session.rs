// handlers/protected/auth/session.rs - GET /api/v1/auth/session handler

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;
use crate::mux::RequestContext;

/// GET /api/v1/auth/session - The user owning the presented session token
pub async fn session_get(_state: AppState, ctx: RequestContext) -> Result<User, ApiError> {
    Ok(ctx.require_principal()?.clone())
}
