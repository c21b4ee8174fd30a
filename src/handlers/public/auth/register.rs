// handlers/public/auth/register.rs - POST /api/v1/auth/register handler

use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::database::models::{NewUser, User, UserParams};
use crate::error::{ApiError, EMAIL_USED, USER_DATA_INVALID};
use crate::mux::RequestContext;

/// POST /api/v1/auth/register - Create an account
///
/// Expected Input:
/// ```json
/// {
///   "username": "alice",          // letters only, 1-16 characters
///   "email": "alice@example.com",
///   "password": "secret",
///   "last_used": false,           // optional
///   "dark_mode": false            // optional
/// }
/// ```
///
/// Returns the created user. Does not log in.
pub async fn register_post(state: AppState, ctx: RequestContext) -> Result<User, ApiError> {
    let params: UserParams = ctx.decode()?;
    if !params.is_valid() {
        warn!("Rejected registration: invalid user data");
        return Err(USER_DATA_INVALID.into());
    }

    // Early answer before paying for bcrypt; `save` enforces it atomically.
    if state.users.find_by_email(&params.email).await?.is_some() {
        return Err(EMAIL_USED.into());
    }

    let password_hash = hash_password(state.hasher.clone(), params.password).await?;
    let id = state
        .users
        .save(NewUser {
            username: params.username,
            email: params.email,
            password_hash,
            last_used: params.last_used,
            dark_mode: params.dark_mode,
        })
        .await
        .map_err(ApiError::conflict_as(EMAIL_USED))?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::internal("Unable to load created user"))?;

    info!("Registered user {}", id);
    Ok(user)
}
