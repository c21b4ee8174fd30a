// handlers/protected/auth/user.rs - PATCH /api/v1/auth/user handler

use tracing::info;

use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::database::models::user::is_valid_email;
use crate::database::models::{User, UserUpdate};
use crate::error::{ApiError, EMAIL_USED, USER_DATA_INVALID};
use crate::mux::RequestContext;

/// PATCH /api/v1/auth/user - Update account settings
///
/// Expected Input (every field optional):
/// ```json
/// {
///   "email": "new@example.com",
///   "password": "new secret",
///   "last_used": true,
///   "dark_mode": true
/// }
/// ```
///
/// Returns the updated user.
pub async fn user_patch(state: AppState, ctx: RequestContext) -> Result<User, ApiError> {
    let update: UserUpdate = ctx.decode()?;
    let mut user = ctx.require_principal()?.clone();

    if let Some(email) = update.email {
        if email != user.email {
            if !is_valid_email(&email) {
                return Err(USER_DATA_INVALID.into());
            }
            if state.users.find_by_email(&email).await?.is_some() {
                return Err(EMAIL_USED.into());
            }
            user.email = email;
        }
    }

    if let Some(password) = update.password {
        if password.is_empty() {
            return Err(USER_DATA_INVALID.into());
        }
        user.password_hash = hash_password(state.hasher.clone(), password).await?;
    }

    if let Some(last_used) = update.last_used {
        user.last_used = last_used;
    }
    if let Some(dark_mode) = update.dark_mode {
        user.dark_mode = dark_mode;
    }

    state
        .users
        .update(&user)
        .await
        .map_err(ApiError::conflict_as(EMAIL_USED))?;
    info!("Updated settings for user {}", user.id);
    Ok(user)
}
