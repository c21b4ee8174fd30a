// handlers/public/auth/login.rs - POST /api/v1/auth/login handler

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::password::verify_password;
use crate::database::models::User;
use crate::error::{ApiError, LOGIN_INVALID};
use crate::mux::RequestContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token alongside the account it belongs to
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub uuid: Uuid,
    #[serde(flatten)]
    pub user: User,
}

/// POST /api/v1/auth/login - Exchange credentials for a session token
///
/// Expected Input:
/// ```json
/// { "email": "alice@example.com", "password": "secret" }
/// ```
///
/// Expected Output:
/// ```json
/// {
///   "status": "success",
///   "content": {
///     "uuid": "3f2b8c1e-...",
///     "username": "alice",
///     "email": "alice@example.com",
///     "avatar": "",
///     "last_used": false,
///     "dark_mode": false
///   }
/// }
/// ```
///
/// An unknown email and a wrong password both answer `user_login_invalid`.
pub async fn login_post(state: AppState, ctx: RequestContext) -> Result<LoginResponse, ApiError> {
    let request: LoginRequest = ctx.decode()?;

    let Some(user) = state.users.find_by_email(&request.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(LOGIN_INVALID.into());
    };

    if !verify_password(state.hasher.clone(), &user, request.password).await {
        warn!("Invalid password for user {}", user.id);
        return Err(LOGIN_INVALID.into());
    }

    let uuid = state.sessions.create(user.id).await?;
    info!("User {} logged in", user.id);
    Ok(LoginResponse { uuid, user })
}
