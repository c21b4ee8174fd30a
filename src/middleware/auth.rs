use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::auth::SessionStore;
use crate::error::{ApiError, SESSION_INVALID};
use crate::mux::{Middleware, RequestContext};

/// Header carrying the session token
pub const SESSION_HEADER: &str = "Vinca-Authentication";

/// Session authentication middleware.
///
/// Resolves the token in [`SESSION_HEADER`] to a user and attaches it as the
/// request principal. A missing, malformed or unknown token rejects the
/// request with `user_session_invalid`.
#[derive(Clone)]
pub struct Authenticate {
    sessions: Arc<SessionStore>,
}

impl Authenticate {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<S: Send + Sync + 'static> Middleware<S> for Authenticate {
    async fn handle(&self, _state: &S, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let Some(token) = ctx.header(SESSION_HEADER) else {
            debug!("Missing {} header", SESSION_HEADER);
            return Err(SESSION_INVALID.into());
        };

        let user = self.sessions.resolve(token).await.map_err(|e| {
            error!("Session lookup failed: {}", e);
            ApiError::internal("Unable to resolve session")
        })?;

        match user {
            Some(user) => {
                ctx.attach_principal(user);
                Ok(())
            }
            None => Err(SESSION_INVALID.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::{MemoryRepository, UserRepository};
    use axum::body::Body;
    use axum::http::Request;

    async fn setup() -> (Authenticate, Arc<SessionStore>, i64) {
        let repo = Arc::new(MemoryRepository::new());
        let id = repo
            .save(NewUser {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password_hash: "digest".into(),
                last_used: false,
                dark_mode: false,
            })
            .await
            .unwrap();
        let sessions = Arc::new(SessionStore::new(repo));
        (Authenticate::new(sessions.clone()), sessions, id)
    }

    async fn context(token: Option<&str>) -> RequestContext {
        let mut builder = Request::builder().uri("/api/v1/auth/session");
        if let Some(token) = token {
            builder = builder.header(SESSION_HEADER, token);
        }
        RequestContext::from_request(builder.body(Body::empty()).unwrap(), 1024)
            .await
            .unwrap()
    }

    fn assert_session_invalid(result: Result<(), ApiError>) {
        match result {
            Err(ApiError::Handler(err)) => assert_eq!(err, SESSION_INVALID),
            other => panic!("expected user_session_invalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (auth, _, _) = setup().await;
        let mut ctx = context(None).await;
        assert_session_invalid(Middleware::<()>::handle(&auth, &(), &mut ctx).await);
        assert!(ctx.principal().is_none());
    }

    #[tokio::test]
    async fn unknown_or_malformed_token_is_rejected() {
        let (auth, _, _) = setup().await;
        for token in ["garbage", "00000000-0000-4000-8000-000000000000"] {
            let mut ctx = context(Some(token)).await;
            assert_session_invalid(Middleware::<()>::handle(&auth, &(), &mut ctx).await);
        }
    }

    #[tokio::test]
    async fn valid_token_attaches_principal() {
        let (auth, sessions, id) = setup().await;
        let token = sessions.create(id).await.unwrap();

        let mut ctx = context(Some(&token.to_string())).await;
        Middleware::<()>::handle(&auth, &(), &mut ctx).await.unwrap();
        assert_eq!(ctx.require_principal().unwrap().id, id);
    }
}
