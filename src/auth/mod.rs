pub mod password;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::models::User;
use crate::database::{DatabaseError, UserRepository};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unable to obtain session entropy: {0}")]
    Entropy(#[from] rand::Error),
}

/// Issued on login; never mutated afterwards.
#[derive(Debug, Clone)]
struct Session {
    user_id: i64,
    created: Instant,
}

/// In-memory map from session token to user id.
///
/// Tokens are 128 random bits rendered as a v4 UUID. Sessions live until
/// process restart unless a TTL is configured.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    users: Arc<dyn UserRepository>,
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            users,
            ttl: None,
        }
    }

    /// Expire sessions older than `ttl` on their next lookup.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a new session for `user_id`.
    pub async fn create(&self, user_id: i64) -> Result<Uuid, SessionError> {
        let token = generate_token()?;
        self.sessions.write().await.insert(
            token,
            Session {
                user_id,
                created: Instant::now(),
            },
        );
        info!("Created session for user {}", user_id);
        Ok(token)
    }

    /// Resolve a token string to its user. Malformed, unknown, expired
    /// tokens and deleted users all come back as `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        match Uuid::parse_str(token) {
            Ok(token) => self.resolve_token(&token).await,
            Err(_) => {
                debug!("Malformed session token");
                Ok(None)
            }
        }
    }

    pub async fn resolve_token(&self, token: &Uuid) -> Result<Option<User>, DatabaseError> {
        let session = self.sessions.read().await.get(token).cloned();
        let Some(session) = session else {
            debug!("Unable to find session: {}", token);
            return Ok(None);
        };

        if self.is_expired(&session) {
            self.sessions.write().await.remove(token);
            debug!("Session expired: {}", token);
            return Ok(None);
        }

        let user = self.users.find_by_id(session.user_id).await?;
        if user.is_none() {
            warn!("Invalid user for session: {}", token);
        }
        Ok(user)
    }

    /// Number of live sessions held in memory
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, session: &Session) -> bool {
        match self.ttl {
            Some(ttl) => session.created.elapsed() >= ttl,
            None => false,
        }
    }
}

/// 128 bits from the OS RNG, formatted as a version 4 UUID.
fn generate_token() -> Result<Uuid, SessionError> {
    let mut bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
}
