use std::sync::Arc;

use thiserror::Error;

use crate::database::models::User;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turns plaintext passwords into stored digests and checks them back.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    fn verify(&self, digest: &str, plaintext: &str) -> bool;
}

// bcrypt accepts work factors in this range
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    fn verify(&self, digest: &str, plaintext: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Password verification error: {}", e);
                false
            }
        }
    }
}

/// Hash on the blocking pool so request workers are not stalled.
pub async fn hash_password(hasher: Arc<dyn PasswordHasher>, plaintext: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
}

/// Check `plaintext` against the user's stored digest on the blocking pool.
pub async fn verify_password(hasher: Arc<dyn PasswordHasher>, user: &User, plaintext: String) -> bool {
    let digest = user.password_hash.clone();
    match tokio::task::spawn_blocking(move || hasher.verify(&digest, &plaintext)).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let hasher = BcryptHasher::new(MIN_COST);
        let digest = hasher.hash("correct horse").unwrap();
        assert_ne!(digest, "correct horse");
        assert!(hasher.verify(&digest, "correct horse"));
        assert!(!hasher.verify(&digest, "battery staple"));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        let hasher = BcryptHasher::new(MIN_COST);
        assert!(!hasher.verify("not-a-digest", "anything"));
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(BcryptHasher::new(0).cost(), MIN_COST);
        assert_eq!(BcryptHasher::new(99).cost(), MAX_COST);
        assert_eq!(BcryptHasher::default().cost(), bcrypt::DEFAULT_COST);
    }

    #[tokio::test]
    async fn blocking_helpers_round_trip() {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(MIN_COST));
        let digest = hash_password(hasher.clone(), "secret".to_string()).await.unwrap();
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: digest,
            avatar: String::new(),
            last_used: false,
            dark_mode: false,
        };
        assert!(verify_password(hasher.clone(), &user, "secret".to_string()).await);
        assert!(!verify_password(hasher, &user, "wrong".to_string()).await);
    }
}
