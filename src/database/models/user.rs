use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{1,16}$").expect("valid username pattern"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email pattern")
});

/// Account holder. The numeric id and the password digest never leave the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub avatar: String,
    #[sqlx(rename = "show_last_used")]
    pub last_used: bool,
    pub dark_mode: bool,
}

/// Registration body
#[derive(Debug, Clone, Deserialize)]
pub struct UserParams {
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub last_used: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

impl UserParams {
    pub fn is_valid(&self) -> bool {
        is_valid_username(&self.username) && is_valid_email(&self.email) && !self.password.is_empty()
    }
}

/// Settings update body; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub last_used: Option<bool>,
    pub dark_mode: Option<bool>,
}

/// Row about to be inserted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub last_used: bool,
    pub dark_mode: bool,
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(username: &str, email: &str, password: &str) -> UserParams {
        UserParams {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            last_used: false,
            dark_mode: false,
        }
    }

    #[test]
    fn validates_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("ABCDEFGHIJKLMNOP"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("alice1"));
        assert!(!is_valid_username("ABCDEFGHIJKLMNOPQ"));
    }

    #[test]
    fn validates_emails() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn registration_requires_password() {
        assert!(params("alice", "alice@example.com", "secret").is_valid());
        assert!(!params("alice", "alice@example.com", "").is_valid());
        assert!(!params("al1ce", "alice@example.com", "secret").is_valid());
    }

    #[test]
    fn serialized_user_hides_id_and_digest() {
        let user = User {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$2b$04$digest".into(),
            avatar: String::new(),
            last_used: true,
            dark_mode: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["last_used"], true);
    }
}
