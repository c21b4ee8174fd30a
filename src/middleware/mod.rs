pub mod auth;

pub use auth::{Authenticate, SESSION_HEADER};
