// handlers/protected/auth/mod.rs - Endpoints for the signed-in account
pub mod session;
pub mod user;

pub use session::session_get;
pub use user::user_patch;
