pub mod auth;
pub mod home;

pub use auth::*;
pub use home::*;
