// handlers/public/auth/mod.rs - Account entry points
pub mod login;
pub mod register;

pub use login::login_post;
pub use register::register_post;
