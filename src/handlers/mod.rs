// handlers/mod.rs - Endpoint handlers grouped by access tier
//
// Public (no session) → Protected (Authenticate middleware)
pub mod health;
pub mod protected; // Session required: /api/v1/auth/session, /api/v1/auth/user, /api/v1/home/*
pub mod public; // No authentication: /api/v1/auth/login, /api/v1/auth/register

pub use health::health_get;
