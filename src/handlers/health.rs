// handlers/health.rs - GET /health handler

use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::mux::RequestContext;

#[derive(Debug, Serialize)]
pub struct Health {
    pub database: &'static str,
}

/// GET /health - Liveness plus database reachability
///
/// `database` is `"ok"` when Postgres answers and `"memory"` when running on
/// the in-process backend.
pub async fn health_get(state: AppState, _ctx: RequestContext) -> Result<Health, ApiError> {
    let database = match &state.database {
        Some(database) => {
            database.health_check().await?;
            "ok"
        }
        None => "memory",
    };
    Ok(Health { database })
}
