use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::password::{BcryptHasher, PasswordHasher};
use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::database::{
    Database, DatabaseError, MemoryRepository, PostgresRepository, UserRepository, VaultRepository,
};
use crate::handlers::{self, protected, public};
use crate::middleware::Authenticate;
use crate::mux::Mux;

/// Shared collaborators handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub vault: Arc<dyn VaultRepository>,
    pub sessions: Arc<SessionStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    /// Present when running against Postgres
    pub database: Option<Database>,
}

impl AppState {
    /// Connect to the configured database, or fall back to the in-memory backend.
    pub async fn connect(config: &AppConfig) -> Result<Self, DatabaseError> {
        let Some(url) = config.database_url() else {
            info!("No database configured, using in-memory storage");
            return Ok(Self::in_memory(config));
        };

        let database = Database::connect(url, config.max_connections).await?;
        info!("Connected to database");
        let repository = Arc::new(PostgresRepository::new(&database));
        Ok(Self::with_repositories(
            repository.clone(),
            repository,
            Some(database),
            config,
        ))
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        let repository = Arc::new(MemoryRepository::new());
        Self::with_repositories(repository.clone(), repository, None, config)
    }

    fn with_repositories(
        users: Arc<dyn UserRepository>,
        vault: Arc<dyn VaultRepository>,
        database: Option<Database>,
        config: &AppConfig,
    ) -> Self {
        let sessions = SessionStore::new(users.clone()).with_ttl(config.session_ttl());
        Self {
            users,
            vault,
            sessions: Arc::new(sessions),
            hasher: Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            database,
        }
    }
}

/// Route table of the API.
pub fn mux(state: AppState, config: &AppConfig) -> Mux<AppState> {
    let auth = Authenticate::new(state.sessions.clone());
    let mux = Mux::new(state)
        .with_cors(config.cors)
        .with_body_limit(config.max_body_bytes);

    mux.route("/health").handle(Method::GET, handlers::health_get);

    // Public
    mux.route("/api/v1/auth/login").handle(Method::POST, public::login_post);
    mux.route("/api/v1/auth/register").handle(Method::POST, public::register_post);

    // Session required
    mux.route("/api/v1/auth/session")
        .middleware(auth.clone())
        .handle(Method::GET, protected::session_get);
    mux.route("/api/v1/auth/user")
        .middleware(auth.clone())
        .handle(Method::PATCH, protected::user_patch);

    mux.route("/api/v1/home/container")
        .middleware(auth.clone())
        .handle(Method::GET, protected::container_get)
        .handle(Method::POST, protected::container_post);
    mux.route("/api/v1/home/categories")
        .middleware(auth.clone())
        .handle(Method::GET, protected::categories_get);
    mux.route("/api/v1/home/category")
        .middleware(auth.clone())
        .handle(Method::GET, protected::category_get)
        .handle(Method::POST, protected::category_post);
    mux.route("/api/v1/home/stores")
        .middleware(auth.clone())
        .handle(Method::POST, protected::stores_post);
    mux.route("/api/v1/home/store")
        .middleware(auth)
        .handle(Method::GET, protected::store_get)
        .handle(Method::POST, protected::store_post);

    mux
}

/// Install `mux` as the whole of an axum service, wrapped in request tracing
/// and, unless disabled, a per-request deadline.
pub fn router<S: Clone + Send + Sync + 'static>(mux: Arc<Mux<S>>, config: &AppConfig) -> Router {
    let router = Router::new().fallback(serve_mux::<S>).with_state(mux);
    match config.request_timeout() {
        Some(timeout) => router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout)),
        ),
        None => router.layer(TraceLayer::new_for_http()),
    }
}

async fn serve_mux<S: Clone + Send + Sync + 'static>(State(mux): State<Arc<Mux<S>>>, request: Request) -> Response {
    mux.dispatch(request).await
}

/// Build the full application service from configuration.
pub async fn build(config: &AppConfig) -> Result<Router, DatabaseError> {
    let state = AppState::connect(config).await?;
    Ok(router(Arc::new(mux(state, config)), config))
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Vinca API listening on http://{}", addr);
    }
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
