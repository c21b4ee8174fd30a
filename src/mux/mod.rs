//! Request router.
//!
//! Routes are keyed by path. A request path matches a route exactly, or else
//! the longest registered path that is a string prefix of it. Each route
//! holds one handler per verb plus two middleware chains: route-level
//! middleware (attached before any verb is registered) and method-level
//! middleware (attached after a verb, applying to that verb only).
//!
//! ```rust,ignore
//! let mux = Mux::new(state).with_cors(true);
//! mux.route("/api/v1/home/store")
//!     .middleware(auth)                   // every verb
//!     .handle(Method::GET, store_get)
//!     .handle(Method::POST, store_create)
//!     .middleware(audit);                 // POST only
//! ```

pub mod context;
pub mod cors;
pub mod response;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub use context::RequestContext;
pub use response::Envelope;

use crate::error::{ApiError, METHOD_NOT_ALLOWED, ROUTE_NOT_FOUND};

/// Default cap on buffered request bodies
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Endpoint logic. Implemented for every
/// `Fn(S, RequestContext) -> impl Future<Output = Result<T, ApiError>>` where `T: Serialize`.
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, state: S, ctx: RequestContext) -> BoxFuture<'static, Result<Value, ApiError>>;
}

impl<S, F, Fut, T> Handler<S> for F
where
    S: Send + 'static,
    F: Fn(S, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Serialize,
{
    fn call(&self, state: S, ctx: RequestContext) -> BoxFuture<'static, Result<Value, ApiError>> {
        let fut = (self)(state, ctx);
        Box::pin(async move {
            let value = fut.await?;
            serde_json::to_value(value).map_err(|e| {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal("Failed to serialize response data")
            })
        })
    }
}

/// Runs before the handler and may reject the request or fill context slots.
#[async_trait]
pub trait Middleware<S>: Send + Sync + 'static {
    async fn handle(&self, state: &S, ctx: &mut RequestContext) -> Result<(), ApiError>;
}

struct RouteMethod<S> {
    method: Method,
    handler: Arc<dyn Handler<S>>,
    middleware: Vec<Arc<dyn Middleware<S>>>,
}

struct RouteInner<S> {
    methods: Vec<RouteMethod<S>>,
    middleware: Vec<Arc<dyn Middleware<S>>>,
}

/// A registered path with its verbs and middleware.
pub struct Route<S> {
    path: String,
    inner: RwLock<RouteInner<S>>,
}

/// Everything needed to serve one verb of a route, copied out of the table
/// so no lock is held while awaiting.
struct Endpoint<S> {
    handler: Arc<dyn Handler<S>>,
    middleware: Vec<Arc<dyn Middleware<S>>>,
}

impl<S: Clone + Send + Sync + 'static> Route<S> {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            inner: RwLock::new(RouteInner {
                methods: Vec::new(),
                middleware: Vec::new(),
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Register the handler for `method`.
    ///
    /// # Panics
    ///
    /// If `method` is already registered on this route.
    pub fn handle<H: Handler<S>>(&self, method: Method, handler: H) -> &Self {
        let mut inner = self.inner.write();
        if inner.methods.iter().any(|m| m.method == method) {
            panic!("method {} already registered for route {}", method, self.path);
        }
        inner.methods.push(RouteMethod {
            method,
            handler: Arc::new(handler),
            middleware: Vec::new(),
        });
        self
    }

    /// Attach middleware. Before any `handle` call it applies to the whole
    /// route; afterwards it applies to the most recently registered method.
    pub fn middleware<M: Middleware<S>>(&self, middleware: M) -> &Self {
        let middleware: Arc<dyn Middleware<S>> = Arc::new(middleware);
        let mut inner = self.inner.write();
        match inner.methods.last_mut() {
            Some(method) => method.middleware.push(middleware),
            None => inner.middleware.push(middleware),
        }
        self
    }

    /// Registered verbs, in registration order
    pub fn methods(&self) -> Vec<Method> {
        self.inner.read().methods.iter().map(|m| m.method.clone()).collect()
    }

    fn endpoint(&self, method: &Method) -> Option<Endpoint<S>> {
        let inner = self.inner.read();
        let matched = inner.methods.iter().find(|m| &m.method == method)?;
        let middleware = inner
            .middleware
            .iter()
            .chain(matched.middleware.iter())
            .cloned()
            .collect();
        Some(Endpoint {
            handler: matched.handler.clone(),
            middleware,
        })
    }
}

/// Route table plus the shared state handed to every handler.
pub struct Mux<S> {
    state: S,
    cors: bool,
    body_limit: usize,
    routes: RwLock<BTreeMap<String, Arc<Route<S>>>>,
}

impl<S: Clone + Send + Sync + 'static> Mux<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            cors: false,
            body_limit: DEFAULT_BODY_LIMIT,
            routes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Register a new path and return it for method / middleware attachment.
    ///
    /// # Panics
    ///
    /// If `path` is already registered.
    pub fn route(&self, path: &str) -> Arc<Route<S>> {
        let mut routes = self.routes.write();
        if routes.contains_key(path) {
            panic!("route path already registered: {}", path);
        }
        let route = Arc::new(Route::new(path));
        routes.insert(path.to_string(), route.clone());
        route
    }

    /// Registered paths in lexical order
    pub fn paths(&self) -> Vec<String> {
        self.routes.read().keys().cloned().collect()
    }

    /// Exact match first, then the longest registered prefix.
    pub fn match_route(&self, path: &str) -> Option<Arc<Route<S>>> {
        let routes = self.routes.read();
        if let Some(route) = routes.get(path) {
            return Some(route.clone());
        }
        routes
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, route)| route.clone())
    }

    /// Serve one request.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let mut response = self.route_request(request).await;
        if self.cors {
            cors::allow_origin(response.headers_mut());
        }
        response
    }

    async fn route_request(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_string();
        debug!("match route {}", path);

        let Some(route) = self.match_route(&path) else {
            debug!("no route for {}", path);
            return response::failure(ROUTE_NOT_FOUND.into(), StatusCode::NOT_FOUND);
        };

        if self.cors && request.method() == Method::OPTIONS {
            return cors::preflight();
        }

        let Some(endpoint) = route.endpoint(request.method()) else {
            debug!("{} not allowed on {}", request.method(), route.path());
            return response::failure(METHOD_NOT_ALLOWED.into(), StatusCode::METHOD_NOT_ALLOWED);
        };

        let mut ctx = match RequestContext::from_request(request, self.body_limit).await {
            Ok(ctx) => ctx,
            Err(err) => return response::failure(err, StatusCode::BAD_REQUEST),
        };

        for middleware in &endpoint.middleware {
            if let Err(err) = middleware.handle(&self.state, &mut ctx).await {
                debug!("{} rejected by middleware: {}", path, err);
                return response::failure(err, StatusCode::INTERNAL_SERVER_ERROR);
            }
        }

        match endpoint.handler.call(self.state.clone(), ctx).await {
            Ok(content) => response::success(content),
            Err(err) => {
                warn!("{} {}", path, err);
                response::failure(err, StatusCode::BAD_REQUEST)
            }
        }
    }
}
