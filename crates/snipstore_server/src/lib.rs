//! HTTP server wiring for SnipStore (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for snippet endpoints.
pub mod handlers;

pub use snipstore_core::{
    config, models, store, AppError, Config, RestConfig, SnippetService, StorageBackend,
    DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Methods advertised to cross-origin callers.
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// Request headers advertised to cross-origin callers.
const CORS_ALLOW_HEADERS: &str = "content-type, authorization";
/// Room for the JSON envelope around the snippet fields.
const JSON_ENVELOPE_ALLOWANCE: usize = 64 * 1024;
/// Worst-case growth of a string under JSON escaping (`\u0001`).
const JSON_ESCAPE_FACTOR: usize = 6;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SnippetService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `service`: Snippet service wired to the selected repository.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, service: SnippetService) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// Open the configured repository and build state around it.
    ///
    /// # Errors
    /// Returns an error when the storage backend cannot be opened.
    pub fn open(config: Config) -> Result<Self, AppError> {
        let repository = store::open(&config.backend)?;
        let service = SnippetService::new(repository, config.max_snippet_size);
        Ok(Self::new(config, service))
    }
}

/// Resolve the listener address from the `BIND` override and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing `port`, `bind`, and
///   `allow_public_access`.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match config.bind.as_deref() {
        Some(value) => match value.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    };

    if config.allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Largest request body accepted for a given content limit.
///
/// Content bytes are capped by the service; the transport only rejects bodies
/// that could not hold valid content even when every character is escaped.
pub fn request_body_limit(max_snippet_size: usize) -> usize {
    max_snippet_size
        .saturating_mul(JSON_ESCAPE_FACTOR)
        .saturating_add(JSON_ENVELOPE_ALLOWANCE)
}

/// Create the application router with all routes and middleware.
///
/// Every response carries permissive CORS headers. `OPTIONS` on any path is
/// answered with an empty 200 before method dispatch.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let body_limit = request_body_limit(state.config.max_snippet_size);

    Router::new()
        .route(
            "/api/snippet",
            post(handlers::snippet::create_snippet)
                .get(handlers::snippet::fetch_snippet_by_query)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/snippet/:id",
            get(handlers::snippet::fetch_snippet_by_path).fallback(handlers::method_not_allowed),
        )
        .route(
            "/snippets",
            post(handlers::compact::create_compact_snippet).fallback(handlers::method_not_allowed),
        )
        .route(
            "/getsnippets",
            post(handlers::compact::fetch_compact_snippet).fallback(handlers::method_not_allowed),
        )
        .route(
            "/ping",
            get(handlers::ping).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                // Outside the CORS layer so its preflight answers are covered too.
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ))
                .layer(cors)
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(CORS_ALLOW_METHODS),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(CORS_ALLOW_HEADERS),
                ))
                .layer(middleware::from_fn(handlers::answer_options)),
        )
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
