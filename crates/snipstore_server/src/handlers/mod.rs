//! HTTP request handlers.

/// Minimal `{code}` / `{id}` endpoints.
pub mod compact;
/// Full-record snippet endpoints.
pub mod snippet;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::HttpError;

/// Answer any `OPTIONS` request with an empty 200 before routing by method.
///
/// CORS preflights carrying `Access-Control-Request-Method` are handled by the
/// CORS layer first; this covers the rest.
pub async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
        )
            .into_response();
    }
    next.run(request).await
}

/// Liveness probe.
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> HttpError {
    HttpError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Fallback for unknown paths.
pub async fn route_not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "Route not found")
}
