//! Snippet HTTP handlers returning full records.

use crate::{error::HttpError, models::snippet::*, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

/// Create a new snippet.
///
/// # Arguments
/// - `state`: Application state.
/// - `payload`: Snippet creation payload, or the decode failure.
///
/// # Returns
/// `201 Created` with the stored snippet as JSON.
///
/// # Errors
/// Returns 400 for malformed payloads or empty content and 502 when the
/// storage backend fails.
pub async fn create_snippet(
    State(state): State<AppState>,
    payload: Result<Json<CreateSnippetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Snippet>), HttpError> {
    let Json(req) = payload?;
    let snippet = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// Fetch a snippet by `?id=` query parameter.
///
/// # Returns
/// The snippet as JSON.
///
/// # Errors
/// Returns 400 when `id` is missing, 404 when no snippet matches, and 502
/// when the storage backend fails.
pub async fn fetch_snippet_by_query(
    State(state): State<AppState>,
    query: Result<Query<FetchSnippetQuery>, QueryRejection>,
) -> Result<Json<Snippet>, HttpError> {
    let Query(query) = query?;
    let id = query.id.unwrap_or_default();
    Ok(Json(state.service.fetch(&id).await?))
}

/// Fetch a snippet by path segment.
///
/// # Errors
/// Same as [`fetch_snippet_by_query`].
pub async fn fetch_snippet_by_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, HttpError> {
    Ok(Json(state.service.fetch(&id).await?))
}
