//! Minimal snippet endpoints: `{code}` in, `{id}` out, and back.

use crate::{error::HttpError, models::snippet::*, AppState};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// Store bare code and answer with its id only.
///
/// # Errors
/// Returns 400 for malformed payloads or empty code and 502 when the storage
/// backend fails.
pub async fn create_compact_snippet(
    State(state): State<AppState>,
    payload: Result<Json<CompactCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompactCreated>), HttpError> {
    let Json(req) = payload?;
    let snippet = state
        .service
        .create(CreateSnippetRequest::with_content(req.code))
        .await?;
    Ok((StatusCode::CREATED, Json(CompactCreated { id: snippet.id })))
}

/// Look up a snippet from a `{id}` body and answer with its code only.
///
/// # Errors
/// Returns 400 for a malformed body or missing id, 404 when no snippet
/// matches, and 502 when the storage backend fails.
pub async fn fetch_compact_snippet(
    State(state): State<AppState>,
    payload: Result<Json<FetchSnippetRequest>, JsonRejection>,
) -> Result<Json<CompactSnippet>, HttpError> {
    let Json(req) = payload?;
    let snippet = state.service.fetch(&req.id).await?;
    Ok(Json(CompactSnippet::from(snippet)))
}
