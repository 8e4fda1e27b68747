//! Snippet storage on a PostgREST-compatible remote table (Supabase and friends).

use super::{first_match, SnippetRepository};
use crate::config::RestConfig;
use crate::error::AppError;
use crate::models::snippet::{NewSnippet, Snippet};
use async_trait::async_trait;
use reqwest::StatusCode;

/// REST-backed store using a single pooled `reqwest` client.
///
/// Rows live at `{url}/rest/v1/{table}`. Every request carries the API key
/// both as the `apikey` header and as a bearer token, and is bounded by the
/// configured timeout.
pub struct RestSnippetStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    server_assigned_ids: bool,
}

impl RestSnippetStore {
    /// Build the store and its HTTP client.
    ///
    /// # Errors
    /// Returns [`AppError::StorageUnavailable`] when the client cannot be built.
    pub fn new(config: &RestConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
            server_assigned_ids: config.server_assigned_ids,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Read a response body and decode it as a row array.
    async fn read_rows(
        resp: reqwest::Response,
        accepted: &[StatusCode],
        action: &str,
    ) -> Result<Vec<Snippet>, AppError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            AppError::StorageUnavailable(format!("failed to read backend response: {e}"))
        })?;

        if !accepted.contains(&status) {
            tracing::warn!(%status, action, "REST backend rejected request");
            return Err(AppError::StorageUnavailable(format!(
                "backend returned {status} while {action}: {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::StorageUnavailable(format!(
                "failed to parse backend response while {action}: {e}: {body}"
            ))
        })
    }
}

#[async_trait]
impl SnippetRepository for RestSnippetStore {
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, AppError> {
        let resp = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&snippet)
            .send()
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("backend request failed: {e}")))?;

        let rows = Self::read_rows(
            resp,
            &[StatusCode::OK, StatusCode::CREATED],
            "storing snippet",
        )
        .await?;

        let Some(stored) = rows.into_iter().next() else {
            return Err(AppError::StorageUnavailable(
                "backend returned no rows for the stored snippet".to_string(),
            ));
        };
        tracing::debug!(id = %stored.id, "Snippet written to REST backend");
        Ok(stored)
    }

    async fn query_by_id(&self, id: &str) -> Result<Snippet, AppError> {
        let filter = format!("eq.{id}");
        let resp = self
            .request(reqwest::Method::GET)
            .query(&[("id", filter.as_str())])
            .send()
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("backend request failed: {e}")))?;

        let rows = Self::read_rows(resp, &[StatusCode::OK], "fetching snippet").await?;
        first_match(rows, id)
    }

    fn assigns_ids(&self) -> bool {
        self.server_assigned_ids
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
