//! Snippet create/fetch orchestration on top of an injected repository.

use crate::error::AppError;
use crate::models::snippet::{
    generate_id, normalize_optional, resolve_language, CreateSnippetRequest, NewSnippet, Snippet,
};
use crate::store::SnippetRepository;
use chrono::Utc;
use std::sync::Arc;


/// Validates requests, applies defaults, and delegates to the repository.
#[derive(Clone)]
pub struct SnippetService {
    repository: Arc<dyn SnippetRepository>,
    max_content_size: usize,
}

impl SnippetService {
    /// Construct a service over `repository`.
    ///
    /// # Arguments
    /// - `repository`: Storage backend selected at startup.
    /// - `max_content_size`: Upper bound for snippet content, in bytes.
    pub fn new(repository: Arc<dyn SnippetRepository>, max_content_size: usize) -> Self {
        Self {
            repository,
            max_content_size,
        }
    }

    /// Label of the backing repository.
    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    /// Create and persist a snippet.
    ///
    /// # Returns
    /// The stored record, including its assigned id.
    ///
    /// # Errors
    /// - [`AppError::InvalidInput`] for empty or oversized content.
    /// - Repository errors unchanged, typically [`AppError::StorageUnavailable`].
    pub async fn create(&self, request: CreateSnippetRequest) -> Result<Snippet, AppError> {
        if request.content.is_empty() {
            return Err(AppError::InvalidInput(
                "Snippet content is required".to_string(),
            ));
        }
        if request.content.len() > self.max_content_size {
            return Err(AppError::InvalidInput(format!(
                "Snippet size exceeds maximum of {} bytes",
                self.max_content_size
            )));
        }

        let id = if self.repository.assigns_ids() {
            None
        } else {
            Some(generate_id())
        };
        let snippet = NewSnippet {
            id,
            content: request.content,
            language: resolve_language(request.language),
            title: normalize_optional(request.title),
            created_at: Utc::now(),
            expires_at: request.expires_at,
        };

        let stored = self.repository.insert(snippet).await?;
        tracing::debug!(
            id = %stored.id,
            language = %stored.language,
            backend = self.repository.backend_name(),
            "Snippet created"
        );
        Ok(stored)
    }

    /// Fetch a snippet by id.
    ///
    /// # Errors
    /// - [`AppError::InvalidInput`] when `id` is blank.
    /// - [`AppError::NotFound`] when no snippet has this id.
    /// - [`AppError::StorageUnavailable`] when the backend call fails.
    pub async fn fetch(&self, id: &str) -> Result<Snippet, AppError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidInput("Snippet ID is required".to_string()));
        }
        self.repository.query_by_id(id).await
    }
}
