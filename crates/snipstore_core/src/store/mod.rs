//! Snippet persistence capability and its backends.

/// Local redb-backed store.
pub mod embedded;
/// PostgREST-compatible remote store.
pub mod rest;

pub use embedded::EmbeddedSnippetStore;
pub use rest::RestSnippetStore;

use crate::config::StorageBackend;
use crate::error::AppError;
use crate::models::snippet::{NewSnippet, Snippet};
use async_trait::async_trait;
use std::sync::Arc;

/// The two storage operations the service needs.
///
/// Implementations must be `Send + Sync`; a single handle is shared by all
/// in-flight requests.
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Persist one snippet and return the stored record.
    ///
    /// # Errors
    /// [`AppError::StorageUnavailable`] when the backend rejects the write,
    /// with the backend's diagnostic attached.
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, AppError>;

    /// Look up one snippet by exact id.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when nothing matches.
    async fn query_by_id(&self, id: &str) -> Result<Snippet, AppError>;

    /// Whether the backend fills in `id` on insert.
    fn assigns_ids(&self) -> bool {
        false
    }

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}

/// Open the repository selected by configuration.
///
/// # Errors
/// Returns an error when the embedded database cannot be opened or the HTTP
/// client cannot be built.
pub fn open(backend: &StorageBackend) -> Result<Arc<dyn SnippetRepository>, AppError> {
    let repository: Arc<dyn SnippetRepository> = match backend {
        StorageBackend::Embedded { db_path } => Arc::new(EmbeddedSnippetStore::open(db_path)?),
        StorageBackend::Rest(config) => Arc::new(RestSnippetStore::new(config)?),
    };
    tracing::info!(backend = repository.backend_name(), "Snippet store ready");
    Ok(repository)
}

/// Reduce a filtered result set to the single expected record.
///
/// More than one row means the id uniqueness invariant was broken upstream;
/// the first row wins and the condition is logged.
pub(crate) fn first_match(rows: Vec<Snippet>, id: &str) -> Result<Snippet, AppError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    let Some(first) = rows.next() else {
        return Err(AppError::NotFound);
    };
    if count > 1 {
        tracing::warn!(id, count, "Multiple snippets share one id; returning the first");
    }
    Ok(first)
}
