//! Shared test-only repositories for snipstore_core.

use crate::models::snippet::{generate_id, NewSnippet, Snippet};
use crate::{AppError, SnippetRepository};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory repository; optionally assigns ids itself like a remote table.
#[derive(Default)]
pub(crate) struct MemoryStore {
    rows: Mutex<Vec<Snippet>>,
    assigns_ids: bool,
}

impl MemoryStore {
    pub(crate) fn assigning_ids() -> Self {
        Self {
            assigns_ids: true,
            ..Self::default()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }

    /// Ids handed to `insert`, in order.
    pub(crate) fn ids(&self) -> Vec<String> {
        self.rows
            .lock()
            .expect("rows lock")
            .iter()
            .map(|row| row.id.clone())
            .collect()
    }
}

#[async_trait]
impl SnippetRepository for MemoryStore {
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, AppError> {
        let id = match (&snippet.id, self.assigns_ids) {
            (Some(_), true) => panic!("service must not send ids to an id-assigning backend"),
            (Some(id), false) => id.clone(),
            (None, true) => format!("server-{}", generate_id()),
            (None, false) => panic!("service must send ids to a client-id backend"),
        };
        let stored = snippet.into_snippet(id);
        self.rows.lock().expect("rows lock").push(stored.clone());
        Ok(stored)
    }

    async fn query_by_id(&self, id: &str) -> Result<Snippet, AppError> {
        let rows: Vec<Snippet> = self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .filter(|row| row.id == id)
            .cloned()
            .collect();
        crate::store::first_match(rows, id)
    }

    fn assigns_ids(&self) -> bool {
        self.assigns_ids
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Repository whose backend is always down.
pub(crate) struct FailingStore;

#[async_trait]
impl SnippetRepository for FailingStore {
    async fn insert(&self, _snippet: NewSnippet) -> Result<Snippet, AppError> {
        Err(AppError::StorageUnavailable(
            "backend returned 503 Service Unavailable while storing snippet: down".to_string(),
        ))
    }

    async fn query_by_id(&self, _id: &str) -> Result<Snippet, AppError> {
        Err(AppError::StorageUnavailable(
            "backend request failed: connection refused".to_string(),
        ))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
