//! Snippet storage backed by a local redb database.

use super::SnippetRepository;
use crate::constants::EMBEDDED_DB_FILE_NAME;
use crate::error::AppError;
use crate::models::snippet::{NewSnippet, Snippet};
use async_trait::async_trait;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Canonical snippet rows (`Snippet`, bincode-encoded), keyed by id.
const SNIPPETS: TableDefinition<&str, &[u8]> = TableDefinition::new("snippets");

/// Embedded store. Requires client-assigned ids.
pub struct EmbeddedSnippetStore {
    db: Arc<redb::Database>,
}

impl EmbeddedSnippetStore {
    /// Open (or create) the database under `db_path` and initialize tables.
    ///
    /// # Arguments
    /// - `db_path`: Directory holding the database file.
    ///
    /// # Returns
    /// A ready [`EmbeddedSnippetStore`].
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or redb fails to
    /// open the file or create the table.
    pub fn open(db_path: &str) -> Result<Self, AppError> {
        let dir = Path::new(db_path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageUnavailable(format!(
                "Failed to create database directory '{}': {}",
                db_path, err
            ))
        })?;

        let db = redb::Database::create(dir.join(EMBEDDED_DB_FILE_NAME))?;
        let write_txn = db.begin_write()?;
        write_txn.open_table(SNIPPETS)?;
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn insert_row(db: &redb::Database, snippet: &Snippet) -> Result<(), AppError> {
        let encoded = bincode::serialize(snippet)?;
        let write_txn = db.begin_write()?;
        {
            let mut snippets = write_txn.open_table(SNIPPETS)?;
            if snippets.get(snippet.id.as_str())?.is_some() {
                return Err(AppError::StorageUnavailable(format!(
                    "Snippet id '{}' already exists",
                    snippet.id
                )));
            }
            snippets.insert(snippet.id.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_row(db: &redb::Database, id: &str) -> Result<Option<Snippet>, AppError> {
        let read_txn = db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        match snippets.get(id)? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }

    /// Run a redb operation on the blocking pool.
    async fn blocking<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&redb::Database) -> Result<T, AppError> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(db.as_ref()))
            .await
            .map_err(|err| {
                AppError::StorageUnavailable(format!("Embedded store task failed: {}", err))
            })?
    }
}

#[async_trait]
impl SnippetRepository for EmbeddedSnippetStore {
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, AppError> {
        let Some(id) = snippet.id.clone() else {
            return Err(AppError::StorageUnavailable(
                "Embedded store requires a client-assigned snippet id".to_string(),
            ));
        };
        let record = snippet.into_snippet(id);
        let stored = record.clone();
        self.blocking(move |db| Self::insert_row(db, &stored)).await?;
        tracing::debug!(id = %record.id, "Snippet written to embedded store");
        Ok(record)
    }

    async fn query_by_id(&self, id: &str) -> Result<Snippet, AppError> {
        let key = id.to_string();
        self.blocking(move |db| Self::get_row(db, &key))
            .await?
            .ok_or(AppError::NotFound)
    }

    fn backend_name(&self) -> &'static str {
        "embedded"
    }
}
