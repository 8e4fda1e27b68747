//! Snippet records, request payloads, and field normalization.

use crate::constants::DEFAULT_LANGUAGE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted snippet, as stored by every backend and returned by the API.
///
/// Field names double as the REST backend's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub content: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Carried as data only; nothing expires snippets.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A validated snippet on its way to a backend.
///
/// `id` is `None` when the backend assigns identifiers itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSnippet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewSnippet {
    /// Complete the record with its final identifier.
    pub fn into_snippet(self, id: String) -> Snippet {
        Snippet {
            id,
            content: self.content,
            language: self.language,
            title: self.title,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Request payload for creating a snippet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSnippetRequest {
    /// Missing content decodes as empty and is rejected by the service.
    #[serde(default)]
    pub content: String,
    pub language: Option<String>,
    pub title: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateSnippetRequest {
    /// Request with only content set.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Query parameters for fetching a snippet (`?id=`).
#[derive(Debug, Deserialize)]
pub struct FetchSnippetQuery {
    pub id: Option<String>,
}

/// JSON body for fetching a snippet (`{"id": ...}`).
#[derive(Debug, Deserialize)]
pub struct FetchSnippetRequest {
    #[serde(default)]
    pub id: String,
}

/// Compact create payload: bare code, no metadata.
#[derive(Debug, Deserialize)]
pub struct CompactCreateRequest {
    #[serde(default)]
    pub code: String,
}

/// Compact create response carrying only the new id.
#[derive(Debug, Serialize)]
pub struct CompactCreated {
    pub id: String,
}

/// Compact fetch response carrying only the snippet body.
#[derive(Debug, Serialize)]
pub struct CompactSnippet {
    pub code: String,
}

impl From<Snippet> for CompactSnippet {
    fn from(value: Snippet) -> Self {
        Self {
            code: value.content,
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Trim an optional text field.
///
/// # Returns
/// The trimmed value, or `None` when absent or whitespace-only.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Resolve the stored language label, substituting `plaintext` when absent.
pub fn resolve_language(language: Option<String>) -> String {
    normalize_optional(language).unwrap_or_else(default_language)
}

/// Generate a fresh snippet identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
