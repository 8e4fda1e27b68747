//! Core domain library for SnipStore (config, models, storage backends, service).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Snippet records and request payloads.
pub mod models;
/// Snippet create/fetch orchestration.
pub mod service;
/// Storage capability and its backends.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, RestConfig, StorageBackend};
pub use constants::{DEFAULT_CLI_SERVER_URL, DEFAULT_LANGUAGE, DEFAULT_PORT};
pub use error::AppError;
pub use models::snippet::Snippet;
pub use service::SnippetService;
pub use store::SnippetRepository;
