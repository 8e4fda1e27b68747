//! Shared constants used across SnipStore crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 38411;

/// Default maximum snippet size accepted by the service, in bytes.
pub const DEFAULT_MAX_SNIPPET_SIZE: usize = 10 * 1024 * 1024;

/// Language label stored when a snippet is created without one.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Default table name on the REST backend.
pub const DEFAULT_REST_TABLE: &str = "snippets";

/// Default REST backend request timeout in seconds.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:38411";

/// File name for the redb database within the configured DB directory.
pub const EMBEDDED_DB_FILE_NAME: &str = "snippets.redb";
