//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_MAX_SNIPPET_SIZE, DEFAULT_PORT, DEFAULT_REST_TABLE,
};
use crate::error::AppError;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for SnipStore.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Raw `BIND` override; resolved by the server against `allow_public_access`.
    pub bind: Option<String>,
    pub allow_public_access: bool,
    pub max_snippet_size: usize,
    pub backend: StorageBackend,
}

/// Storage backend selected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local redb database stored under `db_path`.
    Embedded { db_path: String },
    /// PostgREST-compatible remote table.
    Rest(RestConfig),
}

/// Connection settings for the REST backend.
#[derive(Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Base URL, without the `/rest/v1` suffix.
    pub url: String,
    /// Sent both as `apikey` and as the bearer token.
    pub api_key: String,
    pub table: String,
    /// Whether the backend fills in `id` on insert.
    pub server_assigned_ids: bool,
    pub timeout: Duration,
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .field("server_assigned_ids", &self.server_assigned_ids)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorageBackend {
    /// Short backend label for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Embedded { .. } => "embedded",
            Self::Rest(_) => "rest",
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("snipstore")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Invalid {}='{}'. Falling back to {}", name, raw, default);
            default
        }
    }
}

fn parse_backend(
    raw: Option<String>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<StorageBackend, AppError> {
    let name = raw.unwrap_or_else(|| "embedded".to_string());
    match name.to_ascii_lowercase().as_str() {
        "embedded" | "local" | "redb" => Ok(StorageBackend::Embedded {
            db_path: lookup("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(default_db_path),
        }),
        "rest" | "postgrest" | "supabase" => {
            let url = lookup("REST_URL").or_else(|| lookup("SUPABASE_URL"));
            let api_key = lookup("REST_API_KEY").or_else(|| lookup("SUPABASE_KEY"));
            let (Some(url), Some(api_key)) = (url, api_key) else {
                return Err(AppError::Config(
                    "REST_URL and REST_API_KEY must be set when STORAGE_BACKEND=rest".to_string(),
                ));
            };
            let timeout_secs = parse_or_default(
                "BACKEND_TIMEOUT_SECS",
                lookup("BACKEND_TIMEOUT_SECS"),
                DEFAULT_BACKEND_TIMEOUT_SECS,
            );
            Ok(StorageBackend::Rest(RestConfig {
                url: url.trim_end_matches('/').to_string(),
                api_key,
                table: lookup("REST_TABLE").unwrap_or_else(|| DEFAULT_REST_TABLE.to_string()),
                server_assigned_ids: lookup("REST_SERVER_ASSIGNED_IDS")
                    .and_then(|value| parse_env_flag(&value))
                    .unwrap_or(false),
                timeout: Duration::from_secs(timeout_secs.max(1)),
            }))
        }
        other => Err(AppError::Config(format!(
            "Unknown STORAGE_BACKEND '{}'; expected 'embedded' or 'rest'",
            other
        ))),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when optional vars are missing.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the selected backend is unknown or its
    /// required settings are absent.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Values are trimmed and blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            port: parse_or_default("PORT", var("PORT"), DEFAULT_PORT),
            bind: var("BIND"),
            allow_public_access: var("ALLOW_PUBLIC_ACCESS")
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(false),
            max_snippet_size: parse_or_default(
                "MAX_SNIPPET_SIZE",
                var("MAX_SNIPPET_SIZE"),
                DEFAULT_MAX_SNIPPET_SIZE,
            ),
            backend: parse_backend(var("STORAGE_BACKEND"), &var)?,
        })
    }
}
