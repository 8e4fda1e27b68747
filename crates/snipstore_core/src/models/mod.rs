//! Data models for API requests and persistence.

/// Snippet records and request payloads.
pub mod snippet;

#[cfg(test)]
mod tests;
