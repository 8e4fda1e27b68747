//! HTTP error mapping for API handlers.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use snipstore_core::AppError;

/// Error returned by handlers: a status code plus the `{"error": ...}` body.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// Build an error with an explicit status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message placed in the `error` field.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            AppError::NotFound => Self::new(StatusCode::NOT_FOUND, "Snippet not found"),
            AppError::StorageUnavailable(detail) => {
                tracing::error!("Storage backend failure: {}", detail);
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    format!("Storage unavailable: {}", detail),
                )
            }
            AppError::Database(_) | AppError::Serialization(_) => {
                tracing::error!("Embedded store failure: {}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Config(_) => {
                tracing::error!("Internal error: {:?}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; every other decode failure is a client error.
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::new(
            status,
            format!("Invalid request payload: {}", rejection.body_text()),
        )
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid query string: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::HttpError;
    use axum::http::StatusCode;
    use snipstore_core::AppError;

    #[test]
    fn app_errors_map_to_expected_statuses() {
        let cases = [
            (
                AppError::InvalidInput("Snippet content is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::StorageUnavailable("backend returned 500".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Config("missing".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let rendered = format!("{:?}", err);
            assert_eq!(HttpError::from(err).status(), expected, "error: {}", rendered);
        }
    }

    #[test]
    fn storage_errors_keep_backend_detail() {
        let err = HttpError::from(AppError::StorageUnavailable(
            "backend returned 401 Unauthorized while storing snippet: bad key".to_string(),
        ));
        assert!(err.message().contains("bad key"));
    }
}
