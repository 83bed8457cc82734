use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::assets::AssetError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text safe to show in a page banner. Store and I/O details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{what} not found"),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Asset(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.user_message() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_not_leaked() {
        let err = AppError::Database(rusqlite::Error::InvalidQuery);
        assert!(!err.user_message().contains("query"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_and_not_found_are_shown() {
        let err = AppError::Validation("Service name is required".into());
        assert_eq!(err.user_message(), "Service name is required");
        assert_eq!(AppError::NotFound("Booking".into()).user_message(), "Booking not found");
    }
}
