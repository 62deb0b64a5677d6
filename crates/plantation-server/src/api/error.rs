//! Mapping of service failures onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::service::ServiceError;

/// Error response body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A required body field was absent.
    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(format!("{} is required", field))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => {
                tracing::debug!("Rejected request: {}", err);
                Self::bad_request(err.to_string())
            }
            ServiceError::EstateNotFound(id) => {
                tracing::debug!("Estate {} not found", id);
                Self {
                    status: StatusCode::NOT_FOUND,
                    message: "estate not found".to_string(),
                }
            }
            ServiceError::Store(err) => {
                tracing::error!("Store failure: {:#}", err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("{:#}", err),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.message,
            })),
        )
            .into_response()
    }
}
