use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Handler failures, each with a fixed client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Announcement not found")]
    NotFound,
    #[error("Invalid JSON body")]
    InvalidBody(String),
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Storage(detail) => ApiError::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => error!(error = %detail, "request failed"),
            ApiError::InvalidBody(detail) => warn!(error = %detail, "rejected request body"),
            ApiError::NotFound => {}
        }
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
