//! HTTP-facing error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::claim::ClaimError;
use crate::domain::DomainError;

pub const DETAIL_LOAD_FAILED: &str = "Failed to load item details. Please try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("Claim session not found")]
    SessionNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::NotFound(_)) | ApiError::SessionNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Domain(DomainError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Domain(DomainError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Domain(DomainError::Conflict(_)) | ApiError::Claim(_) => StatusCode::CONFLICT,
            ApiError::Domain(DomainError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(e) => e.message().to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
