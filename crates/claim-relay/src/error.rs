use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail transport not configured: {0}")]
    NotConfigured(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing required fields" })),
            )
                .into_response(),
            RelayError::Transport(_) | RelayError::NotConfigured(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Failed to send email" })),
            )
                .into_response(),
        }
    }
}
