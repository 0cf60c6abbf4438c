use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::RelayError;
use crate::template::ClaimMessage;
use crate::RelayState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendClaimEmail {
    to_email: Option<String>,
    item_title: Option<String>,
}

/// Absent and empty count as missing; anything else is passed through
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

pub async fn send_claim_email(
    State(state): State<RelayState>,
    payload: Result<Json<SendClaimEmail>, JsonRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let Json(payload) = payload.map_err(|_| RelayError::MissingFields)?;
    let (Some(to_email), Some(item_title)) = (present(payload.to_email), present(payload.item_title))
    else {
        return Err(RelayError::MissingFields);
    };

    let message = ClaimMessage::render(&to_email, &item_title);
    if let Err(e) = state.transport.send(&message).await {
        error!("Error sending email: {e}");
        return Err(e);
    }

    info!("Claim notification email sent to: {to_email}");
    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Email sent successfully" })),
    ))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
