//! Claim Session Commands
//!
//! One session per detail-view mount. Closing it is navigation away.

use serde::Serialize;
use uuid::Uuid;

use super::item_cmd::load_item;
use crate::claim::ClaimView;
use crate::domain::Identity;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSessionOpened {
    pub session_id: Uuid,
    pub view: ClaimView,
}

pub async fn open_claim_session(
    state: &AppState,
    item_id: u32,
    viewer: &Identity,
) -> Result<ClaimSessionOpened, ApiError> {
    let item = load_item(state, item_id).await?;
    let session_id = state.claim_sessions.open(item, viewer).await;
    let view = session_view(state, session_id).await?;
    Ok(ClaimSessionOpened { session_id, view })
}

/// Current view of the session, including any notices raised since the last
/// call
pub async fn session_view(state: &AppState, session_id: Uuid) -> Result<ClaimView, ApiError> {
    state
        .claim_sessions
        .with_session(session_id, |session| session.view())
        .await
        .ok_or(ApiError::SessionNotFound)
}

pub async fn verify_code(
    state: &AppState,
    session_id: Uuid,
    candidate: &str,
) -> Result<ClaimView, ApiError> {
    let dispatcher = &state.notifications;
    let view = state
        .claim_sessions
        .with_session(session_id, |session| session.verify(candidate, dispatcher))
        .await
        .ok_or(ApiError::SessionNotFound)??;
    Ok(view)
}

/// Claim an item that has no secret code
pub async fn claim_item(state: &AppState, session_id: Uuid) -> Result<ClaimView, ApiError> {
    let dispatcher = &state.notifications;
    let view = state
        .claim_sessions
        .with_session(session_id, |session| session.claim(dispatcher))
        .await
        .ok_or(ApiError::SessionNotFound)??;
    Ok(view)
}

pub async fn close_claim_session(state: &AppState, session_id: Uuid) -> Result<(), ApiError> {
    if state.claim_sessions.close(session_id).await {
        Ok(())
    } else {
        Err(ApiError::SessionNotFound)
    }
}
