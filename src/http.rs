//! HTTP surface
//!
//! Thin axum handlers over `commands`. Identity arrives as headers set by
//! the upstream identity provider.

use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path, Query, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::convert::Infallible;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::commands;
use crate::domain::{DomainError, Identity, ItemDraft, ItemFilter, ItemPatch};
use crate::error::ApiError;
use crate::AppState;

pub const VIEWER_UID_HEADER: &str = "x-viewer-uid";
pub const VIEWER_EMAIL_HEADER: &str = "x-viewer-email";
pub const VIEWER_ANONYMOUS_HEADER: &str = "x-viewer-anonymous";

/// Identity of the caller. Missing headers mean an anonymous viewer.
pub struct Viewer(pub Identity);

impl Viewer {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let anonymous = header(VIEWER_ANONYMOUS_HEADER)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let identity = match header(VIEWER_UID_HEADER) {
            None => Identity::default(),
            Some(uid) if anonymous => Identity::anonymous(Some(uid)),
            Some(uid) => Identity::authenticated(uid, header(VIEWER_EMAIL_HEADER)),
        };
        Viewer(identity)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer::from_headers(&parts.headers))
    }
}

/// `Path` whose rejection is the usual JSON error body
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                DomainError::InvalidInput(format!("Invalid path: {}", rejection.body_text()))
            })?;
        Ok(ApiPath(value))
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

/// Build the full router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/items", get(list_items).post(report_item))
        .route(
            "/api/items/:id",
            get(item_detail).patch(update_item).delete(delete_item),
        )
        .route("/api/items/:id/returned", post(toggle_returned))
        .route("/api/items/:id/claim-sessions", post(open_claim_session))
        .route(
            "/api/claim-sessions/:sid",
            get(session_view).delete(close_claim_session),
        )
        .route("/api/claim-sessions/:sid/verify", post(verify_code))
        .route("/api/claim-sessions/:sid/claim", post(claim_item))
        .route("/api/dashboard", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::search_items(&state, &filter).await?))
}

async fn report_item(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Json(draft): Json<ItemDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let item = commands::report_item(&state, &viewer, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn item_detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::get_item_detail(&state, id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<u32>,
    Json(patch): Json<ItemPatch>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::update_item(&state, &viewer, id, patch).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<u32>,
) -> Result<impl IntoResponse, ApiError> {
    commands::delete_item(&state, &viewer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_returned(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<u32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::toggle_returned(&state, &viewer, id).await?))
}

async fn open_claim_session(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<u32>,
) -> Result<impl IntoResponse, ApiError> {
    let opened = commands::open_claim_session(&state, id, &viewer).await?;
    Ok((StatusCode::CREATED, Json(opened)))
}

async fn session_view(
    State(state): State<AppState>,
    ApiPath(sid): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::session_view(&state, sid).await?))
}

async fn close_claim_session(
    State(state): State<AppState>,
    ApiPath(sid): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    commands::close_claim_session(&state, sid).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn verify_code(
    State(state): State<AppState>,
    ApiPath(sid): ApiPath<Uuid>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::verify_code(&state, sid, &body.code).await?))
}

async fn claim_item(
    State(state): State<AppState>,
    ApiPath(sid): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::claim_item(&state, sid).await?))
}

async fn dashboard(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(commands::my_items(&state, &viewer).await?))
}
