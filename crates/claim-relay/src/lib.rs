//! Claim mail relay
//!
//! Accepts `{toEmail, itemTitle}` and mails the reporter a fixed claim
//! notice. Holds no state beyond the transport.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod routes;
pub mod template;
pub mod transport;

use transport::MailTransport;

#[derive(Clone)]
pub struct RelayState {
    pub transport: Arc<dyn MailTransport>,
}

pub fn build_router(transport: Arc<dyn MailTransport>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/send-claim-email", post(routes::send_claim_email))
        .route("/health", get(routes::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(RelayState { transport })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::template::ClaimMessage;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<ClaimMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for Outbox {
        async fn send(&self, message: &ClaimMessage) -> Result<(), RelayError> {
            if self.fail {
                return Err(RelayError::Transport("smtp down".to_string()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    async fn post(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/send-claim-email")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_sends_claim_email() {
        let outbox = Arc::new(Outbox::default());
        let app = build_router(outbox.clone());

        let (status, body) = post(app, r#"{"toEmail":"a@x.com","itemTitle":"Laptop"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Email sent successfully");

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "Item Claim Notification: \"Laptop\"");
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let outbox = Arc::new(Outbox::default());

        for body in [r#"{"toEmail":"a@x.com"}"#, r#"{"toEmail":"","itemTitle":"Laptop"}"#, "not json"] {
            let (status, json) = post(build_router(outbox.clone()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Missing required fields");
        }
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_fields_are_not_missing() {
        let outbox = Arc::new(Outbox::default());

        let (status, _) = post(
            build_router(outbox.clone()),
            r#"{"toEmail":" ","itemTitle":"Laptop"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outbox.sent.lock().unwrap()[0].to, " ");
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let outbox = Arc::new(Outbox {
            fail: true,
            ..Default::default()
        });

        let (status, body) = post(
            build_router(outbox),
            r#"{"toEmail":"a@x.com","itemTitle":"Laptop"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to send email");
    }

    #[tokio::test]
    async fn test_health() {
        let resp = build_router(Arc::new(Outbox::default()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
