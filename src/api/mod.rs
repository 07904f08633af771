//! HTTP surface: analyze and preprocess endpoints, health check and the
//! static frontend.

mod analyze;
pub mod error;
mod preprocess;

pub use error::ApiError;

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::classifier::ClassifierGateway;
use crate::nlp::TextNormalizer;

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub normalizer: Arc<TextNormalizer>,
    pub gateway: Arc<ClassifierGateway>,
}

/// Build the Axum router. `static_dir` holds `index.html` and the assets
/// served under `/static`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/preprocess", post(preprocess::preprocess))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "healthy", "service": "email-classifier"}))
}

// ── Panics ──────────────────────────────────────────────────────────────

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::nlp::{FullLinguistics, Language};

    fn app() -> Router {
        let state = AppState {
            normalizer: Arc::new(TextNormalizer::new(
                Arc::new(FullLinguistics::new()),
                Language::Portuguese,
            )),
            gateway: Arc::new(ClassifierGateway::mock()),
        };
        router(state, Path::new("does-not-exist"))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn preprocess_request(body: impl Into<Body>) -> Request<Body> {
        Request::post("/api/preprocess")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn preprocess_uses_requested_language_for_keywords() {
        let body = r#"{"text": "which which which invoice", "language": "english"}"#;
        let (status, json) = send(preprocess_request(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["keywords"], serde_json::json!(["invoice"]));
        assert_eq!(json["processed"], "invoice");
    }

    #[tokio::test]
    async fn preprocess_invalid_json_is_json_error() {
        let (status, json) = send(preprocess_request("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Malformed request"));

        let (status, json) = send(preprocess_request(r#"{"remove_stopwords": true}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_json_is_payload_too_large() {
        let text = "a".repeat(MAX_UPLOAD_BYTES + 1);
        let body = serde_json::json!({ "text": text }).to_string();
        let (status, json) = send(preprocess_request(body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"], "O e-mail excede o tamanho máximo permitido.");
    }

    #[tokio::test]
    async fn oversized_upload_is_payload_too_large() {
        let boundary = "email-classifier-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"email_text\"\r\n\r\n\
             {}\r\n\
             --{boundary}--\r\n",
            "a".repeat(MAX_UPLOAD_BYTES + 1)
        );
        let request = Request::post("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"], "O e-mail excede o tamanho máximo permitido.");
    }

    #[tokio::test]
    async fn health_is_json() {
        let (status, json) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }
}
