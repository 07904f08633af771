//! End-to-end tests of the remote classifier against a local server that
//! speaks the chat-completions protocol.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use email_classifier::classifier::{Category, ClassifierGateway};
use email_classifier::config::AppConfig;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a fake chat-completions server under `/v1`, return its base URL.
async fn start_fake_api(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}/v1")
}

fn gateway_for(base_url: String, timeout_secs: u64) -> ClassifierGateway {
    let config = AppConfig {
        api_key: Some(SecretString::from("sk-test")),
        base_url,
        classifier_timeout: Duration::from_secs(timeout_secs),
        ..AppConfig::default()
    };
    ClassifierGateway::from_config(&config).unwrap()
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-test",
        "system_fingerprint": null,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content, "refusal": null},
            "logprobs": null,
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 40, "completion_tokens": 20, "total_tokens": 60}
    })
}

/// Text of a chat message whose content is a string or a list of parts.
fn message_text(message: &Value) -> String {
    match &message["content"] {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

async fn classify_ok(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    // Reject anything that does not look like the classifier's request.
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-test");
    let json_mode = body["response_format"]["type"] == "json_object";
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let has_system = messages.first().is_some_and(|m| m["role"] == "system");
    let last_is_user = messages.last().is_some_and(|m| m["role"] == "user");
    if !authorized || !json_mode || !has_system || !last_is_user {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "unexpected request"})));
    }

    let user_text = messages.last().map(message_text).unwrap_or_default();
    let reply = json!({
        "category": "Improductive",
        "confidence": 0.91,
        "summary": format!("Recebido: {user_text}"),
        "suggested_response": "Obrigado pela mensagem!"
    });
    (StatusCode::OK, Json(completion(&reply.to_string())))
}

#[tokio::test]
async fn remote_result_is_returned() {
    timeout(TEST_TIMEOUT, async {
        let base = start_fake_api(Router::new().route("/v1/chat/completions", post(classify_ok))).await;
        let gateway = gateway_for(base, 5);
        assert!(!gateway.is_mock());

        // Keyword fallback would say Productive here.
        let result = gateway.classify("Segue o anexo com votos de boas festas").await;
        assert_eq!(result.category, Category::Improductive);
        assert!((result.confidence - 0.91).abs() < 1e-9);
        assert_eq!(result.summary, "Recebido: Segue o anexo com votos de boas festas");
        assert_eq!(result.suggested_response, "Obrigado pela mensagem!");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_error_falls_back_to_keywords() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let gateway = gateway_for(start_fake_api(app).await, 5);

        let result = gateway.classify("Temos um bug no sistema").await;
        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.confidence, 0.85);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn auth_failure_falls_back_to_keywords() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"}))) }),
        );
        let gateway = gateway_for(start_fake_api(app).await, 5);

        let result = gateway.classify("Feliz aniversário!").await;
        assert_eq!(result.category, Category::Improductive);
        assert_eq!(result.confidence, 0.85);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn invalid_category_falls_back_to_keywords() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(completion(
                    r#"{"category": "Spam", "confidence": 0.99, "summary": "x", "suggested_response": "y"}"#,
                ))
            }),
        );
        let gateway = gateway_for(start_fake_api(app).await, 5);

        let result = gateway.classify("Prazo do projeto").await;
        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.confidence, 0.85);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slow_server_falls_back_after_timeout() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(completion("{}"))
            }),
        );
        let gateway = gateway_for(start_fake_api(app).await, 1);

        let result = gateway.classify("Bom dia!").await;
        assert_eq!(result.category, Category::Improductive);
        assert_eq!(result.confidence, 0.85);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn missing_key_refuses_to_build() {
    let config = AppConfig::default();
    assert!(ClassifierGateway::from_config(&config).is_err());
}
