#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::MockServer;
use portfolio_contact::config::{
    AppConfig, LoggingConfig, MailConfig, RecaptchaConfig, ServerConfig,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_KEY_PEM: &str = include_str!("../fixtures/test_service_account_key.pem");

/// 兩個遠端服務都指向同一個 mock server
pub fn test_config(server: &MockServer) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        mail: MailConfig {
            api_token: Some("mail-token".to_string()),
            endpoint: server.base_url(),
            owner_email: Some("owner@example.com".to_string()),
            sender_email: Some("contact@example.com".to_string()),
            sender_name: "Portfolio".to_string(),
            owner_name: Some("Grace Hopper".to_string()),
        },
        recaptcha: RecaptchaConfig {
            project_id: Some("demo-project".to_string()),
            site_key: Some("site-key".to_string()),
            api_key: Some("api-key".to_string()),
            endpoint: server.base_url(),
            ..RecaptchaConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

pub fn assessment_body(valid: bool, action: &str, score: f64) -> Value {
    serde_json::json!({
        "name": "projects/demo-project/assessments/1",
        "tokenProperties": {
            "valid": valid,
            "invalidReason": if valid { "INVALID_REASON_UNSPECIFIED" } else { "EXPIRED" },
            "action": action,
            "hostname": "localhost"
        },
        "riskAnalysis": { "score": score, "reasons": [] }
    })
}

pub fn ada() -> Value {
    serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "Hi\nthere"
    })
}

pub async fn post_json(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}
