use crate::config::RecaptchaConfig;
use crate::utils::error::{ContactError, Result};
use base64::Engine;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Google 服務帳戶金鑰（只取簽章需要的欄位）
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// 避免私鑰出現在日誌中
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl ServiceAccountKey {
    /// 解析原始 JSON 或 base64 編碼的 JSON
    pub fn from_json_or_base64(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            return Ok(serde_json::from_str(trimmed)?);
        }

        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let decoded = base64::engine::general_purpose::STANDARD.decode(compact)?;
        Ok(serde_json::from_slice(&decoded)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_or_base64(&content)
    }

    /// 產生 JWT bearer grant 用的簽章斷言
    pub fn signed_assertion(&self, issued_at: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }

    /// 以服務帳戶換取 OAuth access token
    pub async fn fetch_access_token(&self, client: &Client) -> Result<String> {
        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;

        tracing::debug!("Requesting access token for {}", self.client_email);
        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::ServiceError {
                service: "Google OAuth".to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let token: AccessTokenResponse = response.json().await?;
        tracing::debug!("Access token issued, expires in {:?}s", token.expires_in);
        Ok(token.access_token)
    }
}

/// 呼叫評估服務時使用的憑證
#[derive(Debug, Clone)]
pub enum Credentials {
    ServiceAccount(Box<ServiceAccountKey>),
    ApiKey(String),
}

impl Credentials {
    /// 依序嘗試：環境中的 JSON、金鑰檔、API key
    pub fn resolve(config: &RecaptchaConfig) -> Result<Self> {
        if let Some(raw) = &config.credentials_json {
            let key = ServiceAccountKey::from_json_or_base64(raw)?;
            return Ok(Credentials::ServiceAccount(Box::new(key)));
        }

        if let Some(path) = &config.credentials_file {
            let key = ServiceAccountKey::from_file(path)?;
            return Ok(Credentials::ServiceAccount(Box::new(key)));
        }

        if let Some(api_key) = &config.api_key {
            return Ok(Credentials::ApiKey(api_key.clone()));
        }

        Err(ContactError::MissingConfigError {
            field: "recaptcha.credentials".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const TEST_KEY_PEM: &str = include_str!("../../tests/fixtures/test_service_account_key.pem");

    fn key_json(token_uri: &str) -> String {
        serde_json::json!({
            "type": "service_account",
            "project_id": "demo-project",
            "client_email": "recaptcha@demo-project.iam.gserviceaccount.com",
            "private_key": TEST_KEY_PEM,
            "token_uri": token_uri,
        })
        .to_string()
    }

    #[test]
    fn test_parse_raw_json() {
        let key = ServiceAccountKey::from_json_or_base64(&key_json(DEFAULT_TOKEN_URI)).unwrap();
        assert_eq!(key.account_type.as_deref(), Some("service_account"));
        assert_eq!(key.project_id.as_deref(), Some("demo-project"));
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_base64_json() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(key_json(DEFAULT_TOKEN_URI));
        let key = ServiceAccountKey::from_json_or_base64(&encoded).unwrap();
        assert_eq!(
            key.client_email,
            "recaptcha@demo-project.iam.gserviceaccount.com"
        );
    }

    #[test]
    fn test_garbage_credentials_are_configuration_errors() {
        let err = ServiceAccountKey::from_json_or_base64("not base64 !!").unwrap_err();
        assert!(matches!(err, ContactError::CredentialDecodeError(_)));

        let err = ServiceAccountKey::from_json_or_base64("{\"client_email\": 1}").unwrap_err();
        assert!(matches!(err, ContactError::SerializationError(_)));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = ServiceAccountKey::from_json_or_base64(&key_json(DEFAULT_TOKEN_URI)).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_signed_assertion_has_three_segments() {
        let key = ServiceAccountKey::from_json_or_base64(&key_json(DEFAULT_TOKEN_URI)).unwrap();
        let jwt = key.signed_assertion(1_700_000_000).unwrap();
        assert_eq!(jwt.split('.').count(), 3);
    }

    #[test]
    fn test_resolve_prefers_json_then_file_then_api_key() {
        let mut config = RecaptchaConfig {
            api_key: Some("api-key".to_string()),
            ..RecaptchaConfig::default()
        };
        assert!(matches!(
            Credentials::resolve(&config).unwrap(),
            Credentials::ApiKey(_)
        ));

        config.credentials_json = Some(key_json(DEFAULT_TOKEN_URI));
        assert!(matches!(
            Credentials::resolve(&config).unwrap(),
            Credentials::ServiceAccount(_)
        ));
    }

    #[test]
    fn test_resolve_without_credentials_is_missing_config() {
        let err = Credentials::resolve(&RecaptchaConfig::default()).unwrap_err();
        assert!(matches!(err, ContactError::MissingConfigError { .. }));
    }

    #[tokio::test]
    async fn test_fetch_access_token() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .body_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer");
            then.status(200).json_body(serde_json::json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            }));
        });

        let key = ServiceAccountKey::from_json_or_base64(&key_json(&server.url("/token"))).unwrap();
        let token = key.fetch_access_token(&Client::new()).await.unwrap();

        token_mock.assert();
        assert_eq!(token, "ya29.test-token");
    }

    #[tokio::test]
    async fn test_fetch_access_token_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(400)
                .json_body(serde_json::json!({ "error": "invalid_grant" }));
        });

        let key = ServiceAccountKey::from_json_or_base64(&key_json(&server.url("/token"))).unwrap();
        let err = key.fetch_access_token(&Client::new()).await.unwrap_err();

        match err {
            ContactError::ServiceError { status, message, .. } => {
                assert_eq!(status, 400);
                assert!(message.contains("invalid_grant"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
