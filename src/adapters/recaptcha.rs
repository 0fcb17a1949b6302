use crate::adapters::credentials::Credentials;
use crate::config::RecaptchaConfig;
use crate::domain::model::{Assessment, AssessmentEvent};
use crate::domain::ports::Assessor;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const SERVICE_NAME: &str = "reCAPTCHA Enterprise";

#[derive(Debug, Serialize)]
struct CreateAssessmentRequest<'a> {
    event: &'a AssessmentEvent,
}

/// reCAPTCHA Enterprise REST 客戶端；憑證在每次請求時解析
pub struct RecaptchaClient {
    client: Client,
    config: RecaptchaConfig,
}

impl RecaptchaClient {
    pub fn new(config: RecaptchaConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: RecaptchaConfig) -> Self {
        Self { client, config }
    }

    pub fn assessments_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/assessments",
            self.config.endpoint.trim_end_matches('/'),
            project_id
        )
    }
}

#[async_trait]
impl Assessor for RecaptchaClient {
    async fn create_assessment(&self, event: &AssessmentEvent) -> Result<Assessment> {
        let project_id = validate_required_field("recaptcha.project_id", &self.config.project_id)?;
        let credentials = Credentials::resolve(&self.config)?;
        let url = self.assessments_url(project_id);

        tracing::debug!("Creating assessment at {}", url);
        let mut request = self
            .client
            .post(&url)
            .json(&CreateAssessmentRequest { event });

        request = match credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key)]),
            Credentials::ServiceAccount(account) => {
                let access_token = account.fetch_access_token(&self.client).await?;
                request.bearer_auth(access_token)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Assessment response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::ServiceError {
                service: SERVICE_NAME.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let assessment: Assessment = response.json().await?;
        tracing::debug!("Got assessment {:?}", assessment.name);
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EXPECTED_ACTION;
    use httpmock::prelude::*;

    fn event() -> AssessmentEvent {
        AssessmentEvent {
            token: "token-123".to_string(),
            site_key: "site-key".to_string(),
            expected_action: EXPECTED_ACTION.to_string(),
        }
    }

    fn config(endpoint: String) -> RecaptchaConfig {
        RecaptchaConfig {
            project_id: Some("demo-project".to_string()),
            site_key: Some("site-key".to_string()),
            api_key: Some("api-key".to_string()),
            endpoint,
            ..RecaptchaConfig::default()
        }
    }

    #[test]
    fn test_assessments_url_trims_trailing_slash() {
        let client = RecaptchaClient::new(config("https://example.test/".to_string()));
        assert_eq!(
            client.assessments_url("demo-project"),
            "https://example.test/v1/projects/demo-project/assessments"
        );
    }

    #[tokio::test]
    async fn test_create_assessment_with_api_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/projects/demo-project/assessments")
                .query_param("key", "api-key")
                .json_body(serde_json::json!({
                    "event": {
                        "token": "token-123",
                        "siteKey": "site-key",
                        "expectedAction": "submit_contact"
                    }
                }));
            then.status(200).json_body(serde_json::json!({
                "name": "projects/demo-project/assessments/1",
                "tokenProperties": { "valid": true, "action": "submit_contact" },
                "riskAnalysis": { "score": 0.7 }
            }));
        });

        let client = RecaptchaClient::new(config(server.base_url()));
        let assessment = client.create_assessment(&event()).await.unwrap();

        mock.assert();
        assert_eq!(assessment.risk_analysis.unwrap().score, 0.7);
    }

    #[tokio::test]
    async fn test_missing_project_id_fails_before_any_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let mut config = config(server.base_url());
        config.project_id = None;
        let err = RecaptchaClient::new(config)
            .create_assessment(&event())
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::MissingConfigError { .. }));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_service_error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/projects/demo-project/assessments");
            then.status(403).body("permission denied");
        });

        let err = RecaptchaClient::new(config(server.base_url()))
            .create_assessment(&event())
            .await
            .unwrap_err();

        match err {
            ContactError::ServiceError { status, .. } => assert_eq!(status, 403),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
