use crate::config::MailConfig;
use crate::domain::model::{Mailbox, Notice};
use crate::domain::ports::Mailer;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SERVICE_NAME: &str = "Mailtrap";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a Mailbox,
    to: Vec<Mailbox>,
    subject: &'a str,
    html: &'a str,
    category: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message_ids: Vec<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Mailtrap 傳送 API 客戶端
pub struct MailtrapClient {
    client: Client,
    send_url: String,
    api_token: String,
    sender: Mailbox,
}

impl std::fmt::Debug for MailtrapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailtrapClient")
            .field("send_url", &self.send_url)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl MailtrapClient {
    /// 設定不完整時直接失敗，讓程序在啟動階段就停下
    pub fn new(config: &MailConfig) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &MailConfig) -> Result<Self> {
        config.validate()?;

        let api_token = validate_required_field("mail.api_token", &config.api_token)?.clone();
        let sender_email =
            validate_required_field("mail.sender_email", &config.sender_email)?.clone();

        Ok(Self {
            client,
            send_url: format!("{}/api/send", config.endpoint.trim_end_matches('/')),
            api_token,
            sender: Mailbox {
                email: sender_email,
                name: Some(config.sender_name.clone()),
            },
        })
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }
}

#[async_trait]
impl Mailer for MailtrapClient {
    async fn send(&self, notice: &Notice) -> Result<()> {
        let payload = SendRequest {
            from: &self.sender,
            to: vec![Mailbox {
                email: notice.recipient.clone(),
                name: None,
            }],
            subject: &notice.subject,
            html: &notice.html_body,
            category: notice.kind.category(),
        };

        tracing::debug!("Sending {:?} notice via {}", notice.kind, self.send_url);
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: SendResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() || !parsed.success {
            let message = if parsed.errors.is_empty() {
                body
            } else {
                parsed.errors.join(", ")
            };
            return Err(ContactError::ServiceError {
                service: SERVICE_NAME.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!("Mailtrap accepted message ids {:?}", parsed.message_ids);
        Ok(())
    }
}
