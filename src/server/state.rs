use std::sync::Arc;

use crate::adapters::{MailtrapClient, RecaptchaClient};
use crate::config::AppConfig;
use crate::core::{NoticeComposer, NotificationDispatcher, VerificationGate};
use crate::utils::error::Result;

/// 請求處理器共用的依賴，於啟動時建立一次
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<VerificationGate>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(gate: VerificationGate, dispatcher: NotificationDispatcher) -> Self {
        Self {
            gate: Arc::new(gate),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// 郵件設定不完整時在這裡失敗；reCAPTCHA 設定延後到每次請求檢查
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mailer = MailtrapClient::new(&config.mail)?;
        let composer = NoticeComposer::from_config(&config.mail)?;

        if !config.recaptcha_configured() {
            tracing::warn!("reCAPTCHA settings are incomplete, verification requests will fail");
        }

        let assessor = RecaptchaClient::new(config.recaptcha.clone());
        let gate = VerificationGate::new(Arc::new(assessor), config.recaptcha.site_key.clone());

        Ok(Self::new(
            gate,
            NotificationDispatcher::new(Arc::new(mailer), composer),
        ))
    }
}
