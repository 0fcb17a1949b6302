use crate::core::notice::NoticeComposer;
use crate::domain::model::{Submission, MAX_EMAIL_LENGTH, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH};
use crate::domain::ports::Mailer;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{is_email_shaped, Validate};
use chrono::Utc;
use std::sync::Arc;

fn invalid(message: &str) -> ContactError {
    ContactError::ValidationError {
        message: message.to_string(),
    }
}

impl Validate for Submission {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("Name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(invalid("Email is required"));
        }
        if self.message.trim().is_empty() {
            return Err(invalid("Message is required"));
        }
        if !is_email_shaped(&self.email) {
            return Err(invalid("Email address is invalid"));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(invalid("Name is too long"));
        }
        if self.email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(invalid("Email address is too long"));
        }
        if self.message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(invalid("Message is too long"));
        }
        Ok(())
    }
}

/// 通知派送：先寄給擁有者，再寄確認信給送出者
///
/// 兩次寄送沒有交易保證；確認信失敗時整體回報失敗，但擁有者可能已收到通知。
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    composer: NoticeComposer,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, composer: NoticeComposer) -> Self {
        Self { mailer, composer }
    }

    pub async fn dispatch(&self, submission: &Submission) -> Result<()> {
        submission.validate()?;

        let owner_notice = self.composer.owner_notice(submission, Utc::now());
        let acknowledgment = self.composer.acknowledgment(submission);

        tracing::info!("📨 Sending contact notice to {}", self.composer.owner_email());
        self.mailer.send(&owner_notice).await?;

        tracing::info!("📨 Sending acknowledgment to submitter");
        if let Err(e) = self.mailer.send(&acknowledgment).await {
            tracing::warn!("Owner notice was delivered but the acknowledgment failed");
            return Err(e);
        }

        tracing::info!("✅ Contact submission dispatched");
        Ok(())
    }
}
