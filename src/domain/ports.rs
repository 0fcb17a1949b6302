use crate::domain::model::{Assessment, AssessmentEvent, Notice};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 風險評估服務（reCAPTCHA Enterprise）
#[async_trait]
pub trait Assessor: Send + Sync {
    async fn create_assessment(&self, event: &AssessmentEvent) -> Result<Assessment>;
}

/// 交易型郵件服務（Mailtrap）
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<()>;
}
