use crate::core::dispatch::NotificationDispatcher;
use crate::core::verification::VerificationGate;
use crate::domain::model::{DispatchResponse, Submission, VerifyResponse};
use crate::utils::error::ContactError;

/// 分數不足但驗證本身成功時回給使用者的訊息
pub const UNTRUSTED_SUBMISSION: &str = "reCAPTCHA verification failed";

#[derive(Debug)]
pub enum ContactOutcome {
    Submitted,
    /// 驗證未通過，派送從未開始
    Rejected(VerifyResponse),
    DispatchFailed(ContactError),
}

impl ContactOutcome {
    /// 轉成表單顯示用的結構化回應
    pub fn to_response(&self) -> DispatchResponse {
        match self {
            ContactOutcome::Submitted => DispatchResponse::ok(),
            ContactOutcome::Rejected(verification) => DispatchResponse::failure(
                verification
                    .error
                    .clone()
                    .unwrap_or_else(|| UNTRUSTED_SUBMISSION.to_string()),
            ),
            ContactOutcome::DispatchFailed(e) => {
                DispatchResponse::failure(e.user_friendly_message())
            }
        }
    }
}

/// 聯絡表單流程：驗證 → 派送，嚴格依序，不重試
pub struct ContactFlow<'a> {
    gate: &'a VerificationGate,
    dispatcher: &'a NotificationDispatcher,
}

impl<'a> ContactFlow<'a> {
    pub fn new(gate: &'a VerificationGate, dispatcher: &'a NotificationDispatcher) -> Self {
        Self { gate, dispatcher }
    }

    pub async fn run(&self, token: &str, submission: &Submission) -> ContactOutcome {
        let verification = self.gate.verify(token).await;
        if !verification.is_trusted() {
            tracing::info!("Contact submission rejected: {:?}", verification.error);
            return ContactOutcome::Rejected(verification);
        }

        match self.dispatcher.dispatch(submission).await {
            Ok(()) => ContactOutcome::Submitted,
            Err(e) => {
                tracing::error!("❌ Contact dispatch failed: {} (Category: {:?})", e, e.category());
                ContactOutcome::DispatchFailed(e)
            }
        }
    }
}
