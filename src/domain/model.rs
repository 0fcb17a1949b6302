use serde::{Deserialize, Serialize};

/// 反機器人評估所宣告的動作名稱
pub const EXPECTED_ACTION: &str = "submit_contact";

/// 分數嚴格大於此值才視為真人
pub const TRUST_THRESHOLD: f64 = 0.5;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_EMAIL_LENGTH: usize = 320;
pub const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// 送往評估服務的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentEvent {
    pub token: String,
    pub site_key: String,
    pub expected_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProperties {
    #[serde(default)]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

/// 評估服務回傳的結果（只保留會用到的欄位）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub token_properties: Option<TokenProperties>,
    #[serde(default)]
    pub risk_analysis: Option<RiskAnalysis>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub valid: bool,
    pub action_matches: bool,
    pub risk_score: f64,
    pub is_trusted: bool,
}

/// 信件類型，對應郵件服務的 category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    OwnerNotification,
    SubmitterAcknowledgment,
}

impl NoticeKind {
    pub fn category(&self) -> &'static str {
        match self {
            NoticeKind::OwnerNotification => "Contact Form Admin",
            NoticeKind::SubmitterAcknowledgment => "Contact Form Confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// `/api/verify-recaptcha` 的回應
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_human: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_properties: Option<TokenProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_analysis: Option<RiskAnalysis>,
}

impl VerifyResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// 成功且分數過門檻
    pub fn is_trusted(&self) -> bool {
        self.success && self.is_human == Some(true)
    }
}

/// `/api/send-email` 與 `/api/contact` 的回應
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
