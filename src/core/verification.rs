use crate::domain::model::{
    Assessment, AssessmentEvent, VerificationResult, VerifyResponse, EXPECTED_ACTION,
    TRUST_THRESHOLD,
};
use crate::domain::ports::Assessor;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

/// 對外只回報這段訊息，細節留在日誌
pub const VERIFICATION_FAILED: &str = "Failed to verify reCAPTCHA";

/// 分數嚴格大於門檻才算真人，0.5 本身不算
pub fn is_trusted(score: f64) -> bool {
    score > TRUST_THRESHOLD
}

/// 從評估結果推導驗證結果；沒有風險分析時分數視為 0
pub fn evaluate(assessment: &Assessment) -> VerificationResult {
    let props = assessment.token_properties.as_ref();
    let valid = props.map(|p| p.valid).unwrap_or(false);
    let action_matches = props
        .and_then(|p| p.action.as_deref())
        .map(|action| action == EXPECTED_ACTION)
        .unwrap_or(false);
    let risk_score = assessment
        .risk_analysis
        .as_ref()
        .map(|r| r.score)
        .unwrap_or(0.0);

    VerificationResult {
        valid,
        action_matches,
        risk_score,
        is_trusted: is_trusted(risk_score),
    }
}

fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(20).collect();
    format!("{}...", prefix)
}

/// 驗證閘道：所有失敗都轉成 `success: false` 的回應
pub struct VerificationGate {
    assessor: Arc<dyn Assessor>,
    site_key: Option<String>,
}

impl VerificationGate {
    pub fn new(assessor: Arc<dyn Assessor>, site_key: Option<String>) -> Self {
        Self { assessor, site_key }
    }

    pub async fn verify(&self, token: &str) -> VerifyResponse {
        match self.assess(token).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    "❌ reCAPTCHA verification error: {} (Category: {:?})",
                    e,
                    e.category()
                );
                tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                VerifyResponse::failure(VERIFICATION_FAILED)
            }
        }
    }

    async fn assess(&self, token: &str) -> Result<VerifyResponse> {
        if token.trim().is_empty() {
            tracing::warn!("Rejected verification request without a token");
            return Ok(VerifyResponse::failure("Invalid token: missing token"));
        }

        tracing::info!("Received token for verification: {}", token_preview(token));

        let site_key = validate_required_field("recaptcha.site_key", &self.site_key)?;
        let event = AssessmentEvent {
            token: token.to_string(),
            site_key: site_key.clone(),
            expected_action: EXPECTED_ACTION.to_string(),
        };

        let assessment = self.assessor.create_assessment(&event).await?;
        let result = evaluate(&assessment);

        if !result.valid {
            let reason = assessment
                .token_properties
                .as_ref()
                .and_then(|p| p.invalid_reason.clone())
                .unwrap_or_else(|| "unknown".to_string());
            tracing::warn!("Invalid token: {}", reason);
            return Ok(VerifyResponse::failure(format!("Invalid token: {}", reason)));
        }

        if !result.action_matches {
            tracing::warn!(
                "Action mismatch: expected {}, received {:?}",
                EXPECTED_ACTION,
                assessment
                    .token_properties
                    .as_ref()
                    .and_then(|p| p.action.as_deref())
            );
            return Ok(VerifyResponse::failure("Action mismatch"));
        }

        tracing::info!(
            "Assessment result: score={}, is_human={}",
            result.risk_score,
            result.is_trusted
        );

        Ok(VerifyResponse {
            success: true,
            score: Some(result.risk_score),
            is_human: Some(result.is_trusted),
            error: None,
            token_properties: assessment.token_properties,
            risk_analysis: assessment.risk_analysis,
        })
    }
}
