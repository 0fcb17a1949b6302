use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::{ContactFlow, ContactOutcome, DispatchResponse, Submission, VerifyResponse};
use crate::server::state::AppState;
use crate::utils::error::{ContactError, ErrorCategory};
use crate::utils::validation::Validate;

const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub token: String,
    #[serde(flatten)]
    pub submission: Submission,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn status_for(error: &ContactError) -> StatusCode {
    match error.category() {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn dispatch_failure(error: &ContactError) -> (StatusCode, Json<DispatchResponse>) {
    (
        status_for(error),
        Json(DispatchResponse::failure(error.user_friendly_message())),
    )
}

fn malformed(
    rejection: JsonRejection,
    status: StatusCode,
) -> (StatusCode, Json<DispatchResponse>) {
    tracing::warn!("Rejected malformed request body: {}", rejection.body_text());
    (status, Json(DispatchResponse::failure(INVALID_BODY)))
}

/// 永遠回 200，失敗寫在 body 裡
pub async fn verify_handler(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Json<VerifyResponse> {
    match payload {
        Ok(Json(request)) => Json(state.gate.verify(&request.token).await),
        Err(rejection) => {
            tracing::warn!("Rejected malformed verification body: {}", rejection.body_text());
            Json(VerifyResponse::failure(INVALID_BODY))
        }
    }
}

/// 任何失敗都回 500，包含無法解析的 body 與欄位驗證錯誤
pub async fn send_email_handler(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> (StatusCode, Json<DispatchResponse>) {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return malformed(rejection, StatusCode::INTERNAL_SERVER_ERROR),
    };

    match state.dispatcher.dispatch(&submission).await {
        Ok(()) => (StatusCode::OK, Json(DispatchResponse::ok())),
        Err(e) => {
            tracing::error!("❌ Email sending error: {} (Category: {:?})", e, e.category());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DispatchResponse::failure(e.user_friendly_message())),
            )
        }
    }
}

/// 在伺服器端跑完整的驗證 → 派送流程；輸入錯誤回 400
pub async fn contact_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> (StatusCode, Json<DispatchResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed(rejection, StatusCode::BAD_REQUEST),
    };

    // 欄位有誤時不消耗一次性的 token
    if let Err(e) = request.submission.validate() {
        return dispatch_failure(&e);
    }

    let outcome = ContactFlow::new(&state.gate, &state.dispatcher)
        .run(&request.token, &request.submission)
        .await;

    let status = match &outcome {
        ContactOutcome::DispatchFailed(e) => status_for(e),
        _ => StatusCode::OK,
    };
    (status, Json(outcome.to_response()))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
