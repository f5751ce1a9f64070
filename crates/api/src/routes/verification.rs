//! Public email verification routes.

use axum::{Json, Router, extract::State, routing::post};
use ledgerly_shared::auth::{ResendVerificationRequest, VerificationResponse, VerifyCodeRequest};

use crate::{ApiJson, ApiResult, AppState};

/// Creates the verification router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/verification/resend", post(resend))
        .route("/auth/verification/verify", post(verify))
}

/// POST `/auth/verification/resend` - Issue and email a fresh code.
async fn resend(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResendVerificationRequest>,
) -> ApiResult<Json<VerificationResponse>> {
    state.verification.resend(&payload.email).await?;
    Ok(Json(VerificationResponse {
        message: "Verification code sent".to_string(),
        verified: false,
    }))
}

/// POST `/auth/verification/verify` - Accept a code.
async fn verify(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<VerifyCodeRequest>,
) -> ApiResult<Json<VerificationResponse>> {
    state
        .verification
        .verify(&payload.email, &payload.code)
        .await?;
    Ok(Json(VerificationResponse {
        message: "Email verified successfully".to_string(),
        verified: true,
    }))
}
