//! # Passcode Login Handlers
//!
//! Email one-time-passcode flow: `/send-otp` generates a six-digit code,
//! stores it with a TTL, and mails it; `/verify-otp` consumes the stored
//! code (single use) and compares it with the submitted one.

use crate::{errors::AppError, state::AppState};
use anyhow::anyhow;
use axum::{extract::State, Json};
use dopamine::otp::generate_code;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

/// Codes stay valid for five minutes.
const OTP_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

/// The handler for the `/send-otp` endpoint.
pub async fn send_otp_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    let mailer = app_state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow!("mail transport is not configured")))?;

    let code = generate_code();
    app_state.otp_store.put(&payload.email, &code, OTP_TTL).await;
    info!(email = %payload.email, "Generated login code");

    if let Err(e) = mailer.send_login_code(&payload.email, &code).await {
        error!("Failed to send email: {e:?}");
        return Err(AppError::Internal(anyhow!("Failed to send OTP email.")));
    }

    Ok(Json(json!({ "message": "OTP sent successfully!" })))
}

/// The handler for the `/verify-otp` endpoint.
pub async fn verify_otp_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.email.is_empty() || payload.otp.is_empty() {
        return Err(AppError::BadRequest(
            "Email and OTP are required".to_string(),
        ));
    }

    // `take` consumes the entry, so a correct code can be used only once and
    // a wrong guess forces a fresh code.
    match app_state.otp_store.take(&payload.email).await {
        Some(stored) if stored == payload.otp => {
            info!(email = %payload.email, "Login successful");
            Ok(Json(json!({ "message": "Login successful!" })))
        }
        _ => Err(AppError::Unauthorized("Invalid or expired OTP".to_string())),
    }
}
