use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use serde::Deserialize;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::ApiResponse;

use crate::models::User;
use crate::schema::users;
use crate::services::auth_service;
use crate::AppState;

/// Reset codes outlive registration codes; they sit inline on the account.
const RESET_CODE_TTL_SECS: i64 = 600;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let email = req.email.to_lowercase();
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .filter(users::email.eq(&email))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::NotFound, "Email not found"))?;

    let code = auth_service::generate_otp();

    // A repeat request overwrites the previous code; nothing stacks.
    diesel::update(users::table.filter(users::id.eq(user.id)))
        .set((
            users::reset_code.eq(Some(code.clone())),
            users::reset_code_expires_at.eq(Some(Utc::now() + Duration::seconds(RESET_CODE_TTL_SECS))),
        ))
        .execute(&mut conn)?;

    state.email.send_otp_email(&user.email, &code).await.map_err(|e| {
        tracing::error!(error = %e, "failed to send reset email");
        AppError::new(
            ErrorCode::EmailDeliveryFailed,
            "Failed to send OTP email. Please try again.",
        )
    })?;

    tracing::info!(user_id = %user.id, "password reset requested");

    Ok(Json(ApiResponse::message("OTP sent to your email")))
}
