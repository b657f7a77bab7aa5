use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::ApiResponse;

use crate::schema::users;
use crate::services::auth_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    #[serde(rename = "newPassword")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    req.validate()?;

    let email = req.email.to_lowercase();
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let new_hash = auth_service::hash_password(&req.new_password)?;

    // Matching and consuming the code is one atomic statement, so a code
    // can never be spent twice: wrong, expired, consumed, and unknown all
    // fall out as zero rows.
    let updated = diesel::update(
        users::table
            .filter(users::email.eq(&email))
            .filter(users::reset_code.eq(&req.otp))
            .filter(users::reset_code_expires_at.gt(Utc::now())),
    )
    .set((
        users::password_hash.eq(new_hash),
        users::reset_code.eq(None::<String>),
        users::reset_code_expires_at.eq(None::<DateTime<Utc>>),
        users::updated_at.eq(Utc::now()),
    ))
    .execute(&mut conn)?;

    if updated == 0 {
        return Err(AppError::new(ErrorCode::ResetCodeInvalid, "Invalid or expired OTP"));
    }

    tracing::info!(email = %email, "password reset");

    Ok(Json(ApiResponse::message("Password reset successful")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_password_must_be_six_chars() {
        let req = ResetPasswordRequest {
            email: "a@x.com".into(),
            otp: "482913".into(),
            new_password: "short".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn camel_case_field_deserializes() {
        let req: ResetPasswordRequest = serde_json::from_str(
            r#"{"email":"a@x.com","otp":"482913","newPassword":"newpass1"}"#,
        )
        .unwrap();
        assert_eq!(req.new_password, "newpass1");
    }
}
