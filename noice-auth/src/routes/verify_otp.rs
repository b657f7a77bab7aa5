use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::ApiResponse;

use crate::models::{NewUser, PendingRegistration};
use crate::schema::{pending_registrations, users};
use crate::services::token_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<VerifyOtpRequest>,
) -> AppResult<(CookieJar, (StatusCode, Json<ApiResponse<()>>))> {
    let (email, otp) = match (req.email, req.otp) {
        (Some(email), Some(otp)) => (email.to_lowercase(), otp),
        _ => {
            return Err(AppError::new(
                ErrorCode::ValidationError,
                "Email and OTP are required.",
            ))
        }
    };

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Expiry is part of the lookup: an expired row can never match.
    let pending: PendingRegistration = pending_registrations::table
        .filter(pending_registrations::email.eq(&email))
        .filter(pending_registrations::code.eq(&otp))
        .filter(pending_registrations::expires_at.gt(Utc::now()))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::VerificationCodeInvalid, "Invalid OTP or expired."))?;

    // The identity materializes only here; submit never writes to users.
    let pending_id = pending.id;
    let user_id: Uuid = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let new_user = NewUser {
            name: pending.name,
            email: pending.email,
            password_hash: pending.password_hash,
            provider: "local".to_string(),
            is_verified: true,
        };

        let id = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(users::id)
            .get_result(conn)?;

        diesel::delete(
            pending_registrations::table.filter(pending_registrations::id.eq(pending_id)),
        )
        .execute(conn)?;

        Ok(id)
    })?;

    let token = token_service::create_session_token(
        user_id,
        &state.config.jwt_secret,
        state.config.session_ttl,
    )?;
    let cookie = token_service::session_cookie(
        token,
        state.config.session_ttl,
        state.config.is_production(),
    );

    tracing::info!(user_id = %user_id, "registration verified");

    Ok((
        jar.add(cookie),
        (StatusCode::CREATED, Json(ApiResponse::message("Registration complete."))),
    ))
}
