use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::ApiResponse;

use crate::models::NewPendingRegistration;
use crate::schema::{pending_registrations, users};
use crate::services::auth_service;
use crate::AppState;

/// A pending registration stops matching this long after submission.
const REGISTRATION_TTL_SECS: i64 = 300;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must contain at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email try again"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    req.validate()?;

    let email = req.email.to_lowercase();
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = users::table
        .filter(users::email.eq(&email))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if exists {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "User already registered."));
    }

    let password_hash = auth_service::hash_password(&req.password)?;
    let code = auth_service::generate_otp();
    let now = Utc::now();

    let pending = NewPendingRegistration {
        email: email.clone(),
        code: code.clone(),
        name: req.name,
        password_hash,
        expires_at: now + Duration::seconds(REGISTRATION_TTL_SECS),
    };

    // At most one live pending registration per email: drop any previous
    // attempt (and expired leftovers) before inserting the fresh one.
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(
            pending_registrations::table.filter(
                pending_registrations::email
                    .eq(&email)
                    .or(pending_registrations::expires_at.le(now)),
            ),
        )
        .execute(conn)?;

        diesel::insert_into(pending_registrations::table)
            .values(&pending)
            .execute(conn)?;

        Ok(())
    })?;

    // Delivery is awaited; a mail failure must not acknowledge the
    // submission. The stored code stays behind for a retry until the TTL
    // reaps it.
    state.email.send_otp_email(&email, &code).await.map_err(|e| {
        tracing::error!(error = %e, "failed to send verification email");
        AppError::new(
            ErrorCode::EmailDeliveryFailed,
            "Failed to send OTP email. Please try again.",
        )
    })?;

    tracing::info!(email = %email, "registration submitted, OTP sent");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(
            "OTP sent to email. Please verify to complete registration.",
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(request("Ann", "a@x.com", "secret1").validate().is_ok());
    }

    #[test]
    fn rejects_short_name() {
        assert!(request("A", "a@x.com", "secret1").validate().is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(request("Ann", "not-an-email", "secret1").validate().is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(request("Ann", "a@x.com", "five5").validate().is_err());
    }
}
