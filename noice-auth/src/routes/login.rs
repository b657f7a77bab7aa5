use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::auth::PublicUser;
use noice_shared::types::ApiResponse;

use crate::models::User;
use crate::schema::users;
use crate::services::{auth_service, token_service};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email try again"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub user: PublicUser,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginPayload>>)> {
    req.validate()?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Identical failure for unknown email and wrong password.
    let user: User = users::table
        .filter(users::email.eq(req.email.to_lowercase()))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::InvalidCredentials, "Invalid email or password."))?;

    let valid = auth_service::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "Invalid email or password."));
    }

    let token = token_service::create_session_token(
        user.id,
        &state.config.jwt_secret,
        state.config.session_ttl,
    )?;
    let cookie = token_service::session_cookie(
        token,
        state.config.session_ttl,
        state.config.is_production(),
    );

    tracing::info!(user_id = %user.id, "user logged in");

    Ok((
        jar.add(cookie),
        Json(ApiResponse::with_payload(
            "Login successful.",
            LoginPayload {
                user: PublicUser {
                    name: user.name,
                    email: user.email,
                },
            },
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_rejected() {
        let req = LoginRequest {
            email: "a@x.com".into(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_payload_wire_shape() {
        let response = ApiResponse::with_payload(
            "Login successful.",
            LoginPayload {
                user: PublicUser {
                    name: "Ann".into(),
                    email: "a@x.com".into(),
                },
            },
        );
        let value = serde_json::to_value(response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["user"]["name"], "Ann");
        assert_eq!(value["user"]["email"], "a@x.com");
        assert!(value["user"].get("passwordHash").is_none());
    }
}
