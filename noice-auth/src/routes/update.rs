use axum::extract::State;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use noice_shared::errors::{AppError, AppResult, ErrorCode};
use noice_shared::types::auth::AuthUser;
use noice_shared::types::ApiResponse;

use crate::models::{User, UserChanges};
use crate::schema::users;
use crate::services::auth_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "Name must contain at least 2 characters"))]
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserPayload {
    pub user: User,
}

pub async fn update_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UpdatedUserPayload>>> {
    req.validate()?;

    // The gate applies no matter which fields are changing.
    let current_password = req
        .current_password
        .ok_or_else(|| AppError::new(ErrorCode::BadRequest, "Current password is required."))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let stored: User = users::table
        .find(user.id)
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::NotFound, "User not found."))?;

    let matches = auth_service::verify_password(&current_password, &stored.password_hash)?;
    if !matches {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "Incorrect current password."));
    }

    // Absent fields stay untouched; present ones overwrite.
    let changes = UserChanges {
        name: req.name,
        avatar: req.avatar,
        password_hash: req
            .password
            .as_deref()
            .map(auth_service::hash_password)
            .transpose()?,
        updated_at: Utc::now(),
    };

    let updated: User = diesel::update(users::table.find(user.id))
        .set(&changes)
        .get_result(&mut conn)?;

    tracing::info!(user_id = %updated.id, "user updated");

    Ok(Json(ApiResponse::with_payload(
        "User updated successfully.",
        UpdatedUserPayload { user: updated },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_not_validated() {
        let req = UpdateUserRequest {
            name: None,
            avatar: Some("https://cdn.noice.app/a.png".into()),
            password: None,
            current_password: Some("secret1".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn present_name_is_validated() {
        let req = UpdateUserRequest {
            name: Some("A".into()),
            avatar: None,
            password: None,
            current_password: Some("secret1".into()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn current_password_field_is_camel_case() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"currentPassword":"secret1"}"#).unwrap();
        assert_eq!(req.current_password.as_deref(), Some("secret1"));
        assert!(req.name.is_none());
    }
}
