use axum::Json;
use axum_extra::extract::CookieJar;

use noice_shared::types::ApiResponse;

use crate::services::token_service;

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    (
        jar.add(token_service::removal_cookie()),
        Json(ApiResponse::message("Logged out.")),
    )
}
