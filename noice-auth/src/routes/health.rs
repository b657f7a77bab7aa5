use axum::Json;

use noice_shared::types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("noice-auth", env!("CARGO_PKG_VERSION")))
}
