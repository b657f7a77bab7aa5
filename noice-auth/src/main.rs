use axum::extract::FromRef;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use noice_shared::clients::db::{create_pool, DbPool};
use noice_shared::clients::email::EmailClient;
use noice_shared::middleware::SessionKeys;

/// Cheap to clone: the pool is reference-counted and the rest is small.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub email: EmailClient,
    pub session_keys: SessionKeys,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    noice_shared::middleware::init_tracing("noice-auth");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;
    let email = EmailClient::new(&config.resend_api_key, &config.from_email, "Noice");
    let session_keys = SessionKeys::new(&config.jwt_secret);

    let state = AppState { db, config, email, session_keys };

    let auth_routes = Router::new()
        .route("/register", post(routes::register::register))
        .route("/verify-otp", post(routes::verify_otp::verify_otp))
        .route("/login", post(routes::login::login))
        .route("/logout", post(routes::logout::logout))
        .route("/forgot-password", post(routes::forgot_password::forgot_password))
        .route("/reset-password", post(routes::reset_password::reset_password))
        .route("/update", put(routes::update::update_user));

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "noice-auth starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
