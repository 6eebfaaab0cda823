//! Nextup HTTP API server.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::Duration;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use nextup_core::auth::TokenSigner;
use nextup_core::storage::{Config, TaskDb};

mod error;
mod handlers;
mod state;

use state::AppState;

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            put(handlers::tasks::update_task).delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/tasks/:id/complete",
            patch(handlers::tasks::complete_task),
        )
        .route(
            "/api/tasks/:id/uncomplete",
            patch(handlers::tasks::uncomplete_task),
        )
        .route("/api/tasks/recommend", post(handlers::tasks::recommend_task))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Nextup API is running" }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    let bind = std::env::var("NEXTUP_HTTP_BIND").unwrap_or(config.server.bind.clone());
    let addr: SocketAddr = bind.parse()?;

    let db = TaskDb::open()?;
    let signer = TokenSigner::load_or_create()?;
    let state = AppState::new(db, signer, Duration::days(config.server.token_ttl_days));

    let app = router(state);

    tracing::info!("nextup-server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
