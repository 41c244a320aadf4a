//! `GET /health`: liveness plus a database round trip. Unauthenticated.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Health {
    /// `ok`, or `degraded` when the database did not answer.
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let db_healthy = bluetape_db::health_check(&state.pool)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Health check could not reach the database"))
        .is_ok();

    Json(Health {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
