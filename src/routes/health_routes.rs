use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::repositories::Store;
use crate::state::AppState;

pub fn create_health_router<S: Store>() -> Router<AppState<S>> {
    Router::new().route("/health", get(health::<S>))
}

async fn health<S: Store>(State(state): State<AppState<S>>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok", "timestamp": timestamp })),
        ),
        Err(e) => {
            error!(error = %e, "❌ Health check: banco indisponível");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "error", "timestamp": timestamp })),
            )
        }
    }
}
