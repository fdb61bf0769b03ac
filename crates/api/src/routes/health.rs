use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::services::setup;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The process is up but Postgres did not answer.
    Degraded,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether the one-shot setup has run. Absent while the database is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured: Option<bool>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = trilha_db::health_check(&state.pool).await.is_ok();
    let configured = if db_healthy {
        setup::status(&state.pool).await.ok().map(|s| s.configured)
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        configured,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
