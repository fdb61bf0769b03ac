//! Handlers for `/setup`. Both routes are public.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::setup::{self, SetupRequest};
use crate::state::AppState;

/// GET /api/v1/setup
pub async fn setup_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let status = setup::status(&state.pool).await?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/setup
///
/// Bootstrap the platform. A second call is a 409.
pub async fn run_setup(
    State(state): State<AppState>,
    Json(input): Json<SetupRequest>,
) -> AppResult<impl IntoResponse> {
    let result = setup::run(&state.pool, &input, state.config.password_min_length).await?;

    tracing::info!(
        user_id = result.user.id,
        context_id = result.context.id,
        "Platform setup completed",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}
