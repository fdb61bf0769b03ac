use axum::routing::get;
use axum::Router;

use crate::handlers::setup;
use crate::state::AppState;

/// Routes mounted at `/setup`. Public.
///
/// ```text
/// GET    /                  -> setup_status
/// POST   /                  -> run_setup
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(setup::setup_status).post(setup::run_setup))
}
