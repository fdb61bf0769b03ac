use axum::routing::get;
use axum::Router;

use crate::handlers::contents;
use crate::state::AppState;

/// Routes mounted at `/contents`.
///
/// ```text
/// GET    /                  -> list_contents
/// POST   /                  -> create_content
/// GET    /{id}              -> get_content
/// PUT    /{id}              -> update_content
/// DELETE /{id}              -> delete_content (soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contents::list_contents).post(contents::create_content),
        )
        .route(
            "/{id}",
            get(contents::get_content)
                .put(contents::update_content)
                .delete(contents::delete_content),
        )
}
