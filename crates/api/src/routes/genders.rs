use axum::routing::get;
use axum::Router;

use crate::handlers::genders;
use crate::state::AppState;

/// Routes mounted at `/genders`.
///
/// ```text
/// GET    /                  -> list_genders (public, active only)
/// POST   /                  -> create_gender (admin)
/// GET    /{id}              -> get_gender (admin)
/// PUT    /{id}              -> update_gender (admin)
/// DELETE /{id}              -> delete_gender (admin, 412 while referenced)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(genders::list_genders).post(genders::create_gender),
        )
        .route(
            "/{id}",
            get(genders::get_gender)
                .put(genders::update_gender)
                .delete(genders::delete_gender),
        )
}
