pub mod auth;
pub mod contents;
pub mod forms;
pub mod genders;
pub mod health;
pub mod setup;
pub mod tags;
pub mod tracks;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                                              login (public)
///
/// /setup                                                   status, bootstrap (public)
///
/// /tracks                                                  list, create
/// /tracks/{id}                                             get, update, soft delete
/// /tracks/{track_id}/sections/reorder                      reorder sections
/// /tracks/{track_id}/sections/{section_id}/content/{id}    append content
/// /tracks/{track_id}/sections/{section_id}/form/{id}       append form
/// /tracks/{track_id}/sections/{section_id}/sequences/reorder   reorder sequences
/// /tracks/{track_id}/sections/{section_id}/sequences/{id}  remove sequence
///
/// /tags                                                    list, create
/// /tags/{id}                                               get, update, delete (admin)
///
/// /genders                                                 list (public), create (admin)
/// /genders/{id}                                            get, update, delete (admin)
///
/// /contents                                                list, create
/// /contents/{id}                                           get, update, soft delete
///
/// /forms                                                   list, create
/// /forms/{id}                                              get, update, soft delete
///
/// /users                                                   list, create (admin)
/// /users/{id}                                              get, update, deactivate (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/setup", setup::router())
        .nest("/tracks", tracks::router())
        .nest("/tags", tags::router())
        .nest("/genders", genders::router())
        .nest("/contents", contents::router())
        .nest("/forms", forms::router())
        .nest("/users", users::router())
}
