//! Route definitions for tracks and their nested sections and sequences.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::tracks;
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET    /                                                    -> list_tracks
/// POST   /                                                    -> create_track
/// GET    /{id}                                                -> get_track
/// PUT    /{id}                                                -> update_track
/// DELETE /{id}                                                -> delete_track (soft)
/// POST   /{track_id}/sections/{section_id}/content/{content_id} -> add_content_to_section
/// POST   /{track_id}/sections/{section_id}/form/{form_id}       -> add_form_to_section
/// PUT    /{track_id}/sections/reorder                         -> reorder_sections
/// PUT    /{track_id}/sections/{section_id}/sequences/reorder  -> reorder_sequences
/// DELETE /{track_id}/sections/{section_id}/sequences/{sequence_id} -> remove_sequence
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tracks::list_tracks).post(tracks::create_track))
        .route(
            "/{id}",
            get(tracks::get_track)
                .put(tracks::update_track)
                .delete(tracks::delete_track),
        )
        .route(
            "/{track_id}/sections/{section_id}/content/{content_id}",
            post(tracks::add_content_to_section),
        )
        .route(
            "/{track_id}/sections/{section_id}/form/{form_id}",
            post(tracks::add_form_to_section),
        )
        .route(
            "/{track_id}/sections/reorder",
            put(tracks::reorder_sections),
        )
        .route(
            "/{track_id}/sections/{section_id}/sequences/reorder",
            put(tracks::reorder_sequences),
        )
        .route(
            "/{track_id}/sections/{section_id}/sequences/{sequence_id}",
            delete(tracks::remove_sequence),
        )
}
