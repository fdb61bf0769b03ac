//! Handlers for `/tracks` and the nested section/sequence routes.
//!
//! Handlers parse the boundary and log; the tree logic lives in
//! [`crate::services::hierarchy`].

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use trilha_core::hierarchy::SequenceTarget;
use trilha_core::types::DbId;
use trilha_db::models::track::{CreateTrack, ReorderSections, ReorderSequences, UpdateTrack};
use trilha_db::repositories::TrackRepo;

use crate::error::AppResult;
use crate::extract::ValidPath;
use crate::middleware::auth::AuthUser;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::services::hierarchy;
use crate::state::AppState;

/// GET /api/v1/tracks
pub async fn list_tracks(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let tracks = TrackRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// POST /api/v1/tracks
///
/// Create a track together with its sections and sequences.
pub async fn create_track(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTrack>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::create_track(&state.pool, &input, auth.user_id).await?;

    tracing::info!(
        track_id = track.track.id,
        sections = track.sections.len(),
        user_id = auth.user_id,
        "Track created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// GET /api/v1/tracks/{id}
pub async fn get_track(
    _auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::get_track(&state.pool, id).await?;
    Ok(Json(DataResponse { data: track }))
}

/// PUT /api/v1/tracks/{id}
///
/// A `sections` list in the body replaces the whole subtree.
pub async fn update_track(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    let replaced = input.sections.is_some();
    let track = hierarchy::update_track(&state.pool, id, &input).await?;

    tracing::info!(track_id = id, replaced, user_id = auth.user_id, "Track updated");

    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/tracks/{id}
///
/// Soft delete.
pub async fn delete_track(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    hierarchy::deactivate_track(&state.pool, id).await?;

    tracing::info!(track_id = id, user_id = auth.user_id, "Track deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tracks/{track_id}/sections/{section_id}/content/{content_id}
pub async fn add_content_to_section(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath((track_id, section_id, content_id)): ValidPath<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::append_sequence(
        &state.pool,
        track_id,
        section_id,
        SequenceTarget::Content(content_id),
    )
    .await?;

    tracing::info!(
        track_id,
        section_id,
        content_id,
        user_id = auth.user_id,
        "Content appended to section",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// POST /api/v1/tracks/{track_id}/sections/{section_id}/form/{form_id}
pub async fn add_form_to_section(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath((track_id, section_id, form_id)): ValidPath<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::append_sequence(
        &state.pool,
        track_id,
        section_id,
        SequenceTarget::Form(form_id),
    )
    .await?;

    tracing::info!(
        track_id,
        section_id,
        form_id,
        user_id = auth.user_id,
        "Form appended to section",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// PUT /api/v1/tracks/{track_id}/sections/reorder
pub async fn reorder_sections(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(track_id): ValidPath<DbId>,
    Json(input): Json<ReorderSections>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::reorder_sections(&state.pool, track_id, &input.sections).await?;

    tracing::info!(
        track_id,
        count = input.sections.len(),
        user_id = auth.user_id,
        "Sections reordered",
    );

    Ok(Json(DataResponse { data: track }))
}

/// PUT /api/v1/tracks/{track_id}/sections/{section_id}/sequences/reorder
pub async fn reorder_sequences(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath((track_id, section_id)): ValidPath<(DbId, DbId)>,
    Json(input): Json<ReorderSequences>,
) -> AppResult<impl IntoResponse> {
    let track =
        hierarchy::reorder_sequences(&state.pool, track_id, section_id, &input.sequences).await?;

    tracing::info!(
        track_id,
        section_id,
        count = input.sequences.len(),
        user_id = auth.user_id,
        "Sequences reordered",
    );

    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/tracks/{track_id}/sections/{section_id}/sequences/{sequence_id}
///
/// Remaining sequences are renumbered densely.
pub async fn remove_sequence(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath((track_id, section_id, sequence_id)): ValidPath<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let track = hierarchy::remove_sequence(&state.pool, track_id, section_id, sequence_id).await?;

    tracing::info!(
        track_id,
        section_id,
        sequence_id,
        user_id = auth.user_id,
        "Sequence removed",
    );

    Ok(Json(DataResponse { data: track }))
}
