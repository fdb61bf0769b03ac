//! Handlers for `/tags`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use trilha_core::error::CoreError;
use trilha_core::tag::{normalize_tag_name, validate_color, TAG_NAME_CONFLICT};
use trilha_core::types::DbId;
use trilha_db::models::tag::{CreateTag, UpdateTag};
use trilha_db::repositories::TagRepo;

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
    Ok(Json(DataResponse { data: tag }))
}

/// POST /api/v1/tags
///
/// A duplicate name is a 409 with a user-facing message.
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    let input = CreateTag {
        name: normalize_tag_name(&input.name)?,
        ..input
    };
    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    let tag = TagRepo::create(&state.pool, &input)
        .await
        .map_err(|e| conflict_on_unique(e, TAG_NAME_CONFLICT))?;

    tracing::info!(tag_id = tag.id, user_id = auth.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// PUT /api/v1/tags/{id}
pub async fn update_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    let input = UpdateTag {
        name: input.name.as_deref().map(normalize_tag_name).transpose()?,
        ..input
    };
    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    let tag = TagRepo::update(&state.pool, id, &input)
        .await
        .map_err(|e| conflict_on_unique(e, TAG_NAME_CONFLICT))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;

    tracing::info!(tag_id = id, user_id = auth.user_id, "Tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
///
/// Hard delete, removing the tag from every content. Admin only.
pub async fn delete_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tag", id }));
    }

    tracing::info!(tag_id = id, user_id = admin.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
