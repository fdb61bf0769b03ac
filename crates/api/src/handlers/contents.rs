//! Handlers for `/contents`.
//!
//! Contents carry a tag set. A `tags` list on create or update must name
//! existing tags and replaces the whole set.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use trilha_core::content::{resolve_slug, validate_slug, validate_title, CONTENT_SLUG_CONFLICT};
use trilha_core::error::CoreError;
use trilha_core::types::DbId;
use trilha_db::models::content::{CreateContent, UpdateContent};
use trilha_db::repositories::{ContentRepo, TagRepo};

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::auth::AuthUser;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/contents
pub async fn list_contents(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let contents = ContentRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: contents }))
}

/// GET /api/v1/contents/{id}
pub async fn get_content(
    _auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let content = ContentRepo::find_with_tags(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Content", id }))?;
    Ok(Json(DataResponse { data: content }))
}

/// POST /api/v1/contents
///
/// The slug defaults to one derived from the title.
pub async fn create_content(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateContent>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;
    ensure_tags_exist(&state.pool, &input.tags).await?;

    let content = ContentRepo::create(&state.pool, &input, &slug)
        .await
        .map_err(|e| conflict_on_unique(e, CONTENT_SLUG_CONFLICT))?;

    tracing::info!(
        content_id = content.content.id,
        slug = %content.content.slug,
        tags = content.tags.len(),
        user_id = auth.user_id,
        "Content created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: content })))
}

/// PUT /api/v1/contents/{id}
pub async fn update_content(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateContent>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    let slug = input.slug.as_deref().map(str::trim).map(str::to_string);
    if let Some(slug) = &slug {
        validate_slug(slug)?;
    }
    if let Some(tags) = &input.tags {
        ensure_tags_exist(&state.pool, tags).await?;
    }
    let input = UpdateContent { slug, ..input };

    let content = ContentRepo::update(&state.pool, id, &input)
        .await
        .map_err(|e| conflict_on_unique(e, CONTENT_SLUG_CONFLICT))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Content", id }))?;

    tracing::info!(content_id = id, user_id = auth.user_id, "Content updated");

    Ok(Json(DataResponse { data: content }))
}

/// DELETE /api/v1/contents/{id}
///
/// Soft delete.
pub async fn delete_content(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ContentRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Content", id }));
    }

    tracing::info!(content_id = id, user_id = auth.user_id, "Content deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// Every id in `tag_ids` must name an existing tag.
async fn ensure_tags_exist(pool: &PgPool, tag_ids: &[DbId]) -> AppResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let found: Vec<DbId> = TagRepo::find_many(pool, tag_ids)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    match tag_ids.iter().find(|id| !found.contains(id)) {
        Some(&missing) => Err(AppError::Core(CoreError::Validation(format!(
            "Tag {missing} does not exist"
        )))),
        None => Ok(()),
    }
}
