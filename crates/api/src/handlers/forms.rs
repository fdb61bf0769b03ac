//! Handlers for `/forms`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use trilha_core::error::CoreError;
use trilha_core::types::DbId;
use trilha_db::models::form::{CreateForm, UpdateForm};
use trilha_db::repositories::FormRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::auth::AuthUser;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_form_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Form title must not be empty".into()));
    }
    Ok(())
}

/// GET /api/v1/forms
pub async fn list_forms(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let forms = FormRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    _auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/forms
pub async fn create_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateForm>,
) -> AppResult<impl IntoResponse> {
    validate_form_title(&input.title)?;

    let form = FormRepo::create(&state.pool, &input).await?;

    tracing::info!(form_id = form.id, user_id = auth.user_id, "Form created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// PUT /api/v1/forms/{id}
pub async fn update_form(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateForm>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_form_title(title)?;
    }

    let form = FormRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;

    tracing::info!(form_id = id, user_id = auth.user_id, "Form updated");

    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/forms/{id}
///
/// Soft delete. Sequences keep pointing at the form.
pub async fn delete_form(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FormRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Form", id }));
    }

    tracing::info!(form_id = id, user_id = auth.user_id, "Form deactivated");

    Ok(StatusCode::NO_CONTENT)
}
