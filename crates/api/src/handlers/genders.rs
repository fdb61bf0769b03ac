//! Handlers for `/genders`.
//!
//! Listing active genders is public (sign-up forms need it); everything
//! else is admin only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use trilha_core::error::CoreError;
use trilha_core::gender::{ensure_deletable, normalize_gender_name, GENDER_NAME_CONFLICT};
use trilha_core::types::DbId;
use trilha_db::models::gender::{CreateGender, UpdateGender};
use trilha_db::repositories::GenderRepo;

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/genders
///
/// Active genders only. No authentication.
pub async fn list_genders(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let genders = GenderRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: genders }))
}

/// GET /api/v1/genders/{id}
pub async fn get_gender(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let gender = GenderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Gender", id }))?;
    Ok(Json(DataResponse { data: gender }))
}

/// POST /api/v1/genders
pub async fn create_gender(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGender>,
) -> AppResult<impl IntoResponse> {
    let input = CreateGender {
        name: normalize_gender_name(&input.name)?,
        ..input
    };

    let gender = GenderRepo::create(&state.pool, &input)
        .await
        .map_err(|e| conflict_on_unique(e, GENDER_NAME_CONFLICT))?;

    tracing::info!(gender_id = gender.id, user_id = admin.user_id, "Gender created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: gender })))
}

/// PUT /api/v1/genders/{id}
pub async fn update_gender(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateGender>,
) -> AppResult<impl IntoResponse> {
    let input = UpdateGender {
        name: input.name.as_deref().map(normalize_gender_name).transpose()?,
        ..input
    };

    let gender = GenderRepo::update(&state.pool, id, &input)
        .await
        .map_err(|e| conflict_on_unique(e, GENDER_NAME_CONFLICT))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Gender", id }))?;

    tracing::info!(gender_id = id, user_id = admin.user_id, "Gender updated");

    Ok(Json(DataResponse { data: gender }))
}

/// DELETE /api/v1/genders/{id}
///
/// Refused with 412 while any user references the gender.
pub async fn delete_gender(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;

    // The row lock holds off users being assigned this gender until the
    // delete commits.
    GenderRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Gender", id }))?;

    let user_count = GenderRepo::count_users(&mut *tx, id).await?;
    ensure_deletable(user_count)?;

    if !GenderRepo::delete(&mut *tx, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Gender", id }));
    }
    tx.commit().await?;

    tracing::info!(gender_id = id, user_id = admin.user_id, "Gender deleted");

    Ok(StatusCode::NO_CONTENT)
}
