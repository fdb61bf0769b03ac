//! Admin-only user management under `/users`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use trilha_core::error::CoreError;
use trilha_core::roles::{validate_role, ROLE_ADMIN, ROLE_USER};
use trilha_core::setup::{normalize_email, validate_name, USER_EMAIL_CONFLICT};
use trilha_core::types::DbId;
use trilha_db::models::user::{CreateUser, UpdateUser, UserResponse};
use trilha_db::repositories::{GenderRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `"user"`.
    pub role: Option<String>,
    pub gender_id: Option<DbId>,
}

/// Body of `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub gender_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/users
pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users: Vec<UserResponse> = UserRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    let email = normalize_email(&input.email)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_role(&role)?;
    validate_password_strength(&input.password, state.config.password_min_length)?;
    ensure_gender_exists(&state.pool, input.gender_id).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            role,
            gender_id: input.gender_id,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, USER_EMAIL_CONFLICT))?;

    tracing::info!(
        created_user_id = user.id,
        role = %user.role,
        user_id = admin.user_id,
        "User created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// PUT /api/v1/users/{id}
///
/// Administrators cannot deactivate or demote themselves.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        if input.is_active == Some(false) {
            return Err(AppError::BadRequest("Cannot deactivate your own account".into()));
        }
        if input.role.as_deref().is_some_and(|role| role != ROLE_ADMIN) {
            return Err(AppError::BadRequest("Cannot change your own role".into()));
        }
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(role) = &input.role {
        validate_role(role)?;
    }
    let email = input.email.as_deref().map(normalize_email).transpose()?;
    ensure_gender_exists(&state.pool, input.gender_id).await?;

    let update = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        email,
        role: input.role,
        gender_id: input.gender_id,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await
        .map_err(|e| conflict_on_unique(e, USER_EMAIL_CONFLICT))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(updated_user_id = id, user_id = admin.user_id, "User updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft deactivate. Administrators cannot deactivate themselves.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        return Err(AppError::BadRequest("Cannot deactivate your own account".into()));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(deactivated_user_id = id, user_id = admin.user_id, "User deactivated");

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_gender_exists(pool: &PgPool, gender_id: Option<DbId>) -> AppResult<()> {
    let Some(id) = gender_id else {
        return Ok(());
    };
    GenderRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Gender", id }))?;
    Ok(())
}
