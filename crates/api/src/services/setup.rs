//! One-time platform bootstrap.
//!
//! Setup creates the first administrator, the default context and the link
//! making the administrator its manager. It runs once: the presence of a
//! default context marks the platform as configured.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use trilha_core::error::CoreError;
use trilha_core::roles::ROLE_ADMIN;
use trilha_core::setup::{
    normalize_email, validate_name, DEFAULT_CONTEXT_NAME, SETUP_ALREADY_DONE, USER_EMAIL_CONFLICT,
};
use trilha_core::types::DbId;
use trilha_db::models::context::Context;
use trilha_db::models::user::{CreateUser, UserResponse};
use trilha_db::repositories::{ContextRepo, GenderRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{conflict_on_unique, AppError, AppResult};

/// Body of `POST /setup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender_id: Option<DbId>,
    /// Defaults to [`DEFAULT_CONTEXT_NAME`].
    pub context_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetupResult {
    pub user: UserResponse,
    pub context: Context,
}

#[derive(Debug, Serialize)]
pub struct SetupStatus {
    pub configured: bool,
}

/// Whether setup has already run.
pub async fn status(pool: &PgPool) -> AppResult<SetupStatus> {
    let configured = ContextRepo::find_default(pool).await?.is_some();
    Ok(SetupStatus { configured })
}

/// Create the administrator, the default context and the manager link in
/// one transaction.
pub async fn run(
    pool: &PgPool,
    input: &SetupRequest,
    password_min_length: usize,
) -> AppResult<SetupResult> {
    validate_name("name", &input.name)?;
    let email = normalize_email(&input.email)?;
    validate_password_strength(&input.password, password_min_length)?;
    let context_name = match input.context_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_CONTEXT_NAME.to_string(),
    };

    if let Some(gender_id) = input.gender_id {
        GenderRepo::find_by_id(pool, gender_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Gender",
                id: gender_id,
            })?;
    }

    let mut tx = pool.begin().await?;

    if ContextRepo::find_default(&mut *tx).await?.is_some() {
        return Err(CoreError::Conflict(SETUP_ALREADY_DONE.into()).into());
    }
    if UserRepo::find_by_email(&mut *tx, &email).await?.is_some() {
        return Err(CoreError::Conflict(USER_EMAIL_CONFLICT.into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
            gender_id: input.gender_id,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, USER_EMAIL_CONFLICT))?;

    // A concurrent setup loses on uq_contexts_default.
    let context = ContextRepo::create(&mut *tx, &context_name, true)
        .await
        .map_err(|e| conflict_on_unique(e, SETUP_ALREADY_DONE))?;
    ContextRepo::add_manager(&mut *tx, context.id, user.id).await?;

    tx.commit().await?;

    Ok(SetupResult {
        user: user.into(),
        context,
    })
}
