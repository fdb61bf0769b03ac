//! Repository for the `genders` table.

use sqlx::{PgExecutor, PgPool};
use trilha_core::types::DbId;

use crate::models::gender::{CreateGender, Gender, UpdateGender};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_active, created_at, updated_at";

/// Provides CRUD operations for genders.
pub struct GenderRepo;

impl GenderRepo {
    /// Insert a gender. A duplicate name violates `uq_genders_name`.
    pub async fn create(pool: &PgPool, input: &CreateGender) -> Result<Gender, sqlx::Error> {
        let query = format!(
            "INSERT INTO genders (name, is_active) \
             VALUES ($1, COALESCE($2, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gender>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gender>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genders WHERE id = $1");
        sqlx::query_as::<_, Gender>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a gender and lock its row until the surrounding transaction ends.
    ///
    /// Holding the lock blocks concurrent inserts of users that reference it.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Gender>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Gender>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List genders ordered by name, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Gender>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM genders ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM genders WHERE is_active = true ORDER BY name")
        };
        sqlx::query_as::<_, Gender>(&query).fetch_all(pool).await
    }

    /// Update a gender. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGender,
    ) -> Result<Option<Gender>, sqlx::Error> {
        let query = format!(
            "UPDATE genders SET \
                name = COALESCE($2, name), \
                is_active = COALESCE($3, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gender>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genders WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of users whose `gender_id` references this gender.
    pub async fn count_users<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE gender_id = $1")
            .bind(id)
            .fetch_one(executor)
            .await
    }
}
