//! Repository for the `forms` table.

use sqlx::{PgExecutor, PgPool};
use trilha_core::types::DbId;

use crate::models::form::{CreateForm, Form, UpdateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, is_active, created_at, updated_at";

/// Provides CRUD operations for forms.
pub struct FormRepo;

impl FormRepo {
    pub async fn create(pool: &PgPool, input: &CreateForm) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (title, description, is_active) \
             VALUES ($1, $2, COALESCE($3, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch the forms among `ids` that exist.
    pub async fn find_many<'e, E: PgExecutor<'e>>(
        executor: E,
        ids: &[DbId],
    ) -> Result<Vec<Form>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = ANY($1)");
        sqlx::query_as::<_, Form>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Form>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM forms ORDER BY title, id")
        } else {
            format!("SELECT {COLUMNS} FROM forms WHERE is_active = true ORDER BY title, id")
        };
        sqlx::query_as::<_, Form>(&query).fetch_all(pool).await
    }

    /// Update a form. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                is_active = COALESCE($4, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft delete: set `is_active = false`.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE forms SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
