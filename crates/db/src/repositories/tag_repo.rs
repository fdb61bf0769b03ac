//! Repository for the `tags` table and the `content_tags` association.

use sqlx::{PgExecutor, PgPool};
use trilha_core::types::DbId;

use crate::models::tag::{ContentTagRow, CreateTag, Tag, UpdateTag};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, color, description, is_active, created_at, updated_at";

/// Column list for `tags` queries joined as `t`.
const PREFIXED_COLUMNS: &str =
    "t.id, t.name, t.color, t.description, t.is_active, t.created_at, t.updated_at";

/// Provides CRUD operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a tag. Fails with a unique violation (`uq_tags_name`) on a
    /// duplicate name.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, color, description, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the tags among `ids` that exist.
    pub async fn find_many<'e, E: PgExecutor<'e>>(
        executor: E,
        ids: &[DbId],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = ANY($1) ORDER BY name");
        sqlx::query_as::<_, Tag>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List tags ordered by name, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM tags ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM tags WHERE is_active = true ORDER BY name")
        };
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Update a tag. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no tag with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET \
                 name = COALESCE($2, name), \
                 color = COALESCE($3, color), \
                 description = COALESCE($4, description), \
                 is_active = COALESCE($5, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Cascade deletes its content associations.
    ///
    /// Returns `true` if a tag was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Content associations
    // -----------------------------------------------------------------------

    /// List the tags attached to one content.
    pub async fn list_for_content<'e, E: PgExecutor<'e>>(
        executor: E,
        content_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {PREFIXED_COLUMNS} \
             FROM content_tags ct \
             JOIN tags t ON t.id = ct.tag_id \
             WHERE ct.content_id = $1 \
             ORDER BY t.name"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(content_id)
            .fetch_all(executor)
            .await
    }

    /// List the tags attached to any of `content_ids`, one row per pair.
    pub async fn list_for_contents(
        pool: &PgPool,
        content_ids: &[DbId],
    ) -> Result<Vec<ContentTagRow>, sqlx::Error> {
        let query = format!(
            "SELECT ct.content_id, {PREFIXED_COLUMNS} \
             FROM content_tags ct \
             JOIN tags t ON t.id = ct.tag_id \
             WHERE ct.content_id = ANY($1) \
             ORDER BY ct.content_id, t.name"
        );
        sqlx::query_as::<_, ContentTagRow>(&query)
            .bind(content_ids)
            .fetch_all(pool)
            .await
    }
}
