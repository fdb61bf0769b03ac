//! Repository for the `contents` table.

use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool};
use trilha_core::types::DbId;

use crate::models::content::{Content, ContentWithTags, CreateContent, UpdateContent};
use crate::repositories::TagRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, body, is_active, created_at, updated_at";

/// Provides CRUD operations for contents and their tag set.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a content and attach `input.tags` in one transaction.
    ///
    /// `slug` is the resolved slug (explicit or derived). A duplicate slug
    /// fails with a unique violation on `uq_contents_slug`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContent,
        slug: &str,
    ) -> Result<ContentWithTags, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO contents (title, slug, body, is_active) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, true)) \
             RETURNING {COLUMNS}"
        );
        let content = sqlx::query_as::<_, Content>(&query)
            .bind(input.title.trim())
            .bind(slug)
            .bind(&input.body)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_tags_inner(&mut tx, content.id, &input.tags).await?;
        let tags = TagRepo::list_for_content(&mut *tx, content.id).await?;

        tx.commit().await?;
        Ok(ContentWithTags { content, tags })
    }

    /// Find a content by id.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contents WHERE id = $1");
        sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a content by id, enriched with its tags.
    pub async fn find_with_tags(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentWithTags>, sqlx::Error> {
        let Some(content) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tags = TagRepo::list_for_content(pool, id).await?;
        Ok(Some(ContentWithTags { content, tags }))
    }

    /// Fetch the contents among `ids` that exist.
    pub async fn find_many<'e, E: PgExecutor<'e>>(
        executor: E,
        ids: &[DbId],
    ) -> Result<Vec<Content>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM contents WHERE id = ANY($1)");
        sqlx::query_as::<_, Content>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List contents with their tags, newest first.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<ContentWithTags>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM contents ORDER BY created_at DESC, id DESC")
        } else {
            format!(
                "SELECT {COLUMNS} FROM contents \
                 WHERE is_active = true \
                 ORDER BY created_at DESC, id DESC"
            )
        };
        let contents = sqlx::query_as::<_, Content>(&query).fetch_all(pool).await?;

        let ids: Vec<DbId> = contents.iter().map(|c| c.id).collect();
        let mut tags_by_content: HashMap<DbId, Vec<_>> = HashMap::new();
        for row in TagRepo::list_for_contents(pool, &ids).await? {
            tags_by_content.entry(row.content_id).or_default().push(row.tag);
        }

        Ok(contents
            .into_iter()
            .map(|content| {
                let tags = tags_by_content.remove(&content.id).unwrap_or_default();
                ContentWithTags { content, tags }
            })
            .collect())
    }

    /// Update a content. Only non-`None` fields are applied; a present
    /// `input.tags` replaces the whole tag set in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContent,
    ) -> Result<Option<ContentWithTags>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE contents SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                body = COALESCE($4, body), \
                is_active = COALESCE($5, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(content) = sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.body)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ref tag_ids) = input.tags {
            Self::set_tags_inner(&mut tx, id, tag_ids).await?;
        }
        let tags = TagRepo::list_for_content(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some(ContentWithTags { content, tags }))
    }

    /// Soft delete: set `is_active = false`.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contents SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace the tag set of a content within an existing transaction.
    ///
    /// Deletes every existing association, then inserts the new set.
    async fn set_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        content_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM content_tags WHERE content_id = $1")
            .bind(content_id)
            .execute(&mut **tx)
            .await?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO content_tags (content_id, tag_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(content_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
