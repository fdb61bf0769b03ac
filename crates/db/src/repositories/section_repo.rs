//! Repository for the `sections` table.

use sqlx::PgExecutor;
use trilha_core::types::DbId;

use crate::models::track::Section;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, track_id, name, sort_order, created_at, updated_at";

/// Provides queries for the sections of a track.
pub struct SectionRepo;

impl SectionRepo {
    /// Insert a section at the given order.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
        name: Option<&str>,
        sort_order: i32,
    ) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (track_id, name, sort_order) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(track_id)
            .bind(name)
            .bind(sort_order)
            .fetch_one(executor)
            .await
    }

    /// Find a section by id, only if it belongs to `track_id`, and lock its
    /// row until the surrounding transaction ends.
    ///
    /// Writers that append or renumber under a section take this lock first
    /// so their order reads cannot interleave.
    pub async fn find_in_track_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
        section_id: DbId,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections WHERE id = $1 AND track_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(section_id)
            .bind(track_id)
            .fetch_optional(executor)
            .await
    }

    /// List the sections of a track ordered by `sort_order`, then id.
    pub async fn list_for_track<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections WHERE track_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(track_id)
            .fetch_all(executor)
            .await
    }

    /// Overwrite a section's order. Returns `true` if the row exists.
    pub async fn set_order<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        sort_order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sections SET sort_order = $2 WHERE id = $1")
            .bind(id)
            .bind(sort_order)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every section of a track. Returns the number of rows removed.
    pub async fn delete_for_track<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sections WHERE track_id = $1")
            .bind(track_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
