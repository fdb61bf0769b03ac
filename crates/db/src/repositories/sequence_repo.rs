//! Repository for the `sequences` table.

use sqlx::PgExecutor;
use trilha_core::hierarchy::SequenceTarget;
use trilha_core::types::DbId;

use crate::models::track::Sequence;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, section_id, sort_order, content_id, form_id, created_at, updated_at";

/// Column list for queries that join `sections`.
const PREFIXED_COLUMNS: &str = "s.id, s.section_id, s.sort_order, s.content_id, s.form_id, \
                                s.created_at, s.updated_at";

/// Provides queries for the sequences of a section.
pub struct SequenceRepo;

impl SequenceRepo {
    /// Insert a sequence pointing at `target`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        section_id: DbId,
        sort_order: i32,
        target: SequenceTarget,
    ) -> Result<Sequence, sqlx::Error> {
        let query = format!(
            "INSERT INTO sequences (section_id, sort_order, content_id, form_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(section_id)
            .bind(sort_order)
            .bind(target.content_id())
            .bind(target.form_id())
            .fetch_one(executor)
            .await
    }

    /// Find a sequence by id, only if it belongs to `section_id`.
    pub async fn find_in_section<'e, E: PgExecutor<'e>>(
        executor: E,
        section_id: DbId,
        id: DbId,
    ) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequences WHERE id = $1 AND section_id = $2");
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .bind(section_id)
            .fetch_optional(executor)
            .await
    }

    /// List the sequences of a section ordered by `sort_order`, then id.
    pub async fn list_for_section<'e, E: PgExecutor<'e>>(
        executor: E,
        section_id: DbId,
    ) -> Result<Vec<Sequence>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequences WHERE section_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(section_id)
            .fetch_all(executor)
            .await
    }

    /// List every sequence of a track, grouped by section and ordered within it.
    pub async fn list_for_track<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
    ) -> Result<Vec<Sequence>, sqlx::Error> {
        let query = format!(
            "SELECT {PREFIXED_COLUMNS} \
             FROM sequences s \
             JOIN sections sec ON sec.id = s.section_id \
             WHERE sec.track_id = $1 \
             ORDER BY s.section_id, s.sort_order, s.id"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(track_id)
            .fetch_all(executor)
            .await
    }

    /// Overwrite a sequence's order. Returns `true` if the row exists.
    pub async fn set_order<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        sort_order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sequences SET sort_order = $2 WHERE id = $1")
            .bind(id)
            .bind(sort_order)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a sequence. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sequences WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every sequence under any section of a track.
    pub async fn delete_for_track<'e, E: PgExecutor<'e>>(
        executor: E,
        track_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM sequences \
             WHERE section_id IN (SELECT id FROM sections WHERE track_id = $1)",
        )
        .bind(track_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
