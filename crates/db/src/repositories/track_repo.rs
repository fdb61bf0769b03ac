//! Repository for the `tracks` table and the hydrated track tree.

use sqlx::{PgExecutor, PgPool};
use trilha_core::types::DbId;

use crate::models::track::{CreateTrack, Track, TrackDetail, UpdateTrack};
use crate::repositories::{ContentRepo, FormRepo, SectionRepo, SequenceRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, context_id, name, description, start_date, end_date, is_active, \
                       created_by, created_at, updated_at";

/// Provides CRUD operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert the track row only. Sections are written by the caller.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        context_id: DbId,
        created_by: Option<DbId>,
        input: &CreateTrack,
    ) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (context_id, name, description, start_date, end_date, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(context_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a track by id, active or not.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a track and lock its row until the surrounding transaction ends.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List tracks, optionally including inactive ones. Ordered by name.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Track>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM tracks ORDER BY name, id")
        } else {
            format!("SELECT {COLUMNS} FROM tracks WHERE is_active = true ORDER BY name, id")
        };
        sqlx::query_as::<_, Track>(&query).fetch_all(pool).await
    }

    /// Update scalar fields. Only non-`None` fields are applied; `sections`
    /// is ignored here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                start_date = COALESCE($4, start_date), \
                end_date = COALESCE($5, end_date), \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_optional(executor)
            .await
    }

    /// Soft delete: set `is_active = false`. Children are left untouched.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tracks SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a track with its sections, sequences and referenced content/forms.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TrackDetail>, sqlx::Error> {
        let Some(track) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let sections = SectionRepo::list_for_track(pool, id).await?;
        let sequences = SequenceRepo::list_for_track(pool, id).await?;

        let mut content_ids: Vec<DbId> = sequences.iter().filter_map(|s| s.content_id).collect();
        content_ids.sort_unstable();
        content_ids.dedup();
        let mut form_ids: Vec<DbId> = sequences.iter().filter_map(|s| s.form_id).collect();
        form_ids.sort_unstable();
        form_ids.dedup();

        let contents = ContentRepo::find_many(pool, &content_ids).await?;
        let forms = FormRepo::find_many(pool, &form_ids).await?;

        Ok(Some(TrackDetail::assemble(
            track, sections, sequences, contents, forms,
        )))
    }
}
