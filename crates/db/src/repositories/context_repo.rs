//! Repository for the `contexts` and `context_managers` tables.

use sqlx::PgExecutor;
use trilha_core::types::DbId;

use crate::models::context::Context;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_default, created_at, updated_at";

/// Provides queries for contexts and the users managing them.
pub struct ContextRepo;

impl ContextRepo {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        name: &str,
        is_default: bool,
    ) -> Result<Context, sqlx::Error> {
        let query = format!(
            "INSERT INTO contexts (name, is_default) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Context>(&query)
            .bind(name)
            .bind(is_default)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Context>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contexts WHERE id = $1");
        sqlx::query_as::<_, Context>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The default context created by setup, if any.
    pub async fn find_default<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<Option<Context>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contexts WHERE is_default = true LIMIT 1");
        sqlx::query_as::<_, Context>(&query)
            .fetch_optional(executor)
            .await
    }

    /// Link a user as manager of a context. Idempotent.
    pub async fn add_manager<'e, E: PgExecutor<'e>>(
        executor: E,
        context_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO context_managers (context_id, user_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(context_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// First context managed by a user, preferring the default one.
    pub async fn first_managed_by<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: DbId,
    ) -> Result<Option<Context>, sqlx::Error> {
        sqlx::query_as::<_, Context>(
            "SELECT c.id, c.name, c.is_default, c.created_at, c.updated_at \
             FROM contexts c \
             JOIN context_managers cm ON cm.context_id = c.id \
             WHERE cm.user_id = $1 \
             ORDER BY c.is_default DESC, c.id \
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }
}
