//! Context entity model.
//!
//! A context groups tracks and is managed by one or more users. Exactly one
//! context, created by setup, is flagged as the default.

use serde::Serialize;
use sqlx::FromRow;
use trilha_core::types::{DbId, Timestamp};

/// A row from the `contexts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Context {
    pub id: DbId,
    pub name: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
