//! Tag entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trilha_core::types::{DbId, Timestamp};

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A tag joined with the id of a content it is attached to.
#[derive(Debug, Clone, FromRow)]
pub struct ContentTagRow {
    pub content_id: DbId,
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTag {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a tag. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
