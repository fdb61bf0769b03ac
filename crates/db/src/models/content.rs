//! Content entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trilha_core::types::{DbId, Timestamp};

use super::tag::Tag;

/// A row from the `contents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A content enriched with its tags.
#[derive(Debug, Clone, Serialize)]
pub struct ContentWithTags {
    #[serde(flatten)]
    pub content: Content,
    pub tags: Vec<Tag>,
}

/// DTO for creating a content. `slug` is derived from `title` when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContent {
    pub title: String,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub is_active: Option<bool>,
    /// Tag ids to attach.
    #[serde(default)]
    pub tags: Vec<DbId>,
}

/// DTO for updating a content. When `tags` is present the whole tag set is
/// replaced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateContent {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<DbId>>,
}
