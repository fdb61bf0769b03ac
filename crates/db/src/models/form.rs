//! Form entity model and DTOs.
//!
//! Forms are leaf items that a sequence slot can point at, alongside contents.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trilha_core::types::{DbId, Timestamp};

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateForm {
    pub title: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
