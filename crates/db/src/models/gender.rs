//! Gender entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trilha_core::types::{DbId, Timestamp};

/// A row from the `genders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gender {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGender {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateGender {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
