//! Area entity model and DTOs.

use bluetape_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An area row from the `areas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Area {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub is_custom: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a custom area.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArea {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Defaults to the current number of areas in the project.
    pub order: Option<i32>,
}

/// DTO for updating an area. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArea {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub order: Option<i32>,
}

/// Request body for reordering a project's areas.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderAreas {
    pub area_ids: Vec<DbId>,
}
