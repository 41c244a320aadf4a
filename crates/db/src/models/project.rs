//! Project entity model and DTOs.

use bluetape_core::status::ProjectStatus;
use bluetape_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub unit: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub close_date: Option<Date>,
    pub notes: Option<String>,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub unit: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    pub close_date: Option<Date>,
    pub notes: Option<String>,
    /// Seed the project with the default area template.
    #[serde(default)]
    pub create_default_areas: bool,
    /// Assign every active contractor to the new project.
    #[serde(default)]
    pub assign_all_contractors: bool,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    pub unit: Option<String>,
    pub status: Option<ProjectStatus>,
    pub close_date: Option<Date>,
    pub notes: Option<String>,
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListFilter {
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring match on name or address.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Summary of what a project creation seeded alongside the row.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProjectSeedSummary {
    pub areas_created: u64,
    pub contractors_assigned: u64,
}
