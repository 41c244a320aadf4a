//! Project contractor assignment model and DTOs.

use bluetape_core::lifecycle::Lifecycle;
use bluetape_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_contractors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub project_id: DbId,
    pub contractor_id: DbId,
    /// Project-scoped trades, independent of the contractor's global trades.
    pub trades: Vec<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with the contractor's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assignment: Assignment,
    pub company: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sqlx(rename = "contractor_is_active", try_from = "bool")]
    pub contractor_lifecycle: Lifecycle,
}

/// DTO for assigning a contractor to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub contractor_id: DbId,
    #[serde(default)]
    pub trades: Vec<String>,
    pub notes: Option<String>,
}

/// DTO for updating an assignment's trade scope or notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignment {
    pub trades: Option<Vec<String>>,
    pub notes: Option<String>,
}
