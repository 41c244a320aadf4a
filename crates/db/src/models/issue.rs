//! Issue and issue photo models and DTOs.

use bluetape_core::report::ReportIssue;
use bluetape_core::status::{IssuePriority, IssueStatus, PhotoType};
use bluetape_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::clearable;

/// An issue row from the `issues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Issue {
    pub id: DbId,
    pub project_id: DbId,
    pub area_id: Option<DbId>,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: IssuePriority,
    #[sqlx(try_from = "String")]
    pub status: IssueStatus,
    pub resolution_notes: Option<String>,
    pub trade_label: Option<String>,
    pub contractor_id: Option<DbId>,
    pub due_date: Option<Date>,
    pub created_by: DbId,
    pub closed_by: Option<DbId>,
    pub closed_at: Option<Timestamp>,
    pub last_closed_by: Option<DbId>,
    pub last_closed_at: Option<Timestamp>,
    pub notification_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An issue joined with its area and contractor display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueWithLabels {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub issue: Issue,
    pub area_name: Option<String>,
    pub contractor_name: Option<String>,
}

/// An issue with labels and photos, as returned by the API and used by reports.
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    #[serde(flatten)]
    pub issue: IssueWithLabels,
    pub photos: Vec<IssuePhoto>,
}

impl ReportIssue for IssueDetail {
    fn status(&self) -> IssueStatus {
        self.issue.issue.status
    }

    fn priority(&self) -> IssuePriority {
        self.issue.issue.priority
    }

    fn area_name(&self) -> Option<&str> {
        self.issue.area_name.as_deref()
    }

    fn trade_label(&self) -> Option<&str> {
        self.issue.issue.trade_label.as_deref()
    }
}

/// DTO for creating an issue. `project_id` comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIssue {
    pub area_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(alias = "trade")]
    pub trade_label: Option<String>,
    pub contractor_id: Option<DbId>,
    pub due_date: Option<Date>,
}

/// DTO for updating an issue. Status changes go through the transition endpoint.
///
/// `null` clears an optional field; an absent key leaves it unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateIssue {
    #[serde(default, deserialize_with = "clearable")]
    pub area_id: Option<Option<DbId>>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub subcategory: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    pub priority: Option<IssuePriority>,
    #[serde(default, alias = "trade", deserialize_with = "clearable")]
    pub trade_label: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub contractor_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "clearable")]
    pub due_date: Option<Option<Date>>,
}

/// Request body for a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: IssueStatus,
    /// Stored as `resolution_notes` when present.
    pub notes: Option<String>,
}

/// Filters for listing a project's issues.
#[derive(Debug, Clone, Default)]
pub struct IssueListFilter {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub area_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
    /// Exact match on `trade_label`.
    pub trade: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// A row from the `issue_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssuePhoto {
    pub id: DbId,
    pub issue_id: DbId,
    pub url: String,
    pub filename: Option<String>,
    #[sqlx(try_from = "String")]
    pub photo_type: PhotoType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a stored photo against an issue.
#[derive(Debug, Clone)]
pub struct CreateIssuePhoto {
    pub url: String,
    pub filename: Option<String>,
    pub photo_type: PhotoType,
}

/// Issue counts for the project dashboard.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct IssueCountsRow {
    pub total_issues: i64,
    pub open_issues: i64,
    pub assigned_issues: i64,
    pub in_progress_issues: i64,
    pub ready_for_reinspect: i64,
    pub closed_issues: i64,
    pub high_priority_open: i64,
}

impl From<IssueCountsRow> for bluetape_core::report::StatusCounts {
    fn from(row: IssueCountsRow) -> Self {
        Self {
            total_issues: row.total_issues,
            open_issues: row.open_issues,
            assigned_issues: row.assigned_issues,
            in_progress_issues: row.in_progress_issues,
            ready_for_reinspect: row.ready_for_reinspect,
            closed_issues: row.closed_issues,
            high_priority_open: row.high_priority_open,
        }
    }
}
